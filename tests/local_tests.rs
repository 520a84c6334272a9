//! Integration tests for cloning local directories

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn create_source(root: &Path) {
    fs::create_dir_all(root.join("src/nested/deeper")).unwrap();
    fs::create_dir_all(root.join(".git/refs/heads")).unwrap();
    fs::write(root.join("README.md"), "# Project\n").unwrap();
    fs::write(root.join("src/lib.rs"), "pub fn f() {}\n").unwrap();
    fs::write(root.join("src/nested/deeper/data.bin"), [0_u8, 1, 2, 255]).unwrap();
    fs::write(root.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
    fs::write(root.join(".git/refs/heads/main"), "0123456789abcdef\n").unwrap();
}

fn assert_same_tree(expected: &Path, actual: &Path) {
    for entry in walkdir::WalkDir::new(expected).min_depth(1) {
        let entry = entry.unwrap();
        let relative = entry.path().strip_prefix(expected).unwrap();
        let mirrored = actual.join(relative);
        if entry.file_type().is_dir() {
            assert!(mirrored.is_dir(), "missing directory {}", relative.display());
        } else {
            assert_eq!(
                fs::read(entry.path()).unwrap(),
                fs::read(&mirrored).unwrap(),
                "content mismatch in {}",
                relative.display()
            );
        }
    }
    assert_eq!(
        walkdir::WalkDir::new(expected).into_iter().count(),
        walkdir::WalkDir::new(actual).into_iter().count()
    );
}

#[test]
fn local_clone_reproduces_tree_with_git_metadata() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("project");
    create_source(&source);

    let mut cmd = Command::cargo_bin("snapclone").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["clone", "project", "copy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloned local directory"));

    assert_same_tree(&source, &temp_dir.path().join("copy"));
}

#[test]
fn local_clone_defaults_to_directory_name() {
    let temp_dir = TempDir::new().unwrap();
    create_source(&temp_dir.path().join("sources/project"));
    fs::create_dir(temp_dir.path().join("work")).unwrap();

    let mut cmd = Command::cargo_bin("snapclone").unwrap();
    cmd.current_dir(temp_dir.path().join("work"))
        .args(["clone", "../sources/project"])
        .assert()
        .success();

    assert!(temp_dir.path().join("work/project/README.md").exists());
    assert!(temp_dir.path().join("work/project/.git/HEAD").exists());
}

#[test]
fn local_clone_with_file_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("project");
    create_source(&source);
    let source_abs = source.canonicalize().unwrap();

    let mut cmd = Command::cargo_bin("snapclone").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("clone")
        .arg(format!("file://{}", source_abs.display()))
        .arg("copy")
        .assert()
        .success();

    assert_same_tree(&source, &temp_dir.path().join("copy"));
}

#[test]
fn local_clone_into_empty_destination() {
    let temp_dir = TempDir::new().unwrap();
    create_source(&temp_dir.path().join("project"));
    fs::create_dir(temp_dir.path().join("empty")).unwrap();

    let mut cmd = Command::cargo_bin("snapclone").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["clone", "project", "empty"])
        .assert()
        .success();

    assert!(temp_dir.path().join("empty/src/lib.rs").exists());
}

#[test]
fn local_clone_into_descendant_fails() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("project");
    create_source(&source);

    let mut cmd = Command::cargo_bin("snapclone").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["clone", "project", "project/src/copy"])
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains(
            "destination is inside the source directory",
        ));

    assert!(!source.join("src/copy").exists());
}

#[test]
fn local_clone_onto_itself_fails() {
    let temp_dir = TempDir::new().unwrap();
    create_source(&temp_dir.path().join("project"));

    let mut cmd = Command::cargo_bin("snapclone").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["clone", "project", "./project/"])
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains("destination is the source directory"));
}

#[test]
fn local_clone_into_non_empty_destination_fails() {
    let temp_dir = TempDir::new().unwrap();
    create_source(&temp_dir.path().join("project"));
    fs::create_dir(temp_dir.path().join("occupied")).unwrap();
    fs::write(temp_dir.path().join("occupied/keep.txt"), "keep").unwrap();

    let mut cmd = Command::cargo_bin("snapclone").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["clone", "project", "occupied"])
        .assert()
        .failure()
        .code(4)
        .stdout(predicate::str::contains("already exists and is not empty"));

    let entries: Vec<_> = fs::read_dir(temp_dir.path().join("occupied"))
        .unwrap()
        .collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn local_source_nonexistent_path() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("snapclone").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["clone", "does-not-exist", "copy"])
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains("does not exist"));

    assert!(!temp_dir.path().join("copy").exists());
}

#[test]
fn local_source_is_a_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "notes").unwrap();

    let mut cmd = Command::cargo_bin("snapclone").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["clone", "notes.txt", "copy"])
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains("is not a directory"));
}

}
