//! Tests for error handling under adverse filesystem conditions
//!
//! These tests verify that wiki-fs handles real error conditions gracefully.

use tempfile::tempdir;
use wiki_fs::{Error, io};

#[test]
fn write_text_to_nonexistent_parent_creates_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a").join("b").join("c").join("file.txt");

    io::write_text(&path, "deep content").unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "deep content");
}

#[test]
fn write_atomic_cleans_up_temp_file_on_success() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("target.txt");

    io::write_text(&path, "content").unwrap();

    // The temp file pattern is .{filename}.{pid}.tmp
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();

    assert!(
        entries.is_empty(),
        "No temp files should remain after successful write, found: {:?}",
        entries.iter().map(|e| e.file_name()).collect::<Vec<_>>()
    );
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use std::fs::{self, Permissions};
    use std::os::unix::fs::PermissionsExt;

    fn is_root() -> bool {
        match std::process::Command::new("id").arg("-u").output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim() == "0",
            Err(_) => false,
        }
    }

    #[test]
    fn create_dir_in_readonly_directory_is_create_dir_error() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let readonly_dir = dir.path().join("readonly");
        fs::create_dir(&readonly_dir).unwrap();
        fs::set_permissions(&readonly_dir, Permissions::from_mode(0o555)).unwrap();

        let result = io::write_text(&readonly_dir.join("sub").join("file.txt"), "content");

        let _ = fs::set_permissions(&readonly_dir, Permissions::from_mode(0o755));

        match result {
            Err(Error::CreateDir { source, .. }) => {
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied)
            }
            other => panic!("expected CreateDir error, got {other:?}"),
        }
    }

    #[test]
    fn write_atomic_unwritable_parent_preserves_original() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let parent = dir.path().join("parent");
        fs::create_dir(&parent).unwrap();

        let file_path = parent.join("existing.txt");
        fs::write(&file_path, "original").unwrap();
        fs::set_permissions(&parent, Permissions::from_mode(0o555)).unwrap();

        let result = io::write_text(&file_path, "new content");

        let _ = fs::set_permissions(&parent, Permissions::from_mode(0o755));

        let err = result.unwrap_err();
        assert_eq!(
            err.io_source().map(|e| e.kind()),
            Some(std::io::ErrorKind::PermissionDenied)
        );
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "original");
    }

    #[test]
    fn read_text_permission_denied_returns_error() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("secret.txt");
        fs::write(&file_path, "secret content").unwrap();
        fs::set_permissions(&file_path, Permissions::from_mode(0o000)).unwrap();

        let result = io::read_text(&file_path);

        let _ = fs::set_permissions(&file_path, Permissions::from_mode(0o644));

        assert!(result.is_err(), "Reading unreadable file should fail");
    }
}
