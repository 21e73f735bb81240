// crates/testcorpus-core/src/runtime/fs/tests.rs
// ============================================================================
// Module: Corpus Filesystem Unit Tests
// Description: Coverage for bounded reads, staged writes, and removals.
// Purpose: Ensure corpus access fails closed on unsafe layouts.
// Dependencies: testcorpus-core, tempfile, std
// ============================================================================

//! ## Overview
//! Exercises the capability-scoped root against real temporary directories,
//! including symlink skipping and rollback of staged writes.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Unit tests use expect for setup clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use super::CorpusRoot;
use super::validate_relative_path;
use crate::CorpusError;
use crate::interfaces::EVENT_SYMLINK_SKIPPED;
use crate::runtime::sinks::MemoryEventSink;
use crate::runtime::sinks::NoopEventSink;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn discover_lists_files_sorted_and_relative() {
    let temp = tempfile::tempdir().expect("temp dir");
    fs::create_dir_all(temp.path().join("core")).expect("mkdir");
    fs::write(temp.path().join("core/b.json"), "{}").expect("write");
    fs::write(temp.path().join("a.json"), "{}").expect("write");
    let root = CorpusRoot::open(temp.path()).expect("open root");
    let files = root.discover(Path::new(""), &NoopEventSink).expect("discover");
    assert_eq!(files, vec![PathBuf::from("a.json"), PathBuf::from("core/b.json")]);
}

#[test]
fn discover_missing_subdir_is_empty() {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = CorpusRoot::open(temp.path()).expect("open root");
    let files = root.discover(Path::new("proposed"), &NoopEventSink).expect("discover");
    assert!(files.is_empty());
}

#[cfg(unix)]
#[test]
fn discover_skips_symlinks_and_reports_them() {
    let temp = tempfile::tempdir().expect("temp dir");
    fs::write(temp.path().join("real.json"), "{}").expect("write");
    std::os::unix::fs::symlink(temp.path().join("real.json"), temp.path().join("link.json"))
        .expect("symlink");
    let root = CorpusRoot::open(temp.path()).expect("open root");
    let sink = MemoryEventSink::new();
    let files = root.discover(Path::new(""), &sink).expect("discover");
    assert_eq!(files, vec![PathBuf::from("real.json")]);
    assert_eq!(sink.count(EVENT_SYMLINK_SKIPPED), 1);
}

#[test]
fn read_bounded_rejects_oversized_files() {
    let temp = tempfile::tempdir().expect("temp dir");
    fs::write(temp.path().join("big.json"), vec![b' '; 32]).expect("write");
    let root = CorpusRoot::open(temp.path()).expect("open root");
    let err = root.read_bounded(Path::new("big.json"), 16).unwrap_err();
    assert!(matches!(err, CorpusError::TooLarge { size: 32, limit: 16, .. }));
    assert!(root.read_bounded(Path::new("big.json"), 32).is_ok());
}

#[test]
fn staged_write_is_invisible_until_applied() {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = CorpusRoot::open(temp.path()).expect("open root");
    let staged = root.stage_write(Path::new("proposed/a.json"), b"new").expect("stage");
    assert!(!temp.path().join("proposed/a.json").exists());
    assert_eq!(staged.created_dirs(), &[PathBuf::from("proposed")]);
    staged.apply().expect("apply");
    assert_eq!(fs::read(temp.path().join("proposed/a.json")).expect("read"), b"new");
    let leftovers: Vec<_> = fs::read_dir(temp.path().join("proposed"))
        .expect("list")
        .map(|entry| entry.expect("entry").file_name())
        .collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn discard_removes_temporary() {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = CorpusRoot::open(temp.path()).expect("open root");
    let staged = root.stage_write(Path::new("a.json"), b"x").expect("stage");
    staged.discard();
    assert_eq!(fs::read_dir(temp.path()).expect("list").count(), 0);
}

#[test]
fn remove_dir_if_empty_keeps_foreign_entries() {
    let temp = tempfile::tempdir().expect("temp dir");
    fs::create_dir_all(temp.path().join("proposed")).expect("mkdir");
    fs::write(temp.path().join("proposed/notes.txt"), "keep").expect("write");
    fs::create_dir_all(temp.path().join("reference")).expect("mkdir");
    let root = CorpusRoot::open(temp.path()).expect("open root");
    assert!(!root.remove_dir_if_empty(Path::new("proposed")).expect("keep"));
    assert!(root.remove_dir_if_empty(Path::new("reference")).expect("remove"));
    assert!(temp.path().join("proposed/notes.txt").exists());
    assert!(!temp.path().join("reference").exists());
}

#[test]
fn relative_paths_reject_traversal() {
    assert!(validate_relative_path(Path::new("../escape.json")).is_err());
    assert!(validate_relative_path(Path::new("/abs.json")).is_err());
    assert!(validate_relative_path(Path::new("")).is_err());
    assert_eq!(
        validate_relative_path(Path::new("./core/a.json")).expect("clean"),
        PathBuf::from("core/a.json")
    );
}
