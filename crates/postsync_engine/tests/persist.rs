use std::fs;

use postsync_engine::{clear_managed_files, ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("content").join("posts");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn output_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();
    assert!(ensure_output_dir(&file_path).is_err());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("doc.md", "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "doc.md");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write("doc.md", "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
    // no temp files left behind
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("doc.md", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("doc.md").exists());
}

#[test]
fn clear_only_removes_top_level_markdown() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("a.md"), "a").unwrap();
    fs::write(dir.join("b.md"), "b").unwrap();
    fs::write(dir.join("index.js"), "keep").unwrap();
    fs::write(dir.join("notes.markdown"), "keep").unwrap();
    fs::create_dir(dir.join("nested.md")).unwrap();
    fs::write(dir.join("nested.md").join("inner.md"), "keep").unwrap();

    let removed = clear_managed_files(dir).unwrap();

    assert_eq!(removed, vec![dir.join("a.md"), dir.join("b.md")]);
    assert!(dir.join("index.js").exists());
    assert!(dir.join("notes.markdown").exists());
    assert!(dir.join("nested.md").join("inner.md").exists());
}

#[test]
fn clear_on_empty_dir_is_noop() {
    let temp = TempDir::new().unwrap();
    assert!(clear_managed_files(temp.path()).unwrap().is_empty());
}

#[test]
fn clear_matches_extension_case_and_sweeps_interrupted_writes() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("Upper.MD"), "stale").unwrap();
    fs::write(dir.join("mixed.Md"), "stale").unwrap();
    fs::write(dir.join(".postsync-a1b2c3"), "half written").unwrap();
    fs::write(dir.join(".gitkeep"), "").unwrap();

    let removed = clear_managed_files(dir).unwrap();

    assert_eq!(
        removed,
        vec![
            dir.join(".postsync-a1b2c3"),
            dir.join("Upper.MD"),
            dir.join("mixed.Md"),
        ]
    );
    assert!(dir.join(".gitkeep").exists());
}

#[test]
fn writer_leaves_no_temp_files_behind() {
    let temp = TempDir::new().unwrap();
    ensure_output_dir(temp.path()).unwrap();
    AtomicFileWriter::new(temp.path().to_path_buf())
        .write("post.md", "body")
        .unwrap();

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["post.md".to_string()]);
}
