// hyperbatch-core/tests/discovery_tests.rs

use hyperbatch_core::discovery::find_processable_files;
use hyperbatch_core::error::CoreError;
use std::fs::{self, File};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_find_processable_files_sorted_by_name() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input_dir = dir.path();

    File::create(input_dir.join("c.wmv"))?;
    File::create(input_dir.join("a.mov"))?;
    File::create(input_dir.join("b.mp4"))?;
    File::create(input_dir.join("readme.txt"))?;
    File::create(input_dir.join("clip.mkv"))?;
    fs::create_dir(input_dir.join("Output"))?;
    File::create(input_dir.join("Output").join("a.mov"))?; // Previous run, not an input

    let files = find_processable_files(input_dir)?;
    let names: Vec<_> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, vec!["a.mov", "b.mp4", "c.wmv"]);
    assert!(files.iter().all(|f| f.parent() == Some(input_dir)));

    dir.close()?;
    Ok(())
}

#[test]
fn test_find_processable_files_sort_ignores_case() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input_dir = dir.path();

    File::create(input_dir.join("B.mp4"))?;
    File::create(input_dir.join("a.mov"))?;
    File::create(input_dir.join("c.wmv"))?;

    let files = find_processable_files(input_dir)?;
    let names: Vec<_> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, vec!["a.mov", "B.mp4", "c.wmv"]);

    dir.close()?;
    Ok(())
}

#[test]
fn test_find_processable_files_case_insensitive() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input_dir = dir.path();

    File::create(input_dir.join("HOLIDAY.MP4"))?;
    File::create(input_dir.join("drive.Mov"))?;

    let files = find_processable_files(input_dir)?;
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].file_name().unwrap(), "HOLIDAY.MP4"); // Original case preserved

    dir.close()?;
    Ok(())
}

#[test]
fn test_find_processable_files_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input_dir = dir.path();

    File::create(input_dir.join("document.txt"))?;
    fs::create_dir(input_dir.join("subdir"))?;
    File::create(input_dir.join("subdir").join("nested.mp4"))?;

    match find_processable_files(input_dir) {
        Err(CoreError::NoFilesFound) => {}
        other => panic!("Unexpected result: {:?}", other),
    }

    dir.close()?;
    Ok(())
}

#[test]
fn test_find_processable_files_nonexistent_dir() {
    let non_existent_path = PathBuf::from("surely_this_does_not_exist_42_integration");
    match find_processable_files(&non_existent_path) {
        Err(CoreError::DirectoryNotFound(path)) => assert_eq!(path, non_existent_path),
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn test_find_processable_files_on_a_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("a.mp4");
    File::create(&file)?;

    let err = find_processable_files(&file).unwrap_err();
    assert!(matches!(err, CoreError::DirectoryNotFound(_)));
    assert!(err.is_precondition());
    Ok(())
}
