use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn write_file(path: &Path, size: usize) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, vec![0u8; size])?;
    Ok(())
}

fn media_tree() -> Result<TempDir> {
    let dir = tempdir()?;
    write_file(&dir.path().join("a/video1.mp4"), 2 * 1024 * 1024)?;
    write_file(&dir.path().join("a/doc1.pdf"), 10 * 1024)?;
    Ok(dir)
}

fn filefinder(dir: &TempDir) -> Result<Command> {
    let mut cmd = Command::cargo_bin("filefinder-cli")?;
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("FILE_FINDER_FILE_TYPE_FILTER");
    Ok(cmd)
}

#[test]
fn test_grouped_results() -> Result<()> {
    let dir = media_tree()?;

    filefinder(&dir)?
        .arg(dir.path())
        .args(["-t", "Video", "-s", "2MB"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Directory\s+\|\s+Count").unwrap())
        .stdout(predicate::str::contains(
            dir.path().join("a").display().to_string(),
        ))
        .stdout(predicate::str::is_match(r"Total\s+\|\s+1").unwrap());
    Ok(())
}

#[test]
fn test_detailed_results() -> Result<()> {
    let dir = media_tree()?;

    filefinder(&dir)?
        .arg(dir.path())
        .args(["-t", "video", "-s", "2MB", "-d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FileName"))
        .stdout(predicate::str::contains("video1.mp4"))
        .stdout(predicate::str::contains("doc1.pdf").not());
    Ok(())
}

#[test]
fn test_no_results() -> Result<()> {
    let dir = media_tree()?;

    filefinder(&dir)?
        .arg(dir.path())
        .args(["-t", "Archive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 results found matching criteria"));
    Ok(())
}

#[test]
fn test_invalid_file_type() -> Result<()> {
    let dir = media_tree()?;

    filefinder(&dir)?
        .arg(dir.path())
        .args(["-t", "Music"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid file type: Music"));
    Ok(())
}

#[test]
fn test_invalid_size() -> Result<()> {
    let dir = media_tree()?;

    filefinder(&dir)?
        .arg(dir.path())
        .args(["-s", "12 parsecs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid file size"));
    Ok(())
}

#[test]
fn test_missing_root_fails() -> Result<()> {
    let dir = tempdir()?;

    filefinder(&dir)?
        .arg(dir.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read directory"));
    Ok(())
}

#[test]
fn test_remove_confirmed() -> Result<()> {
    let dir = media_tree()?;

    filefinder(&dir)?
        .arg(dir.path())
        .args(["-t", "Video", "-s", "2MB", "-d", "-r"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Are you sure you want to delete these files?",
        ))
        .stdout(predicate::str::contains("Deleted 1 files and 0 directories."));

    assert!(!dir.path().join("a/video1.mp4").exists());
    assert!(dir.path().join("a/doc1.pdf").exists());
    Ok(())
}

#[test]
fn test_remove_prunes_emptied_directories() -> Result<()> {
    let dir = tempdir()?;
    write_file(&dir.path().join("old/clips/one.avi"), 10)?;
    write_file(&dir.path().join("keep.txt"), 10)?;

    filefinder(&dir)?
        .arg(dir.path())
        .args(["-t", "Video", "-r"])
        .write_stdin("yes\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 files and 2 directories."));

    assert!(!dir.path().join("old").exists());
    assert!(dir.path().join("keep.txt").exists());
    Ok(())
}

#[test]
fn test_remove_declined() -> Result<()> {
    let dir = media_tree()?;

    filefinder(&dir)?
        .arg(dir.path())
        .args(["-t", "Video", "-r"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deletion cancelled."));

    assert!(dir.path().join("a/video1.mp4").exists());
    Ok(())
}

#[test]
fn test_file_type_from_environment() -> Result<()> {
    let dir = media_tree()?;

    filefinder(&dir)?
        .arg(dir.path())
        .arg("-d")
        .env("FILE_FINDER_FILE_TYPE_FILTER", "Documents")
        .assert()
        .success()
        .stdout(predicate::str::contains("doc1.pdf"))
        .stdout(predicate::str::contains("video1.mp4").not());
    Ok(())
}

#[test]
fn test_config_file() -> Result<()> {
    let dir = media_tree()?;
    let config_path = dir.path().join("finder.yaml");
    fs::write(
        &config_path,
        "file_type_filter: Video\ndisplay_detailed_results: true\n",
    )?;

    filefinder(&dir)?
        .arg(dir.path())
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("video1.mp4"))
        .stdout(predicate::str::contains("doc1.pdf").not());
    Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
    let dir = media_tree()?;

    let output = filefinder(&dir)?
        .arg(dir.path())
        .args(["-t", "Video", "-d", "--json"])
        .output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["total_count"], 1);
    assert_eq!(json["total_bytes"], 2_097_152);
    assert_eq!(json["matches"]["mode"], "detailed");
    assert_eq!(json["matches"]["entries"][0]["file_name"], "video1.mp4");
    Ok(())
}

#[test]
fn test_json_with_remove_keeps_stdout_parseable() -> Result<()> {
    let dir = media_tree()?;

    let output = filefinder(&dir)?
        .arg(dir.path())
        .args(["-t", "Video", "--json", "-r"])
        .write_stdin("y\n")
        .output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["total_count"], 1);

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Are you sure you want to delete these files? [y/N]"));
    assert!(stderr.contains("Deleted 1 files and 0 directories."));
    assert!(!dir.path().join("a/video1.mp4").exists());
    Ok(())
}

#[test]
fn test_no_hyperlinks_when_piped() -> Result<()> {
    let dir = media_tree()?;

    filefinder(&dir)?
        .arg(dir.path())
        .args(["-t", "Video", "-d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("video1.mp4"))
        .stdout(predicate::str::contains("\x1b]8;;").not());
    Ok(())
}
