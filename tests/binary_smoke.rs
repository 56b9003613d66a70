use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

fn mediatidy() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mediatidy"))
}

#[test]
fn binary_organizes_directory_and_creates_config() {
    let work = TempDir::new().expect("Failed to create temp directory");
    let target = work.path().join("media");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("a.png"), "a").unwrap();
    fs::write(target.join("Vacation Photo.jpg"), "v").unwrap();

    mediatidy()
        .current_dir(work.path())
        .arg("--dir")
        .arg(&target)
        .assert()
        .success();

    assert!(work.path().join("mediatidy.toml").is_file());
    assert!(target.join("ext/a.png").is_file());
    assert!(target.join("Vacation/Vacation Photo.jpg").is_file());
}

#[test]
fn binary_dry_run_leaves_everything_in_place() {
    let work = TempDir::new().expect("Failed to create temp directory");
    fs::write(work.path().join("a.png"), "a").unwrap();

    mediatidy()
        .current_dir(work.path())
        .args(["--dir", ".", "--dry-run"])
        .assert()
        .success();

    assert!(work.path().join("a.png").is_file());
    assert!(!work.path().join("ext").exists());
    assert!(!work.path().join("mediatidy.toml").exists());
}

#[test]
fn binary_malformed_config_falls_back_to_flags() {
    let work = TempDir::new().expect("Failed to create temp directory");
    let config = work.path().join("broken.toml");
    fs::write(&config, "dir = [oops").unwrap();
    fs::write(work.path().join("b.PNG"), "b").unwrap();

    mediatidy()
        .current_dir(work.path())
        .arg("--config")
        .arg(&config)
        .args(["--dir", ".", "--ext", "pngs"])
        .assert()
        .success();

    assert!(work.path().join("pngs/b.PNG").is_file());
}

#[test]
fn binary_missing_directory_fails() {
    let work = TempDir::new().expect("Failed to create temp directory");

    mediatidy()
        .current_dir(work.path())
        .args(["--dir", "nowhere"])
        .assert()
        .failure();
}

#[test]
fn binary_strict_reports_skipped_rule() {
    let work = TempDir::new().expect("Failed to create temp directory");
    fs::write(work.path().join("ext"), "a file where the folder should go").unwrap();
    fs::write(work.path().join("a.png"), "a").unwrap();

    mediatidy()
        .current_dir(work.path())
        .args(["--dir", "."])
        .assert()
        .success();

    mediatidy()
        .current_dir(work.path())
        .args(["--dir", ".", "--strict"])
        .assert()
        .code(2);
}

#[test]
fn binary_strict_reports_file_left_in_place() {
    let work = TempDir::new().expect("Failed to create temp directory");
    for name in ["Vacation", "Vacation_folder", "Vacation Photo.jpg", "Zoo trip.jpg"] {
        fs::write(work.path().join(name), name).unwrap();
    }

    mediatidy()
        .current_dir(work.path())
        .args(["--dir", ".", "--strict"])
        .assert()
        .code(2);

    assert!(work.path().join("Vacation Photo.jpg").is_file());
    assert!(work.path().join("Zoo/Zoo trip.jpg").is_file());
}
