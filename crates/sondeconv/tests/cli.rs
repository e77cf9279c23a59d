use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const TWO_ROWS: &str = "Time,Lat/PosX,Long/PosY,Alt/PosZ,Baro,AirT,RH\n\
               0,10,20,100,1000,20,50\n\
               10,10.001,20.001,110,999,19,55\n";

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sondeconv"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch sondeconv")
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn missing_argument_prints_usage_and_exits_2() {
    let dir = TempDir::new().unwrap();

    let output = run(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn extra_argument_prints_usage_and_exits_2() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), TWO_ROWS).unwrap();

    let output = run(dir.path(), &["a.csv", "b.csv"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
    assert_eq!(dir_entries(dir.path()), vec!["a.csv"]);
}

#[test]
fn valid_log_writes_both_outputs() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("flight.csv"), TWO_ROWS).unwrap();

    let output = run(dir.path(), &["flight.csv"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stdout.is_empty());
    assert_eq!(
        dir_entries(dir.path()),
        vec!["flight.csv", "flight.geojson", "flight.windsond"]
    );
}

#[test]
fn conversion_failure_exits_1() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.csv"), "Time,Lat/PosX\n0,10\n").unwrap();

    let output = run(dir.path(), &["bad.csv"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to convert bad.csv"), "stderr: {stderr}");
    assert_eq!(dir_entries(dir.path()), vec!["bad.csv"]);
}
