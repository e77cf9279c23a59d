use std::fs;
use std::path::{Path, PathBuf};

use sondeconv_core::convert::{convert_content, convert_file, OutputPaths};
use sondeconv_core::outputs::WINDSOND_HEADER;
use sondeconv_core::{ConversionError, DomainError};
use tempfile::TempDir;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", path.display(), err))
}

fn stage(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("failed to stage input");
    path
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
fn output_paths_swap_the_last_extension() {
    let paths = OutputPaths::for_input(Path::new("data/flight.csv"));
    assert_eq!(paths.windsond, PathBuf::from("data/flight.windsond"));
    assert_eq!(paths.geojson, PathBuf::from("data/flight.geojson"));

    let paths = OutputPaths::for_input(Path::new("flight"));
    assert_eq!(paths.windsond, PathBuf::from("flight.windsond"));

    let paths = OutputPaths::for_input(Path::new("launch.2024.log"));
    assert_eq!(paths.geojson, PathBuf::from("launch.2024.geojson"));

    let paths = OutputPaths::for_input(Path::new(".hidden"));
    assert_eq!(paths.windsond, PathBuf::from(".hidden.windsond"));
}

#[test]
fn two_row_flight_converts_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input = stage(&dir, "two_rows.csv", &fixture("two_rows.csv"));

    let summary = convert_file(&input).expect("conversion failed");
    assert_eq!(summary.parser, "NAMED_COLUMNS");
    assert_eq!(summary.rows_read, 2);
    assert_eq!(summary.samples_emitted, 1);
    assert_eq!(summary.windsond_path, dir.path().join("two_rows.windsond"));

    let windsond = fs::read_to_string(&summary.windsond_path).unwrap();
    let lines: Vec<&str> = windsond.lines().collect();
    assert_eq!(lines, vec![WINDSOND_HEADER, "110.0\t999.0\t19.0\t9.8\t224.6\t15606.3"]);

    let geojson: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary.geojson_path).unwrap()).unwrap();
    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);

    let feature = &features[0];
    assert_eq!(
        feature["geometry"]["coordinates"],
        serde_json::json!([20.001, 10.001, 110.0])
    );
    let properties = &feature["properties"];
    let distance = properties["distance"].as_f64().unwrap();
    assert!((distance - 156.063_310_552_490_3).abs() < 1e-6);
    assert!((properties["speed"].as_f64().unwrap() - distance * 100.0).abs() < 1e-6);
    assert!((properties["bearing"].as_f64().unwrap() - 224.561_494_165_006_74).abs() < 1e-6);
    assert!((properties["dew_point"].as_f64().unwrap() - 9.754_896_015_699_366).abs() < 1e-9);
    assert_eq!(properties["dT"], 10.0);

    assert_eq!(
        dir_entries(dir.path()),
        vec!["two_rows.csv", "two_rows.geojson", "two_rows.windsond"]
    );
}

#[test]
fn trailer_rows_are_dropped_from_outputs() {
    let dir = TempDir::new().unwrap();
    let input = stage(&dir, "flight.csv", &fixture("flight.csv"));

    let summary = convert_file(&input).expect("conversion failed");
    assert_eq!(summary.rows_read, 5);
    assert_eq!(summary.rows_skipped, 1);
    assert_eq!(summary.samples_emitted, 3);

    let windsond = fs::read_to_string(&summary.windsond_path).unwrap();
    assert_eq!(windsond.lines().count(), 4);
}

#[test]
fn in_memory_conversion_counts_suppressed_rows() {
    let content = "Time*Lat/PosX*Long/PosY*Alt/PosZ*Baro*AirT*RH\n\
                   0*10*20*100*1000*20*50\n\
                   10*10.001*20.001*110*999*19*55\n\
                   10*10.002*20.002*115*998*19*55\n\
                   20*10.003*20.003*120*997*18*56\n";
    let mut windsond = Vec::new();
    let mut geojson = Vec::new();

    let stats = convert_content(content, &mut windsond, &mut geojson).unwrap();
    assert_eq!(stats.rows_suppressed, 1);
    assert_eq!(stats.samples_emitted, 2);
    assert_eq!(String::from_utf8(windsond).unwrap().lines().count(), 3);
}

#[test]
fn domain_error_leaves_no_outputs_behind() {
    let dir = TempDir::new().unwrap();
    let content = "Time,Lat/PosX,Long/PosY,Alt/PosZ,Baro,AirT,RH\n\
                   0,10,20,100,1000,20,50\n\
                   10,10.001,20.001,110,999,19,0\n";
    let input = stage(&dir, "dry.csv", content);

    let err = convert_file(&input).unwrap_err();
    match err {
        ConversionError::Domain { line, source } => {
            assert_eq!(line, 3);
            assert_eq!(source, DomainError::ZeroHumidity);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(dir_entries(dir.path()), vec!["dry.csv"]);
}

#[test]
fn missing_cell_in_valid_row_is_an_input_error() {
    let dir = TempDir::new().unwrap();
    let content = "Time,Lat/PosX,Long/PosY,Alt/PosZ,Baro,AirT,RH\n\
                   0,10,20,100,1000,20,50\n\
                   10,10.001,20.001,110,,19,55\n";
    let input = stage(&dir, "gap.csv", content);

    let err = convert_file(&input).unwrap_err();
    match err {
        ConversionError::MissingValue { line, column } => {
            assert_eq!(line, 3);
            assert_eq!(column, "Baro");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(dir_entries(dir.path()), vec!["gap.csv"]);
}

#[test]
fn blank_cells_in_trailer_rows_are_tolerated() {
    let content = "Time,Lat/PosX,Long/PosY,Alt/PosZ,Baro,AirT,RH\n\
                   0,10,20,100,1000,20,50\n\
                   10,10.001,20.001,110,999,19,55\n\
                   ,99,,,,,\n";
    let stats = convert_content(content, Vec::new(), Vec::new()).unwrap();
    assert_eq!(stats.rows_skipped, 1);
    assert_eq!(stats.samples_emitted, 1);
}

#[test]
fn missing_input_file_is_reported_with_path() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.csv");

    let err = convert_file(&input).unwrap_err();
    match err {
        ConversionError::ReadInput { path, .. } => assert_eq!(path, input),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn malformed_input_fails_before_creating_outputs() {
    let dir = TempDir::new().unwrap();
    let input = stage(&dir, "bad.csv", "Time,Lat/PosX\n0,10\n");

    let err = convert_file(&input).unwrap_err();
    assert!(matches!(err, ConversionError::Parse(_)));
    assert_eq!(dir_entries(dir.path()), vec!["bad.csv"]);
}

#[cfg(unix)]
#[test]
fn published_outputs_are_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let input = stage(&dir, "two_rows.csv", &fixture("two_rows.csv"));

    let summary = convert_file(&input).expect("conversion failed");
    for path in [&summary.windsond_path, &summary.geojson_path] {
        let mode = fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644, "{} has mode {:o}", path.display(), mode);
    }
}

#[test]
fn summary_serializes_to_json() {
    let dir = TempDir::new().unwrap();
    let input = stage(&dir, "flight.csv", &fixture("flight.csv"));

    let summary = convert_file(&input).expect("conversion failed");
    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["parser"], "NAMED_COLUMNS");
    assert_eq!(value["rows_read"], 5);
    assert_eq!(value["rows_skipped"], 1);
    assert_eq!(value["samples_emitted"], 3);
    assert_eq!(value["ignored_columns"], serde_json::json!(["Batt", "Sats"]));
    assert_eq!(
        value["windsond_path"].as_str().unwrap(),
        dir.path().join("flight.windsond").to_str().unwrap()
    );
}
