use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn distance_command() {
    Command::cargo_bin("map_annotate_cli")
        .unwrap()
        .args(["distance", "0,0", "0,1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Distance over 2 points: 111.19 km"));
}

#[test]
fn distance_command_with_negative_coordinates() {
    Command::cargo_bin("map_annotate_cli")
        .unwrap()
        .args(["distance", "--legs", "-2.5,51.5", "-2.5,51.5", "-2.5,51.501"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Leg 1: 0 m"))
        .stdout(predicate::str::contains("Distance over 3 points: 111 m"));
}

#[test]
fn basemaps_command() {
    Command::cargo_bin("map_annotate_cli")
        .unwrap()
        .arg("basemaps")
        .assert()
        .success()
        .stdout(predicate::str::contains("voyager"))
        .stdout(predicate::str::contains("OpenStreetMap"));
}

#[test]
fn replay_survives_basemap_switch() {
    let dir = assert_fs::TempDir::new().unwrap();
    let script = dir.child("session.txt");
    script
        .write_str(
            "ready\n\
             tool draw-line\n\
             click -2.50 51.50\n\
             click -2.40 51.55\n\
             finish\n\
             basemap dark\n\
             click 0 0 # ignored while loading\n\
             ready\n\
             tool draw-point\n\
             click -2.45 51.52\n",
        )
        .unwrap();
    let output = dir.child("out.geojson");

    Command::cargo_bin("map_annotate_cli")
        .unwrap()
        .args([
            "replay",
            script.path().to_str().unwrap(),
            "--output",
            output.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Basemap: dark"))
        .stdout(predicate::str::contains("Mode: draw-point"))
        .stdout(predicate::str::contains("Features: 2"))
        .stdout(predicate::str::contains("Wrote"));

    output.assert(predicate::str::contains("LineString"));
    dir.close().unwrap();
}

#[test]
fn replay_measure_with_auto_ready() {
    let file = assert_fs::NamedTempFile::new("measure.txt").unwrap();
    file.write_str("tool measure\nclick 0 0\nclick 0 1\nbasemap osm\n")
        .unwrap();

    Command::cargo_bin("map_annotate_cli")
        .unwrap()
        .args(["replay", file.path().to_str().unwrap(), "--auto-ready"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode: measure"))
        .stdout(predicate::str::contains("Measured: 111.19 km"));
}

#[test]
fn replay_reports_bad_script_line() {
    let file = assert_fs::NamedTempFile::new("bad.txt").unwrap();
    file.write_str("tool draw-point\nwiggle\n").unwrap();

    Command::cargo_bin("map_annotate_cli")
        .unwrap()
        .args(["replay", file.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn replay_uses_config_basemap() {
    let dir = assert_fs::TempDir::new().unwrap();
    let config = dir.child("config.json");
    config
        .write_str(r#"{ "default_basemap": "positron" }"#)
        .unwrap();
    let script = dir.child("empty.txt");
    script.write_str("ready\n").unwrap();

    Command::cargo_bin("map_annotate_cli")
        .unwrap()
        .args([
            "--config",
            config.path().to_str().unwrap(),
            "replay",
            script.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Basemap: positron"))
        .stdout(predicate::str::contains("Features: 0"));
    dir.close().unwrap();
}

#[test]
fn inspect_command() {
    let file = assert_fs::NamedTempFile::new("drawings.geojson").unwrap();
    file.write_str(
        r#"{ "type": "FeatureCollection", "features": [
            {"type": "Feature", "id": 1, "geometry": {"type": "Point", "coordinates": [1.0,2.0]}, "properties": {}},
            {"type": "Feature", "id": 2, "geometry": {"type": "LineString", "coordinates": [[0.0,0.0],[0.0,1.0]]}, "properties": {}}
        ] }"#,
    )
    .unwrap();

    Command::cargo_bin("map_annotate_cli")
        .unwrap()
        .args(["inspect", file.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Point: 1"))
        .stdout(predicate::str::contains("Line 2: 111.19 km"));
}

#[test]
fn inspect_missing_file_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    let missing = dir.child("nope.geojson");

    Command::cargo_bin("map_annotate_cli")
        .unwrap()
        .args(["inspect", missing.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error reading"));
}

#[test]
fn replay_output_write_failure_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    let script = dir.child("script.txt");
    script.write_str("ready\n").unwrap();
    let output = dir.child("no_such_dir").child("out.geojson");

    Command::cargo_bin("map_annotate_cli")
        .unwrap()
        .args([
            "replay",
            script.path().to_str().unwrap(),
            "--output",
            output.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error writing"));
}

#[test]
fn replay_three_d_steps() {
    let file = assert_fs::NamedTempFile::new("three_d.txt").unwrap();
    file.write_str("buildings on\nwms-opacity 40\nbasemap dark\n")
        .unwrap();

    Command::cargo_bin("map_annotate_cli")
        .unwrap()
        .args(["replay", file.path().to_str().unwrap(), "--auto-ready"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Basemap: dark"))
        .stdout(predicate::str::contains("Features: 0"));
}
