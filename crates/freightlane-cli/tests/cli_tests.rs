use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const PROVIDER_VARS: &[&str] = &[
    "FREIGHTLANE_NOMINATIM_URL",
    "FREIGHTLANE_OSRM_URL",
    "FREIGHTLANE_SEAROUTE_DIR",
    "FREIGHTLANE_PLACES_PATH",
    "FREIGHTLANE_PORTS_PATH",
];

/// Offline command: built-in catalog, great-circle providers, quiet logs.
fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("freightlane-cli");
    for var in PROVIDER_VARS {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "error");
    cmd
}

#[test]
fn port_to_port_route_renders_text_summary() {
    cli()
        .args(["route", "--from", "Shanghai", "--to", "Rotterdam"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Port to Port: Shanghai -> Rotterdam",
        ))
        .stdout(predicate::str::contains("1: Sea: Shanghai -> Rotterdam"));
}

#[test]
fn gazetteer_places_enable_inland_routes() {
    let dir = tempdir().expect("create temp dir");
    let places = dir.path().join("places.csv");
    fs::write(&places, "name,lat,lon\nBogotá,4.711,-74.072\n").expect("write gazetteer");

    let output = cli()
        .arg("--format")
        .arg("json")
        .arg("--places")
        .arg(&places)
        .args(["route", "--from", "Shanghai", "--to", "Bogotá"])
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(value["route"]["kind"], "port_to_inland");
    assert_eq!(value["route"]["segments"][0]["mode"], "sea");
    assert_eq!(value["route"]["segments"][1]["mode"], "land");
    assert!(value["validation"]["is_valid"].is_boolean());
}

#[test]
fn geojson_format_outputs_feature_collection() {
    cli()
        .args(["--format", "geojson", "route", "--from", "Yokohama", "--to", "Vancouver"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"FeatureCollection\""))
        .stdout(predicate::str::contains("\"subSegmentIndex\": 1"));
}

#[test]
fn unknown_location_fails_with_suggestion() {
    cli()
        .args(["route", "--from", "Rotterdm", "--to", "Shanghai"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Did you mean 'Rotterdam'?"));
}

#[test]
fn ports_lists_builtin_catalog() {
    cli()
        .arg("ports")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("23 ports"))
        .stdout(predicate::str::contains("Cape Town"));
}

#[test]
fn custom_port_catalog_replaces_builtin() {
    let dir = tempdir().expect("create temp dir");
    let ports = dir.path().join("ports.csv");
    fs::write(
        &ports,
        "Port Name,Country,Latitude,Longitude\nValparaiso,Chile,-33.04,-71.63\nCallao,Peru,-12.05,-77.15\n",
    )
    .expect("write catalog");

    cli()
        .arg("--ports")
        .arg(&ports)
        .arg("ports")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("2 ports"))
        .stdout(predicate::str::contains("Valparaiso"));
}

#[test]
fn classify_coordinates() {
    cli()
        .args(["classify", "--lat", "4.711", "--lon", "-74.072"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inland (nearest port Buenaventura"));
}

#[test]
fn classify_requires_a_target() {
    cli()
        .arg("classify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("provide either a place name"));
}
