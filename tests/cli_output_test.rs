use std::process::Command;
use tempfile::TempDir;

const DATA: &str = "Spain:\n  flights_price: 50\n  cost_living_index: 70\n  cost_per_day: 80\n";

const WORLD: &str = r#"{"type": "FeatureCollection", "features": [
  {"type": "Feature", "properties": {"NAME": "Spain"},
   "geometry": {"type": "Polygon", "coordinates": [[[-9.3, 36.0], [3.3, 36.0], [3.3, 43.8], [-9.3, 36.0]]]}}
]}"#;

#[test]
fn test_cli_reports_on_stderr_only() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("data.yml"), DATA).unwrap();
    std::fs::write(temp_dir.path().join("world.geojson"), WORLD).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_travel-map"))
        .current_dir(temp_dir.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .args(["--data", "data.yml", "--boundaries", "world.geojson", "--output", "map.html"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Map saved to: map.html"), "stderr: {stderr}");
    assert!(temp_dir.path().join("map.html").exists());
}

#[test]
fn test_cli_failure_exits_non_zero_without_stdout() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("data.yml"), DATA).unwrap();
    std::fs::write(temp_dir.path().join("world.geojson"), WORLD).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_travel-map"))
        .current_dir(temp_dir.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .args(["--data", "data.yml", "--boundaries", "world.geojson", "--reference", "France"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("France"));
    assert!(!temp_dir.path().join("map.html").exists());
}
