use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use cl_core::{LengthUnit, WorkOrderId};
use cl_plan::{
    AnalysisSettings, PlanError, PoolEfficiencyMode, load_settings, save_settings_yaml,
};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

#[test]
fn yaml_roundtrip() {
    let dir = unique_temp_dir("cl_plan_settings_yaml");
    let path = dir.join("settings.yaml");

    let settings = AnalysisSettings {
        length_unit: LengthUnit::Centimeter,
        reusable_remnant_min: 50.0,
        ..Default::default()
    }
    .with_pool_efficiency(PoolEfficiencyMode::Recomputed)
    .with_default_work_order(12);

    save_settings_yaml(&path, &settings).expect("failed to save settings");
    let loaded = load_settings(&path).expect("failed to load settings");
    assert_eq!(loaded, settings);
    assert_eq!(loaded.default_work_order, Some(WorkOrderId::Number(12)));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn json_settings_load() {
    let dir = unique_temp_dir("cl_plan_settings_json");
    let path = dir.join("settings.json");
    fs::write(&path, r#"{"length_unit": "in", "overflow_guard": 40000}"#).unwrap();

    let loaded = load_settings(&path).expect("failed to load settings");
    assert_eq!(loaded.length_unit, LengthUnit::Inch);
    assert_eq!(loaded.overflow_guard, 40000.0);
    assert_eq!(loaded.pool_efficiency, PoolEfficiencyMode::Reported);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn invalid_settings_are_rejected_on_load() {
    let dir = unique_temp_dir("cl_plan_settings_invalid");
    let path = dir.join("settings.yaml");
    fs::write(&path, "conservation_tolerance: -1.0\n").unwrap();

    let err = load_settings(&path).unwrap_err();
    assert!(matches!(err, PlanError::Validation(_)));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn unknown_extension_is_unsupported() {
    let dir = unique_temp_dir("cl_plan_settings_toml");
    let path = dir.join("settings.toml");
    fs::write(&path, "length_unit = \"mm\"\n").unwrap();

    assert!(matches!(
        load_settings(&path),
        Err(PlanError::UnsupportedFormat { .. })
    ));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn demo_settings_match_defaults() {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.pop();
    path.push("demos");
    path.push("settings.yaml");

    let loaded = load_settings(&path).expect("failed to load demo settings");
    assert_eq!(loaded, AnalysisSettings::default());
}
