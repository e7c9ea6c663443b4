use minislot_core::{MachineConfig, PaylineSet};
use minislot_data::{
    load_machine_config, load_machine_config_with_locale, load_machine_or_preset, Preset,
};
use std::fs;
use std::path::{Path, PathBuf};

fn assets_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("assets")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("minislot-data-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn copy_assets(from: &Path, to: &Path) {
    for file in ["machine.json", "symbols.json"] {
        fs::copy(from.join(file), to.join(file)).expect("copy asset");
    }
}

#[test]
fn bundled_deluxe_matches_builtin_preset() {
    let loaded = load_machine_config(&assets_root()).expect("load deluxe");
    assert_eq!(loaded, MachineConfig::deluxe());
}

#[test]
fn bundled_classic_matches_builtin_preset() {
    let loaded = load_machine_config(&assets_root().join("classic")).expect("load classic");
    let preset = MachineConfig::classic();
    assert_eq!(loaded.paylines, PaylineSet::WithVerticals);
    assert_eq!(loaded.spin_cost, 0);
    assert!(loaded.bonus.is_none());
    assert_eq!(loaded.small_win, preset.small_win);
    assert_eq!(loaded.jackpot, preset.jackpot);
    assert_eq!(loaded.symbols, preset.symbols);
}

#[test]
fn locale_renames_symbols() {
    let loaded =
        load_machine_config_with_locale(&assets_root(), Some("zh-CN")).expect("load deluxe");
    let names: Vec<&str> = loaded
        .symbols
        .iter()
        .map(|symbol| symbol.display_name.as_str())
        .collect();
    assert_eq!(names[0], "蓝球");
    assert_eq!(names[7], "蓝七");

    let english = load_machine_config_with_locale(&assets_root(), Some("en")).expect("load");
    assert_eq!(english.symbols[0].display_name, "Blue Ball");
}

#[test]
fn missing_file_names_the_path() {
    let dir = scratch_dir("missing");
    fs::copy(
        assets_root().join("machine.json"),
        dir.join("machine.json"),
    )
    .expect("copy machine");
    let err = load_machine_config(&dir).expect_err("symbols.json missing");
    assert!(format!("{err:#}").contains("symbols.json"));
}

#[test]
fn invalid_machine_is_rejected() {
    let dir = scratch_dir("invalid");
    copy_assets(&assets_root(), &dir);
    let raw = fs::read_to_string(dir.join("machine.json")).expect("read");
    fs::write(
        dir.join("machine.json"),
        raw.replace("\"trigger_symbol\": 5", "\"trigger_symbol\": 42"),
    )
    .expect("write");
    let err = load_machine_config(&dir).expect_err("unknown trigger symbol");
    let text = format!("{err:#}");
    assert!(text.contains("bonus.trigger_symbol"), "{text}");
}

#[test]
fn malformed_json_reports_parse_error() {
    let dir = scratch_dir("malformed");
    copy_assets(&assets_root(), &dir);
    fs::write(dir.join("symbols.json"), "[{ \"id\": 0 ").expect("write");
    let err = load_machine_config(&dir).expect_err("bad json");
    assert!(format!("{err:#}").starts_with("parse "));
}

#[test]
fn preset_used_only_without_machine_file() {
    let from_assets =
        load_machine_or_preset(&assets_root(), Preset::Classic, None).expect("assets win");
    assert_eq!(from_assets.paylines, PaylineSet::Standard);

    let empty = scratch_dir("empty");
    let fallback = load_machine_or_preset(&empty, Preset::Classic, None).expect("preset");
    assert_eq!(fallback, MachineConfig::classic());
}
