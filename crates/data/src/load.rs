use crate::schema::{MachineFile, Preset};
use anyhow::{bail, Context};
use minislot_core::{MachineConfig, SymbolDef};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const MACHINE_FILE: &str = "machine.json";
const SYMBOLS_FILE: &str = "symbols.json";

pub fn load_machine_config(dir: &Path) -> anyhow::Result<MachineConfig> {
    load_machine_config_with_locale(dir, None)
}

pub fn load_machine_config_with_locale(
    dir: &Path,
    locale: Option<&str>,
) -> anyhow::Result<MachineConfig> {
    let locale = normalize_locale(locale);
    let machine: MachineFile = load_json(dir.join(MACHINE_FILE))?;
    let mut symbols: Vec<SymbolDef> = load_json(dir.join(SYMBOLS_FILE))?;
    for symbol in &mut symbols {
        symbol.display_name = localize_name(&symbol.display_name, &symbol.names, &locale);
    }
    let label = machine
        .name
        .clone()
        .unwrap_or_else(|| dir.display().to_string());
    let config = machine.into_config(symbols);
    config
        .validate()
        .with_context(|| format!("validate machine {label}"))?;
    log::info!(
        "loaded machine {label}: {} symbols, {} lines",
        config.symbols.len(),
        config.paylines.lines().len()
    );
    Ok(config)
}

/// Loads `dir` when it holds a machine, otherwise falls back to `preset`.
pub fn load_machine_or_preset(
    dir: &Path,
    preset: Preset,
    locale: Option<&str>,
) -> anyhow::Result<MachineConfig> {
    if dir.join(MACHINE_FILE).exists() {
        return load_machine_config_with_locale(dir, locale);
    }
    log::info!(
        "no {} in {}, using {} preset",
        MACHINE_FILE,
        dir.display(),
        preset.name()
    );
    Ok(localize_config(preset.config(), locale))
}

pub fn localize_config(mut config: MachineConfig, locale: Option<&str>) -> MachineConfig {
    let locale = normalize_locale(locale);
    for symbol in &mut config.symbols {
        symbol.display_name = localize_name(&symbol.display_name, &symbol.names, &locale);
    }
    config
}

pub fn parse_preset(name: &str) -> anyhow::Result<Preset> {
    match Preset::from_name(name) {
        Some(preset) => Ok(preset),
        None => bail!("unknown machine preset '{name}' (expected classic or deluxe)"),
    }
}

fn localize_name(base: &str, names: &HashMap<String, String>, locale: &str) -> String {
    let locale = normalize_locale(Some(locale));
    if locale == "en_US" {
        return base.to_string();
    }
    if let Some(value) = names.get(&locale) {
        return value.clone();
    }
    let mut keys: Vec<&String> = names.keys().collect();
    keys.sort();
    keys.into_iter()
        .find(|key| normalize_locale(Some(key.as_str())) == locale)
        .and_then(|key| names.get(key))
        .cloned()
        .unwrap_or_else(|| base.to_string())
}

pub fn normalize_locale(locale: Option<&str>) -> String {
    let raw = locale.unwrap_or("en_US").trim();
    if raw.is_empty() {
        return "en_US".to_string();
    }
    let lowered = raw.replace('-', "_").to_ascii_lowercase();
    match lowered.as_str() {
        "zh" | "zh_cn" | "zh_hans" | "zh_hans_cn" => "zh_CN".to_string(),
        "en" | "en_us" => "en_US".to_string(),
        _ => raw.replace('-', "_"),
    }
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
