use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::client::DEFAULT_DATE_FORMAT;

pub const DEFAULT_CONFIG_FILE: &str = "btr.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub date_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: "info".into(),
            date_format: DEFAULT_DATE_FORMAT.into(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|base| base.join("btr_platform"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

/// Defaults, then the config file, then the environment. An explicit
/// `config_path` must exist; the default `btr.toml` is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            apply_file(&mut settings, &raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
        }
        None => match fs::read_to_string(DEFAULT_CONFIG_FILE) {
            Ok(raw) => apply_file(&mut settings, &raw)
                .with_context(|| format!("invalid config file '{DEFAULT_CONFIG_FILE}'"))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read config file '{DEFAULT_CONFIG_FILE}'"))
            }
        },
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, String>>(raw)?;
    if let Some(v) = file_cfg.get("data_dir") {
        settings.data_dir = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.get("log_level") {
        settings.log_level = v.clone();
    }
    if let Some(v) = file_cfg.get("date_format") {
        settings.date_format = v.clone();
    }
    Ok(())
}

/// `APP__*` names win over the short `BTR_*` names.
fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("BTR_DATA_DIR") {
        settings.data_dir = PathBuf::from(v);
    }
    if let Some(v) = var("APP__DATA_DIR") {
        settings.data_dir = PathBuf::from(v);
    }

    if let Some(v) = var("BTR_LOG_LEVEL") {
        settings.log_level = v;
    }
    if let Some(v) = var("APP__LOG_LEVEL") {
        settings.log_level = v;
    }

    if let Some(v) = var("BTR_DATE_FORMAT") {
        settings.date_format = v;
    }
    if let Some(v) = var("APP__DATE_FORMAT") {
        settings.date_format = v;
    }
}
