// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

const APP_DIR_NAME: &str = "sbwrap";
const CONFIG_FILE_NAME: &str = "sbwrap.toml";
pub const CONFIG_ENV_VAR: &str = "SBWRAP_CONFIG_PATH";
const OUT_DIR_NAME: &str = "out";
const SCRIPTS_DIR_NAME: &str = "scripts";
pub const DEFAULT_LAUNCHER: &str = "srun";
pub const DEFAULT_SIGNAL_LEAD_SECS: u32 = 90;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    out_dir: Option<String>,
    scripts_dir: Option<String>,
    scratch_dir: Option<String>,
    launcher: Option<String>,
    signal_lead_secs: Option<u32>,
    verbose: Option<bool>,
}

/// Resolved settings, loaded once and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub out_dir: PathBuf,
    pub scripts_dir: PathBuf,
    pub scratch_dir: Option<PathBuf>,
    pub launcher: String,
    pub signal_lead_secs: u32,
    pub verbose: bool,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Override,
    Env,
    ConfigFile,
    Default,
}

impl ConfigSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigSource::Override => "override",
            ConfigSource::Env => "env",
            ConfigSource::ConfigFile => "config",
            ConfigSource::Default => "default",
        }
    }
}

#[derive(Debug)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

#[derive(Debug)]
pub struct ConfigReport {
    pub config_path: Option<PathBuf>,
    pub config_path_source: Option<ConfigSource>,
    pub config_file_present: bool,
    pub out_dir: ConfigValue<PathBuf>,
    pub scripts_dir: ConfigValue<PathBuf>,
    pub scratch_dir: ConfigValue<Option<PathBuf>>,
    pub launcher: ConfigValue<String>,
    pub signal_lead_secs: ConfigValue<u32>,
    pub verbose: ConfigValue<bool>,
}

#[derive(Debug)]
pub struct LoadResult {
    pub config: Config,
    pub report: ConfigReport,
}

#[derive(Debug, Default)]
pub struct Overrides {
    pub out_dir: Option<PathBuf>,
    pub scripts_dir: Option<PathBuf>,
    pub verbose: Option<bool>,
}

pub fn load(config_path_override: Option<PathBuf>, overrides: Overrides) -> Result<Config> {
    Ok(load_with_report(config_path_override, overrides)?.config)
}

pub fn load_with_report(
    config_path_override: Option<PathBuf>,
    overrides: Overrides,
) -> Result<LoadResult> {
    let (config_path, config_path_source, required) = match config_path_override {
        Some(path) => (Some(expand_path(path)), Some(ConfigSource::Override), true),
        None => match config_path_from_env()? {
            Some(path) => (Some(expand_path(path)), Some(ConfigSource::Env), true),
            None => match default_config_path().ok() {
                Some(path) => (Some(path), Some(ConfigSource::Default), false),
                None => (None, None, false),
            },
        },
    };
    let config_file_present = config_path
        .as_deref()
        .map(|path| path.exists())
        .unwrap_or(false);

    let file_config = match config_path.as_deref() {
        Some(path) => read_config_file(path, required)?,
        None => FileConfig::default(),
    };
    let config_dir = config_path.as_deref().and_then(|path| path.parent());

    let (out_dir, out_dir_source) = resolve_dir(
        overrides.out_dir,
        file_config.out_dir.as_deref(),
        config_dir,
        OUT_DIR_NAME,
    )?;
    let (scripts_dir, scripts_dir_source) = resolve_dir(
        overrides.scripts_dir,
        file_config.scripts_dir.as_deref(),
        config_dir,
        SCRIPTS_DIR_NAME,
    )?;

    let (scratch_dir, scratch_dir_source) = match file_config.scratch_dir.as_deref() {
        Some(raw) => (Some(resolve_path(raw, config_dir)), ConfigSource::ConfigFile),
        None => (None, ConfigSource::Default),
    };

    let (launcher, launcher_source) = match file_config.launcher {
        Some(launcher) => {
            let trimmed = launcher.trim();
            if trimmed.is_empty() {
                anyhow::bail!("launcher must not be empty");
            }
            (trimmed.to_string(), ConfigSource::ConfigFile)
        }
        None => (DEFAULT_LAUNCHER.to_string(), ConfigSource::Default),
    };

    let (signal_lead_secs, signal_lead_source) = match file_config.signal_lead_secs {
        Some(secs) => (secs, ConfigSource::ConfigFile),
        None => (DEFAULT_SIGNAL_LEAD_SECS, ConfigSource::Default),
    };
    if signal_lead_secs == 0 {
        anyhow::bail!("signal_lead_secs must be greater than 0");
    }

    let (verbose, verbose_source) = match overrides.verbose {
        Some(verbose) => (verbose, ConfigSource::Override),
        None => match file_config.verbose {
            Some(verbose) => (verbose, ConfigSource::ConfigFile),
            None => (false, ConfigSource::Default),
        },
    };

    let config = Config {
        out_dir,
        scripts_dir,
        scratch_dir,
        launcher,
        signal_lead_secs,
        verbose,
        config_path: config_path.clone(),
    };

    let report = ConfigReport {
        config_path,
        config_path_source,
        config_file_present,
        out_dir: ConfigValue {
            value: config.out_dir.clone(),
            source: out_dir_source,
        },
        scripts_dir: ConfigValue {
            value: config.scripts_dir.clone(),
            source: scripts_dir_source,
        },
        scratch_dir: ConfigValue {
            value: config.scratch_dir.clone(),
            source: scratch_dir_source,
        },
        launcher: ConfigValue {
            value: config.launcher.clone(),
            source: launcher_source,
        },
        signal_lead_secs: ConfigValue {
            value: config.signal_lead_secs,
            source: signal_lead_source,
        },
        verbose: ConfigValue {
            value: config.verbose,
            source: verbose_source,
        },
    };

    Ok(LoadResult { config, report })
}

fn resolve_dir(
    override_path: Option<PathBuf>,
    file_value: Option<&str>,
    config_dir: Option<&Path>,
    default_name: &str,
) -> Result<(PathBuf, ConfigSource)> {
    match override_path {
        Some(path) => Ok((absolutize(expand_path(path))?, ConfigSource::Override)),
        None => match file_value {
            Some(raw) => Ok((
                absolutize(resolve_path(raw, config_dir))?,
                ConfigSource::ConfigFile,
            )),
            None => Ok((
                default_data_dir()
                    .with_context(|| {
                        format!(
                            "failed to resolve default {default_name} directory; set {default_name}_dir in the config file"
                        )
                    })?
                    .join(default_name),
                ConfigSource::Default,
            )),
        },
    }
}

fn read_config_file(path: &Path, required: bool) -> Result<FileConfig> {
    if !path.exists() {
        if required {
            anyhow::bail!("config file not found at {}", path.display());
        }
        return Ok(FileConfig::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn resolve_path(raw: &str, base_dir: Option<&Path>) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    let path = PathBuf::from(expanded.as_ref());
    if path.is_absolute() {
        return path;
    }
    match base_dir {
        Some(dir) => dir.join(path),
        None => path,
    }
}

fn expand_path(path: PathBuf) -> PathBuf {
    let path_string = path.to_string_lossy().to_string();
    let expanded = shellexpand::tilde(&path_string);
    PathBuf::from(expanded.as_ref())
}

fn absolutize(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}

fn config_path_from_env() -> Result<Option<PathBuf>> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(value) => {
            if value.is_empty() {
                anyhow::bail!("{CONFIG_ENV_VAR} is set but empty");
            }
            Ok(Some(PathBuf::from(value)))
        }
        None => Ok(None),
    }
}

fn default_config_path() -> Result<PathBuf> {
    Ok(default_config_dir()?.join(CONFIG_FILE_NAME))
}

fn default_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("failed to resolve config directory")?;
    Ok(base.join(APP_DIR_NAME))
}

fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("failed to resolve data directory")?;
    Ok(base.join(APP_DIR_NAME))
}
