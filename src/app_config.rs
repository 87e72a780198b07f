//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use lsweb_core::{Config, OutputFormat};

use crate::cli::Args;

/// Defaults read from `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Concurrent download ceiling. Zero is ignored when merged, like `-c 0`.
    pub max_concurrent: Option<usize>,
    /// Replace existing files.
    pub overwrite: Option<bool>,
    /// Accept invalid TLS certificates.
    pub ignore_cert: Option<bool>,
    /// Sequential batch deadline in seconds.
    pub batch_timeout_secs: Option<u64>,
    /// Listing format.
    pub output_format: Option<OutputFormat>,
}

impl FileConfig {
    /// Validates values that parse but make no sense at runtime.
    pub fn validate(&self) -> Result<()> {
        validate_positive("timeout_secs", self.timeout_secs)?;
        validate_positive("batch_timeout_secs", self.batch_timeout_secs)?;
        Ok(())
    }
}

fn validate_positive(field: &str, value: Option<u64>) -> Result<()> {
    if value == Some(0) {
        bail!("Invalid config value for `{field}`: 0. Expected at least 1");
    }
    Ok(())
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/lsweb/config.toml`
/// 2. `$HOME/.config/lsweb/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("lsweb")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("lsweb")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the config file at the default path, if there is one.
pub fn load_default_file_config() -> Result<Option<FileConfig>> {
    match resolve_default_config_path() {
        Some(path) if path.exists() => load_file_config(&path).map(Some),
        _ => Ok(None),
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "timeout_secs" => {
                cfg.timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "max_concurrent" => {
                let parsed = parse_integer_u64(value).with_context(invalid)?;
                let n = usize::try_from(parsed)
                    .map_err(|_| anyhow!("max_concurrent out of range"))
                    .with_context(invalid)?;
                cfg.max_concurrent = Some(n);
            }
            "overwrite" => {
                cfg.overwrite = Some(parse_boolean(value).with_context(invalid)?);
            }
            "ignore_cert" => {
                cfg.ignore_cert = Some(parse_boolean(value).with_context(invalid)?);
            }
            "batch_timeout_secs" => {
                cfg.batch_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "output_format" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                let format = parsed
                    .parse::<OutputFormat>()
                    .map_err(|e| anyhow!(e))
                    .with_context(invalid)?;
                cfg.output_format = Some(format);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    raw_value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Expected double-quoted string"))
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    if token.starts_with('-') {
        bail!("Expected non-negative integer");
    }
    Ok(token.parse::<u64>()?)
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected 'true' or 'false'"),
    }
}

/// Effective settings for one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub config: Config,
    pub output_format: OutputFormat,
}

/// Merges CLI flags over file values over built-in defaults.
///
/// Boolean flags can only switch a setting on; a file value of `true` stays
/// on when the flag is absent.
#[must_use]
pub fn merge_settings(args: &Args, file: Option<&FileConfig>) -> RunSettings {
    let file = file.cloned().unwrap_or_default();
    let mut config = Config::new();

    if let Some(secs) = args.timeout.or(file.timeout_secs) {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(n) = args.max_concurrent.or(file.max_concurrent) {
        config.set_max_concurrent(n);
    }
    if let Some(secs) = file.batch_timeout_secs {
        config.batch_timeout = Duration::from_secs(secs);
    }
    config.overwrite = args.overwrite || file.overwrite.unwrap_or(false);
    config.ignore_cert_errors = args.ignore_cert || file.ignore_cert.unwrap_or(false);

    RunSettings {
        config,
        output_format: args
            .output_format
            .or(file.output_format)
            .unwrap_or_default(),
    }
}
