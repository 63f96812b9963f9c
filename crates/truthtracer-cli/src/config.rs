use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.yaml";

/// Overrides `api.base_url` when set.
pub const API_URL_ENV: &str = "TRUTH_TRACER_API_URL";

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Unset means no client-side timeout: a slow analysis is waited out.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageConfig {
    /// Defaults to `<config_root>/data`.
    #[serde(default)]
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TruthTracerConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl TruthTracerConfig {
    pub fn data_dir(&self, root: &Path) -> PathBuf {
        match self.storage.data_dir.as_deref() {
            Some(dir) if !dir.is_empty() => expand_home(Path::new(dir)),
            _ => root.join("data"),
        }
    }
}

/// Expand `${NAME}` from the environment. Unset names expand to nothing and
/// an unterminated `${` is kept as written.
pub fn expand_placeholders(raw: &str) -> String {
    let mut expanded = String::with_capacity(raw.len());
    let mut remaining = raw;
    loop {
        let Some((literal, tail)) = remaining.split_once("${") else {
            expanded.push_str(remaining);
            return expanded;
        };
        let Some((name, rest)) = tail.split_once('}') else {
            expanded.push_str(remaining);
            return expanded;
        };
        expanded.push_str(literal);
        expanded.push_str(&std::env::var(name).unwrap_or_default());
        remaining = rest;
    }
}

/// Replace a leading `~` with `$HOME`.
pub fn expand_home(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(path.strip_prefix("~").unwrap_or(path));
        }
    }
    path.to_path_buf()
}

/// Load `<root>/config.yaml`, falling back to defaults when it does not exist.
pub fn load_config(root: &Path) -> Result<TruthTracerConfig> {
    let path = root.join(CONFIG_FILE);
    let mut config = if path.exists() {
        read_config_file(&path)?
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        TruthTracerConfig::default()
    };

    resolve_config_env(&mut config);
    apply_api_url_override(&mut config, std::env::var(API_URL_ENV).ok());
    validate_config(&config)?;
    Ok(config)
}

pub fn apply_api_url_override(config: &mut TruthTracerConfig, value: Option<String>) {
    if let Some(url) = value.filter(|url| !url.trim().is_empty()) {
        config.api.base_url = url.trim().to_string();
    }
}

pub fn validate_config(config: &TruthTracerConfig) -> Result<()> {
    let base = config.api.base_url.trim();
    let parsed = reqwest::Url::parse(base)
        .map_err(|e| anyhow!("api.base_url is not a valid url '{base}': {e}"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        s => bail!("api.base_url must be an http(s) url, got scheme: {s}"),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        bail!("api.base_url has no host: {base}");
    }
    if config.api.timeout_secs == Some(0) {
        bail!("api.timeout_secs must be greater than zero when set");
    }
    Ok(())
}

fn resolve_config_env(config: &mut TruthTracerConfig) {
    config.api.base_url = expand_placeholders(&config.api.base_url);
    if let Some(dir) = &mut config.storage.data_dir {
        *dir = expand_placeholders(dir);
    }
}

fn read_config_file(path: &Path) -> Result<TruthTracerConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("invalid config in {}", path.display()))
}
