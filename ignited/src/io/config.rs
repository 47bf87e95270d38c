//! Ignite configuration file passed via `--ignite-config`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::debug;

use super::providers::{NETWORK_PLUGINS, RUNTIMES};
use crate::core::types::{GlobalConfig, ProviderSettings};

pub const API_VERSION: &str = "ignite.weave.works/v1alpha4";
pub const KIND: &str = "Configuration";

/// Configuration document (TOML).
///
/// Every field is optional; anything left out falls back to flags or defaults.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct IgniteConfig {
    pub api_version: String,
    pub kind: String,
    pub spec: ConfigSpec,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigSpec {
    pub runtime: Option<String>,
    pub network_plugin: Option<String>,
    pub id_prefix: Option<String>,
}

impl Default for IgniteConfig {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            spec: ConfigSpec::default(),
        }
    }
}

impl IgniteConfig {
    pub fn validate(&self) -> Result<()> {
        if self.api_version != API_VERSION {
            return Err(anyhow!(
                "unsupported api_version {:?} (expected {API_VERSION:?})",
                self.api_version
            ));
        }
        if self.kind != KIND {
            return Err(anyhow!(
                "unsupported kind {:?} (expected {KIND:?})",
                self.kind
            ));
        }
        if let Some(runtime) = &self.spec.runtime
            && !RUNTIMES.contains(&runtime.as_str())
        {
            return Err(anyhow!(
                "spec.runtime {runtime:?} is not one of: {}",
                RUNTIMES.join(", ")
            ));
        }
        if let Some(plugin) = &self.spec.network_plugin
            && !NETWORK_PLUGINS.contains(&plugin.as_str())
        {
            return Err(anyhow!(
                "spec.network_plugin {plugin:?} is not one of: {}",
                NETWORK_PLUGINS.join(", ")
            ));
        }
        if let Some(prefix) = &self.spec.id_prefix
            && prefix.trim().is_empty()
        {
            return Err(anyhow!("spec.id_prefix must not be empty"));
        }
        Ok(())
    }
}

/// Load and validate a config file. A missing file is an error.
pub fn load_config(path: &Path) -> Result<IgniteConfig> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: IgniteConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Merge flags and an optional config file: flag > file > built-in default.
pub fn resolve_settings(flags: &GlobalConfig, file: Option<&IgniteConfig>) -> ProviderSettings {
    let spec = file.map(|cfg| &cfg.spec);
    let defaults = ProviderSettings::default();
    let pick = |flag: &Option<String>, from_file: Option<&String>, default: String| {
        flag.clone().or_else(|| from_file.cloned()).unwrap_or(default)
    };
    ProviderSettings {
        runtime: pick(
            &flags.runtime,
            spec.and_then(|s| s.runtime.as_ref()),
            defaults.runtime,
        ),
        network_plugin: pick(
            &flags.network_plugin,
            spec.and_then(|s| s.network_plugin.as_ref()),
            defaults.network_plugin,
        ),
        id_prefix: pick(
            &flags.id_prefix,
            spec.and_then(|s| s.id_prefix.as_ref()),
            defaults.id_prefix,
        ),
    }
}

/// Load `config.config_path` and merge it with the flags. An unset or empty
/// path leaves only flags and defaults.
pub fn apply_configuration(config: &GlobalConfig) -> Result<ProviderSettings> {
    let path = config
        .config_path
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty());
    let file = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            Some(load_config(path)?)
        }
        None => None,
    };
    Ok(resolve_settings(config, file.as_ref()))
}
