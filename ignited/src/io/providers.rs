//! Provider registry and its two-phase preload/populate lifecycle.
//!
//! Preloading registers the providers that are needed before the config file
//! is read. Populating builds the rest from the merged [`ProviderSettings`].

use std::collections::BTreeMap;

use anyhow::{Result, anyhow, bail};
use tracing::debug;

use super::dirs::RuntimePaths;
use crate::core::types::{ProviderKind, ProviderSettings};

/// Supported container runtimes.
pub const RUNTIMES: [&str; 2] = ["containerd", "docker"];
/// Supported network plugins.
pub const NETWORK_PLUGINS: [&str; 2] = ["cni", "docker-bridge"];

/// Kinds registered before the configuration file is applied.
pub const PRELOAD: &[ProviderKind] = &[ProviderKind::Storage];
/// Kinds registered once flags and configuration are merged.
pub const PROVIDERS: &[ProviderKind] = &[
    ProviderKind::Runtime,
    ProviderKind::NetworkPlugin,
    ProviderKind::Client,
];

/// A constructed provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub kind: ProviderKind,
    pub name: String,
    /// Endpoint or location the provider talks to.
    pub detail: String,
}

#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<ProviderKind, Provider>,
}

impl ProviderRegistry {
    /// Register a provider. Each kind may be registered once.
    pub fn register(&mut self, provider: Provider) -> Result<()> {
        if let Some(existing) = self.providers.get(&provider.kind) {
            bail!(
                "duplicate {} provider: {:?} already registered, refusing {:?}",
                provider.kind,
                existing.name,
                provider.name
            );
        }
        debug!(kind = %provider.kind, name = %provider.name, "registered provider");
        self.providers.insert(provider.kind, provider);
        Ok(())
    }

    pub fn get(&self, kind: ProviderKind) -> Option<&Provider> {
        self.providers.get(&kind)
    }

    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    /// Providers ordered by kind.
    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Register the kinds in `set` that do not depend on configuration.
pub fn preload(
    registry: &mut ProviderRegistry,
    set: &[ProviderKind],
    paths: &RuntimePaths,
) -> Result<()> {
    for kind in set {
        let provider = build(*kind, None, paths)?;
        registry.register(provider)?;
    }
    Ok(())
}

/// Build and register every kind in `set`, in order, from merged settings.
pub fn populate(
    registry: &mut ProviderRegistry,
    set: &[ProviderKind],
    settings: &ProviderSettings,
    paths: &RuntimePaths,
) -> Result<()> {
    for kind in set {
        for dep in kind.dependencies() {
            if !registry.contains(*dep) {
                bail!("{kind} provider depends on unregistered {dep} provider");
            }
        }
        let provider = build(*kind, Some(settings), paths)?;
        registry.register(provider)?;
    }
    Ok(())
}

fn build(
    kind: ProviderKind,
    settings: Option<&ProviderSettings>,
    paths: &RuntimePaths,
) -> Result<Provider> {
    let (name, detail) = match kind {
        ProviderKind::Storage => (
            "filesystem".to_string(),
            paths.data_dir.display().to_string(),
        ),
        ProviderKind::Runtime => {
            let settings = require_settings(kind, settings)?;
            let detail = match settings.runtime.as_str() {
                "containerd" => "/run/containerd/containerd.sock",
                "docker" => "/var/run/docker.sock",
                other => bail!(
                    "unknown runtime {other:?} (expected one of: {})",
                    RUNTIMES.join(", ")
                ),
            };
            (settings.runtime.clone(), detail.to_string())
        }
        ProviderKind::NetworkPlugin => {
            let settings = require_settings(kind, settings)?;
            let detail = match settings.network_plugin.as_str() {
                "cni" => "/etc/cni/net.d",
                "docker-bridge" => "docker0",
                other => bail!(
                    "unknown network plugin {other:?} (expected one of: {})",
                    NETWORK_PLUGINS.join(", ")
                ),
            };
            (settings.network_plugin.clone(), detail.to_string())
        }
        ProviderKind::Client => {
            let settings = require_settings(kind, settings)?;
            (
                "ignite".to_string(),
                format!("id prefix {}", settings.id_prefix),
            )
        }
    };
    Ok(Provider { kind, name, detail })
}

fn require_settings(
    kind: ProviderKind,
    settings: Option<&ProviderSettings>,
) -> Result<&ProviderSettings> {
    settings.ok_or_else(|| anyhow!("{kind} provider cannot be built before configuration is applied"))
}
