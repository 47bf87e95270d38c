//! Test-only helpers: a recording bootstrap host and temporary layouts.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use crate::bootstrap::{BootstrapHost, Step};
use crate::core::command_tree::CommandNode;
use crate::core::types::{GlobalConfig, LogLevel, ProviderKind, ProviderSettings};
use crate::io::config::resolve_settings;
use crate::io::dirs::RuntimePaths;
use crate::io::providers::{ProviderRegistry, populate, preload};

/// Create a root-level command node.
pub fn node(name: &str, requires_bootstrap: bool) -> CommandNode {
    CommandNode {
        name: name.to_string(),
        parent: None,
        children: Vec::new(),
        requires_bootstrap,
    }
}

/// Host that records each step it is asked to run and can fail one on demand.
///
/// Providers are built for real against an unused path layout; nothing is
/// written to disk.
#[derive(Debug)]
pub struct RecordingHost {
    pub calls: Vec<Step>,
    pub log_level: Option<LogLevel>,
    fail_at: Option<Step>,
    paths: RuntimePaths,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            log_level: None,
            fail_at: None,
            paths: RuntimePaths::new("/nonexistent/firecracker", "/nonexistent/manifests"),
        }
    }

    /// Host whose `step` returns an error after being recorded.
    pub fn failing_at(step: Step) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::new()
        }
    }

    fn record(&mut self, step: Step) -> Result<()> {
        self.calls.push(step);
        if self.fail_at == Some(step) {
            return Err(anyhow!("injected failure at {step}"));
        }
        Ok(())
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapHost for RecordingHost {
    fn set_log_level(&mut self, level: LogLevel) {
        self.calls.push(Step::SetLogLevel);
        self.log_level = Some(level);
    }

    fn check_privilege(&mut self) -> Result<()> {
        self.record(Step::CheckPrivilege)
    }

    fn ensure_directories(&mut self) -> Result<()> {
        self.record(Step::EnsureDirectories)
    }

    fn preload_providers(
        &mut self,
        registry: &mut ProviderRegistry,
        set: &[ProviderKind],
    ) -> Result<()> {
        self.record(Step::PreloadProviders)?;
        preload(registry, set, &self.paths)
    }

    fn apply_configuration(&mut self, config: &GlobalConfig) -> Result<ProviderSettings> {
        self.record(Step::ApplyConfiguration)?;
        Ok(resolve_settings(config, None))
    }

    fn populate_providers(
        &mut self,
        registry: &mut ProviderRegistry,
        set: &[ProviderKind],
        settings: &ProviderSettings,
    ) -> Result<()> {
        self.record(Step::PopulateProviders)?;
        populate(registry, set, settings, &self.paths)
    }
}

/// Runtime layout rooted in a temporary directory.
pub struct TempLayout {
    dir: tempfile::TempDir,
    pub paths: RuntimePaths,
}

impl TempLayout {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        let paths = RuntimePaths::new(
            dir.path().join("var/lib/firecracker"),
            dir.path().join("etc/firecracker/manifests"),
        );
        Ok(Self { dir, paths })
    }

    /// Write a config file next to the layout and return its path.
    pub fn write_config(&self, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join("ignite.toml");
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}
