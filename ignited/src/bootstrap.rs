//! Ordered pre-run pipeline executed before privileged command bodies.
//!
//! The [`BootstrapHost`] trait decouples the pipeline from the collaborators
//! that touch the system (uid check, directories, config file, logger). Tests
//! drive the pipeline with a recording host instead of [`SystemHost`].
//!
//! Step order is fixed: directories exist before storage is preloaded, flags
//! are parsed before the config file is merged over them, and the merged
//! settings exist before the remaining providers are built.

use std::fmt;

use anyhow::Result;
use tracing::{debug, info};

use crate::core::command_tree::CommandNode;
use crate::core::types::{GlobalConfig, LogLevel, ProviderKind, ProviderSettings};
use crate::errors::BootstrapError;
use crate::io::config::apply_configuration;
use crate::io::dirs::{RuntimePaths, ensure_directories};
use crate::io::privilege::check_root;
use crate::io::providers::{PRELOAD, PROVIDERS, ProviderRegistry, populate, preload};
use crate::logging::LogHandle;

/// Pipeline steps in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    SetLogLevel,
    CheckPrivilege,
    EnsureDirectories,
    PreloadProviders,
    ApplyConfiguration,
    PopulateProviders,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::SetLogLevel,
        Step::CheckPrivilege,
        Step::EnsureDirectories,
        Step::PreloadProviders,
        Step::ApplyConfiguration,
        Step::PopulateProviders,
    ];
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::SetLogLevel => "set log level",
            Step::CheckPrivilege => "check privilege",
            Step::EnsureDirectories => "ensure directories",
            Step::PreloadProviders => "preload providers",
            Step::ApplyConfiguration => "apply configuration",
            Step::PopulateProviders => "populate providers",
        };
        f.write_str(name)
    }
}

/// Collaborators invoked by the pipeline, one method per step.
pub trait BootstrapHost {
    fn set_log_level(&mut self, level: LogLevel);
    fn check_privilege(&mut self) -> Result<()>;
    fn ensure_directories(&mut self) -> Result<()>;
    fn preload_providers(
        &mut self,
        registry: &mut ProviderRegistry,
        set: &[ProviderKind],
    ) -> Result<()>;
    fn apply_configuration(&mut self, config: &GlobalConfig) -> Result<ProviderSettings>;
    fn populate_providers(
        &mut self,
        registry: &mut ProviderRegistry,
        set: &[ProviderKind],
        settings: &ProviderSettings,
    ) -> Result<()>;
}

impl<H: BootstrapHost + ?Sized> BootstrapHost for &mut H {
    fn set_log_level(&mut self, level: LogLevel) {
        (**self).set_log_level(level);
    }

    fn check_privilege(&mut self) -> Result<()> {
        (**self).check_privilege()
    }

    fn ensure_directories(&mut self) -> Result<()> {
        (**self).ensure_directories()
    }

    fn preload_providers(
        &mut self,
        registry: &mut ProviderRegistry,
        set: &[ProviderKind],
    ) -> Result<()> {
        (**self).preload_providers(registry, set)
    }

    fn apply_configuration(&mut self, config: &GlobalConfig) -> Result<ProviderSettings> {
        (**self).apply_configuration(config)
    }

    fn populate_providers(
        &mut self,
        registry: &mut ProviderRegistry,
        set: &[ProviderKind],
        settings: &ProviderSettings,
    ) -> Result<()> {
        (**self).populate_providers(registry, set, settings)
    }
}

/// Host backed by the real system.
pub struct SystemHost {
    paths: RuntimePaths,
    log: LogHandle,
}

impl SystemHost {
    pub fn new(paths: RuntimePaths, log: LogHandle) -> Self {
        Self { paths, log }
    }
}

impl BootstrapHost for SystemHost {
    fn set_log_level(&mut self, level: LogLevel) {
        self.log.set_level(level);
    }

    fn check_privilege(&mut self) -> Result<()> {
        check_root()
    }

    fn ensure_directories(&mut self) -> Result<()> {
        ensure_directories(&self.paths)
    }

    fn preload_providers(
        &mut self,
        registry: &mut ProviderRegistry,
        set: &[ProviderKind],
    ) -> Result<()> {
        preload(registry, set, &self.paths)
    }

    fn apply_configuration(&mut self, config: &GlobalConfig) -> Result<ProviderSettings> {
        apply_configuration(config)
    }

    fn populate_providers(
        &mut self,
        registry: &mut ProviderRegistry,
        set: &[ProviderKind],
        settings: &ProviderSettings,
    ) -> Result<()> {
        populate(registry, set, settings, &self.paths)
    }
}

/// State handed to command bodies after a completed bootstrap.
#[derive(Debug)]
pub struct Bootstrapped {
    pub settings: ProviderSettings,
    pub registry: ProviderRegistry,
}

/// Runs the pipeline once. `run` consumes the bootstrapper, so a process
/// cannot re-enter the pipeline through the same value.
pub struct Bootstrapper<H> {
    host: H,
}

impl<H: BootstrapHost> Bootstrapper<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Prepare the process for `command`.
    ///
    /// The log level is always applied. Commands that do not require a
    /// bootstrap return `Ok(None)` right after; all others run the remaining
    /// steps in order and stop at the first failure.
    pub fn run(
        mut self,
        command: &CommandNode,
        config: &GlobalConfig,
    ) -> Result<Option<Bootstrapped>, BootstrapError> {
        self.host.set_log_level(config.log_level);

        if !command.requires_bootstrap {
            debug!(command = %command.name, "bootstrap not required");
            return Ok(None);
        }
        debug!(command = %command.name, "bootstrapping");

        debug!(step = %Step::CheckPrivilege, "running step");
        self.host
            .check_privilege()
            .map_err(|cause| BootstrapError::Privilege {
                step: Step::CheckPrivilege,
                cause,
            })?;

        debug!(step = %Step::EnsureDirectories, "running step");
        self.host
            .ensure_directories()
            .map_err(|cause| BootstrapError::Environment {
                step: Step::EnsureDirectories,
                cause,
            })?;

        debug!(step = %Step::PreloadProviders, "running step");
        let mut registry = ProviderRegistry::default();
        self.host
            .preload_providers(&mut registry, PRELOAD)
            .map_err(|cause| BootstrapError::Provider {
                step: Step::PreloadProviders,
                cause,
            })?;

        debug!(step = %Step::ApplyConfiguration, "running step");
        let settings =
            self.host
                .apply_configuration(config)
                .map_err(|cause| BootstrapError::Config {
                    step: Step::ApplyConfiguration,
                    cause,
                })?;

        debug!(step = %Step::PopulateProviders, "running step");
        self.host
            .populate_providers(&mut registry, PROVIDERS, &settings)
            .map_err(|cause| BootstrapError::Provider {
                step: Step::PopulateProviders,
                cause,
            })?;

        info!(
            command = %command.name,
            providers = registry.len(),
            runtime = %settings.runtime,
            network_plugin = %settings.network_plugin,
            "bootstrap complete"
        );
        Ok(Some(Bootstrapped { settings, registry }))
    }
}
