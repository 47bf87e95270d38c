//! End-to-end pipeline tests against a temporary runtime layout.
//!
//! The host below uses the real directory, config and provider collaborators
//! and only replaces the root check, so the tests run unprivileged.

use anyhow::Result;

use ignited::bootstrap::{BootstrapHost, Bootstrapper, Step};
use ignited::core::types::{GlobalConfig, LogLevel, ProviderKind, ProviderSettings};
use ignited::errors::BootstrapError;
use ignited::io::config::apply_configuration;
use ignited::io::dirs::{RuntimePaths, ensure_directories};
use ignited::io::providers::{ProviderRegistry, populate, preload};
use ignited::test_support::{TempLayout, node};

struct TempHost {
    paths: RuntimePaths,
    populated: bool,
}

impl TempHost {
    fn new(paths: RuntimePaths) -> Self {
        Self {
            paths,
            populated: false,
        }
    }
}

impl BootstrapHost for TempHost {
    fn set_log_level(&mut self, _level: LogLevel) {}

    fn check_privilege(&mut self) -> Result<()> {
        Ok(())
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
        self.populated = true;
        populate(registry, set, settings, &self.paths)
    }
}

#[test]
fn pipeline_creates_layout_and_applies_config() {
    let layout = TempLayout::new().expect("layout");
    let config_path = layout
        .write_config(
            "api_version = \"ignite.weave.works/v1alpha4\"\n\
             kind = \"Configuration\"\n\
             [spec]\n\
             runtime = \"docker\"\n\
             id_prefix = \"lab\"\n",
        )
        .expect("config");
    let config = GlobalConfig {
        config_path: Some(config_path),
        network_plugin: Some("docker-bridge".to_string()),
        ..GlobalConfig::default()
    };
    let mut host = TempHost::new(layout.paths.clone());

    let done = Bootstrapper::new(&mut host)
        .run(&node("daemon", true), &config)
        .expect("bootstrap")
        .expect("bootstrapped");

    for dir in layout.paths.all() {
        assert!(dir.is_dir(), "{}", dir.display());
    }
    let runtime = done.registry.get(ProviderKind::Runtime).expect("runtime");
    assert_eq!(runtime.name, "docker");
    let plugin = done
        .registry
        .get(ProviderKind::NetworkPlugin)
        .expect("network plugin");
    assert_eq!(plugin.name, "docker-bridge");
    let client = done.registry.get(ProviderKind::Client).expect("client");
    assert_eq!(client.detail, "id prefix lab");
}

#[test]
fn invalid_config_stops_before_population() {
    let layout = TempLayout::new().expect("layout");
    let config_path = layout
        .write_config("kind = \"VM\"\n")
        .expect("config");
    let config = GlobalConfig {
        config_path: Some(config_path),
        ..GlobalConfig::default()
    };
    let mut host = TempHost::new(layout.paths.clone());

    let err = Bootstrapper::new(&mut host)
        .run(&node("gitops", true), &config)
        .unwrap_err();

    assert!(matches!(err, BootstrapError::Config { .. }));
    assert_eq!(err.step(), Step::ApplyConfiguration);
    assert!(format!("{:#}", err.cause()).contains("unsupported kind"));
    assert!(!host.populated);
}

#[test]
fn unknown_runtime_flag_fails_population() {
    let layout = TempLayout::new().expect("layout");
    let config = GlobalConfig {
        runtime: Some("podman".to_string()),
        ..GlobalConfig::default()
    };
    let mut host = TempHost::new(layout.paths.clone());

    let err = Bootstrapper::new(&mut host)
        .run(&node("daemon", true), &config)
        .unwrap_err();

    assert!(matches!(err, BootstrapError::Provider { .. }));
    assert_eq!(err.step(), Step::PopulateProviders);
}
