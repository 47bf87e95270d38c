//! Shared deterministic types for the bootstrap core.
//!
//! These types are produced once from parsed flags and then only read. They
//! must not depend on external state or I/O.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

/// Built-in provider names used when neither a flag nor the config file sets one.
pub const DEFAULT_RUNTIME: &str = "containerd";
pub const DEFAULT_NETWORK_PLUGIN: &str = "cni";
pub const DEFAULT_ID_PREFIX: &str = "ignite";

/// Log severity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    #[value(alias = "warning")]
    Warn,
    Error,
    Fatal,
    Panic,
}

impl LogLevel {
    /// `tracing` filter directive for this level.
    ///
    /// `tracing` stops at `error`, so `fatal` and `panic` collapse onto it.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error | LogLevel::Fatal | LogLevel::Panic => "error",
        }
    }
}

/// Process-wide settings resolved from the command line.
///
/// Built once in `main` and passed by reference; nothing mutates it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalConfig {
    pub log_level: LogLevel,
    /// `--ignite-config`; `None` means "use defaults".
    pub config_path: Option<PathBuf>,
    /// `--runtime`, only when passed explicitly.
    pub runtime: Option<String>,
    /// `--network-plugin`, only when passed explicitly.
    pub network_plugin: Option<String>,
    /// `--id-prefix`, only when passed explicitly.
    pub id_prefix: Option<String>,
    pub quiet: bool,
}

/// Pluggable backend component kinds held by the provider registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProviderKind {
    Storage,
    Runtime,
    NetworkPlugin,
    Client,
}

impl ProviderKind {
    /// Kinds a provider of this kind needs registered before it can be built.
    pub fn dependencies(self) -> &'static [ProviderKind] {
        match self {
            ProviderKind::Storage | ProviderKind::Runtime | ProviderKind::NetworkPlugin => &[],
            ProviderKind::Client => &[
                ProviderKind::Storage,
                ProviderKind::Runtime,
                ProviderKind::NetworkPlugin,
            ],
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::Storage => "storage",
            ProviderKind::Runtime => "runtime",
            ProviderKind::NetworkPlugin => "network-plugin",
            ProviderKind::Client => "client",
        };
        f.write_str(name)
    }
}

/// Provider selection after flags and the config file have been merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub runtime: String,
    pub network_plugin: String,
    pub id_prefix: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            runtime: DEFAULT_RUNTIME.to_string(),
            network_plugin: DEFAULT_NETWORK_PLUGIN.to_string(),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
        }
    }
}
