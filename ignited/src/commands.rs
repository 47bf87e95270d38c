//! Subcommand bodies.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::CommandFactory;
use clap_complete::Shell;
use tracing::info;

use crate::bootstrap::Bootstrapped;
use crate::cli::{Cli, Command};
use crate::core::cell::Cell;
use crate::core::skip::ROOT_COMMAND;
use crate::core::types::GlobalConfig;
use crate::io::config::API_VERSION;
use crate::io::dirs::MANIFEST_DIR;
use crate::io::providers::ProviderRegistry;
use crate::output::TableWriter;

/// Run the body of `command`, writing results to stdout.
///
/// `bootstrapped` must be present for every command that requires bootstrap.
pub fn dispatch(
    command: &Command,
    config: &GlobalConfig,
    bootstrapped: Option<&Bootstrapped>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Version => version(&mut out, config),
        Command::Completion { shell } => completion(*shell, &mut out),
        Command::Daemon { manifest_dir } => {
            let ready = require(command, bootstrapped)?;
            let dir = manifest_dir.as_deref().unwrap_or(Path::new(MANIFEST_DIR));
            info!(
                manifest_dir = %dir.display(),
                id_prefix = %ready.settings.id_prefix,
                "daemon providers ready"
            );
            write_providers(&mut out, &ready.registry, config)
        }
        Command::Gitops { repo, branch } => {
            let ready = require(command, bootstrapped)?;
            info!(
                repo = %repo,
                branch = %branch,
                id_prefix = %ready.settings.id_prefix,
                "gitops providers ready"
            );
            write_providers(&mut out, &ready.registry, config)
        }
    }
}

fn require<'a>(command: &Command, bootstrapped: Option<&'a Bootstrapped>) -> Result<&'a Bootstrapped> {
    bootstrapped.ok_or_else(|| anyhow!("{} requires a completed bootstrap", command.name()))
}

/// Print component versions as a table.
pub fn version<W: Write>(out: W, config: &GlobalConfig) -> Result<()> {
    let mut table = TableWriter::new(out, config.quiet);
    table.write_row(&[Cell::Text("COMPONENT"), Cell::Text("VERSION")]);
    table.write_row(&[Cell::Text(ROOT_COMMAND), Cell::Text(env!("CARGO_PKG_VERSION"))]);
    table.write_row(&[Cell::Text("config-api"), Cell::Text(API_VERSION)]);
    table.flush().context("write version table")
}

/// Write a completion script for `shell`.
pub fn completion<W: Write>(shell: Shell, mut out: W) -> Result<()> {
    clap_complete::generate(shell, &mut Cli::command(), ROOT_COMMAND, &mut out);
    out.flush().context("write completion script")
}

/// Print the populated providers as a KIND/NAME/DETAIL table.
pub fn write_providers<W: Write>(
    out: W,
    registry: &ProviderRegistry,
    config: &GlobalConfig,
) -> Result<()> {
    let mut table = TableWriter::new(out, config.quiet);
    table.write_row(&[Cell::Text("KIND"), Cell::Text("NAME"), Cell::Text("DETAIL")]);
    for provider in registry.iter() {
        table.write_row(&[
            Cell::described(&provider.kind),
            Cell::from(&provider.name),
            Cell::from(&provider.detail),
        ]);
    }
    table.flush().context("write provider table")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ProviderSettings;
    use crate::io::dirs::RuntimePaths;
    use crate::io::providers::{PRELOAD, PROVIDERS, populate, preload};

    fn registry() -> ProviderRegistry {
        let paths = RuntimePaths::new("/data", "/manifests");
        let mut registry = ProviderRegistry::default();
        preload(&mut registry, PRELOAD, &paths).expect("preload");
        populate(&mut registry, PROVIDERS, &ProviderSettings::default(), &paths)
            .expect("populate");
        registry
    }

    #[test]
    fn version_table_lists_components() {
        let mut out = Vec::new();
        version(&mut out, &GlobalConfig::default()).expect("version");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("COMPONENT\t"));
        assert!(lines[1].starts_with("ignited\t"));
        assert!(lines[2].ends_with(API_VERSION));
    }

    #[test]
    fn quiet_version_prints_component_names() {
        let mut out = Vec::new();
        let config = GlobalConfig {
            quiet: true,
            ..GlobalConfig::default()
        };
        version(&mut out, &config).expect("version");
        assert_eq!(String::from_utf8(out).expect("utf8"), "ignited\nconfig-api\n");
    }

    #[test]
    fn provider_table_has_one_row_per_kind() {
        let mut out = Vec::new();
        write_providers(&mut out, &registry(), &GlobalConfig::default()).expect("table");
        let text = String::from_utf8(out).expect("utf8");
        let kinds: Vec<&str> = text
            .lines()
            .map(|line| line.split('\t').next().unwrap_or_default())
            .collect();
        assert_eq!(kinds, ["KIND", "storage", "runtime", "network-plugin", "client"]);
        assert!(text.contains("/run/containerd/containerd.sock"));
    }

    #[test]
    fn bash_completion_mentions_subcommands() {
        let mut out = Vec::new();
        completion(Shell::Bash, &mut out).expect("completion");
        let script = String::from_utf8(out).expect("utf8");
        assert!(script.contains("ignited"));
        assert!(script.contains("gitops"));
    }

    #[test]
    fn privileged_command_without_bootstrap_fails() {
        let command = Command::Daemon { manifest_dir: None };
        let err = dispatch(&command, &GlobalConfig::default(), None).unwrap_err();
        assert!(err.to_string().contains("daemon requires a completed bootstrap"));
    }
}
