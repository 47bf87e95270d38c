//! Command-line definition for `ignited`.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::core::command_tree::CommandTree;
use crate::core::skip::ROOT_COMMAND;
use crate::core::types::{GlobalConfig, LogLevel};

#[derive(Debug, Parser)]
#[command(
    name = ROOT_COMMAND,
    version,
    about = "ignited: run Firecracker VMs declaratively through a manifest directory or Git",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Log level.
    #[arg(long, global = true, value_enum, value_name = "LEVEL", default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Container runtime backing the VMs (containerd, docker).
    #[arg(long, global = true, value_name = "NAME")]
    pub runtime: Option<String>,

    /// Network plugin for VM networking (cni, docker-bridge).
    #[arg(long, global = true, value_name = "NAME")]
    pub network_plugin: Option<String>,

    /// Prefix for VM and container identifiers.
    #[arg(long, global = true, value_name = "PREFIX")]
    pub id_prefix: Option<String>,

    /// Ignite configuration file (TOML). Empty means built-in defaults.
    #[arg(long = "ignite-config", global = true, value_name = "PATH")]
    pub config_path: Option<String>,

    /// Print only the first column of tabular output, without headers.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print version information.
    Version,
    /// Generate a shell completion script.
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Reconcile VMs from a manifest directory.
    Daemon {
        /// Directory watched for VM manifests.
        #[arg(long, value_name = "DIR")]
        manifest_dir: Option<PathBuf>,
    },
    /// Reconcile VMs from a Git repository.
    Gitops {
        /// Repository URL.
        repo: String,
        /// Branch to follow.
        #[arg(long, default_value = "master")]
        branch: String,
    },
}

impl Command {
    /// Subcommand name as it appears on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Version => "version",
            Command::Completion { .. } => "completion",
            Command::Daemon { .. } => "daemon",
            Command::Gitops { .. } => "gitops",
        }
    }
}

impl Cli {
    /// Settings shared by every command body.
    pub fn global_config(&self) -> GlobalConfig {
        GlobalConfig {
            log_level: self.log_level,
            config_path: self
                .config_path
                .as_deref()
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            runtime: self.runtime.clone(),
            network_plugin: self.network_plugin.clone(),
            id_prefix: self.id_prefix.clone(),
            quiet: self.quiet,
        }
    }
}

/// Command tree of the full CLI, including clap's generated `help`.
pub fn command_tree() -> CommandTree {
    let mut command = Cli::command();
    command.build();
    CommandTree::from_clap(&command)
}
