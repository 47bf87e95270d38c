//! `ignited`: run Firecracker VMs declaratively through a manifest directory
//! or Git.

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::error;

use ignited::bootstrap::{Bootstrapper, SystemHost};
use ignited::cli::{Cli, command_tree};
use ignited::io::dirs::RuntimePaths;
use ignited::logging::{self, LogHandle};
use ignited::{commands, exit_codes};

fn main() {
    let cli = Cli::parse();
    let log = logging::init();
    if let Err(err) = run(&cli, log) {
        error!("{err:#}");
        std::process::exit(exit_codes::FAILURE);
    }
}

fn run(cli: &Cli, log: LogHandle) -> Result<()> {
    let config = cli.global_config();
    let tree = command_tree();
    let name = cli.command.name();
    let node = tree
        .find(&[name])
        .ok_or_else(|| anyhow!("command {name} missing from command tree"))?;

    let host = SystemHost::new(RuntimePaths::default(), log);
    let bootstrapped = Bootstrapper::new(host).run(node, &config)?;

    commands::dispatch(&cli.command, &config, bootstrapped.as_ref())
}
