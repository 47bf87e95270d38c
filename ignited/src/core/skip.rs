//! Allow-list of informational commands that bypass the bootstrap pipeline.

/// Name of the root command.
pub const ROOT_COMMAND: &str = "ignited";

/// Root-level commands that never need root privileges or populated providers.
pub const SKIP_COMMANDS: [&str; 3] = ["version", "help", "completion"];

/// Returns true iff `command` is an allow-listed direct child of the root.
pub fn should_skip(command: &str, parent: &str) -> bool {
    parent == ROOT_COMMAND && SKIP_COMMANDS.contains(&command)
}
