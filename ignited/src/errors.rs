//! Failure taxonomy of the bootstrap pipeline.

use thiserror::Error;

use crate::bootstrap::Step;

/// Error surfaced by [`crate::bootstrap::Bootstrapper::run`].
///
/// Every variant names the step that failed and carries the collaborator's
/// error with its full context chain.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The process is not running with root privileges.
    #[error("{step}: privilege check failed: {cause:#}")]
    Privilege { step: Step, cause: anyhow::Error },

    /// Runtime directories could not be created.
    #[error("{step}: environment setup failed: {cause:#}")]
    Environment { step: Step, cause: anyhow::Error },

    /// A provider could not be registered or resolved.
    #[error("{step}: provider setup failed: {cause:#}")]
    Provider { step: Step, cause: anyhow::Error },

    /// The configuration file is malformed or invalid.
    #[error("{step}: invalid configuration: {cause:#}")]
    Config { step: Step, cause: anyhow::Error },
}

impl BootstrapError {
    /// The pipeline step that failed.
    pub fn step(&self) -> Step {
        match self {
            Self::Privilege { step, .. }
            | Self::Environment { step, .. }
            | Self::Provider { step, .. }
            | Self::Config { step, .. } => *step,
        }
    }

    /// The underlying collaborator error.
    pub fn cause(&self) -> &anyhow::Error {
        match self {
            Self::Privilege { cause, .. }
            | Self::Environment { cause, .. }
            | Self::Provider { cause, .. }
            | Self::Config { cause, .. } => cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};

    #[test]
    fn display_names_step_and_context_chain() {
        let cause = Err::<(), _>(anyhow!("Permission denied"))
            .context("create directory /var/lib/firecracker/vm")
            .unwrap_err();
        let err = BootstrapError::Environment {
            step: Step::EnsureDirectories,
            cause,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("ensure directories: environment setup failed"));
        assert!(msg.contains("create directory /var/lib/firecracker/vm: Permission denied"));
        assert_eq!(err.step(), Step::EnsureDirectories);
    }
}
