//! Process logging via `tracing`.
//!
//! The subscriber is installed before flags are applied, with its filter
//! behind a reload layer so the bootstrapper can switch to `--log-level`
//! afterwards. `RUST_LOG`, when set, wins over `--log-level`.

use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

use crate::core::types::LogLevel;

/// Handle used to change the active log level after startup.
///
/// The default handle is detached from any subscriber and ignores level
/// changes.
#[derive(Debug, Default)]
pub struct LogHandle {
    reload: Option<reload::Handle<EnvFilter, Registry>>,
    env_override: bool,
}

/// Initialize the tracing subscriber.
///
/// Output: stderr, compact format, level `info` until [`LogHandle::set_level`]
/// is called.
pub fn init() -> LogHandle {
    let (filter, env_override) = match env_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()) {
        Some(filter) => (filter, true),
        None => (EnvFilter::new(LogLevel::default().directive()), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();

    LogHandle {
        reload: Some(handle),
        env_override,
    }
}

/// Filter from `RUST_LOG`, unless it is unset, blank or unparsable.
fn env_filter(directives: Option<String>) -> Option<EnvFilter> {
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
}

impl LogHandle {
    /// Apply `level` to the process logger. Never fails.
    pub fn set_level(&self, level: LogLevel) {
        if self.env_override {
            return;
        }
        if let Some(handle) = &self.reload {
            if let Err(err) = handle.reload(EnvFilter::new(level.directive())) {
                eprintln!("failed to apply log level {}: {err}", level.directive());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_rust_log_does_not_override_level() {
        assert!(env_filter(None).is_none());
        assert!(env_filter(Some(String::new())).is_none());
        assert!(env_filter(Some("  ".to_string())).is_none());
        assert!(env_filter(Some("ignited=debug".to_string())).is_some());
    }

    #[test]
    fn detached_handle_ignores_level_changes() {
        let handle = LogHandle::default();
        handle.set_level(LogLevel::Trace);
        assert!(handle.reload.is_none());
    }
}
