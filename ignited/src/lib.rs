//! Entry-point plumbing for `ignited`.
//!
//! The crate has two independent pieces:
//!
//! - **[`bootstrap`]**: the ordered, fail-fast pipeline that prepares the
//!   process (log level, root check, runtime directories, providers, config
//!   file) before any privileged command body runs.
//! - **[`output`]**: the tabular console writer used by command bodies.
//!
//! Pure logic lives in [`core`]; everything that touches the system lives in
//! [`io`] and is reached from the pipeline through
//! [`bootstrap::BootstrapHost`].

pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod core;
pub mod errors;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod output;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
