//! I/O-facing collaborators invoked by the bootstrap pipeline.

pub mod config;
pub mod dirs;
pub mod privilege;
pub mod providers;
