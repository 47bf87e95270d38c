//! Deterministic, pure logic shared by the bootstrapper and the output layer.
//!
//! Nothing here reads the environment or touches the filesystem; command
//! names, cells and settings go in, decisions and text come out.

pub mod cell;
pub mod command_tree;
pub mod skip;
pub mod types;
