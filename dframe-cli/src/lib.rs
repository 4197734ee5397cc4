//! # dframe-cli
//!
//! Argument parsing, the bundled handler catalog, and the definition checker behind `dframe`.

pub mod builtin;
pub mod check;
pub mod cli;

pub use check::{check_components, CheckSummary};
pub use cli::{Cli, Commands, FrameworkArgs};
