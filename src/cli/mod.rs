//! Command-line interface module.

mod args;
pub mod check;
pub mod query;
pub mod serve;

pub use args::{CheckArgs, Cli, Commands, QueryArgs};
