//! Command-line interface module.

mod args;
pub mod render;
pub mod validate;

pub use args::{Cli, Commands};
