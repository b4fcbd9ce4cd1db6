pub mod commands;
pub mod serve;
pub mod account;

pub use commands::{Cli, Commands};
