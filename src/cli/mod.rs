mod commands;
pub mod consult;
pub mod views;

pub use commands::{Cli, Commands};
