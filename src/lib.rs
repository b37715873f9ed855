pub mod cli;
pub mod config;
pub mod error;
pub mod hyperopt_commands;
pub mod logging;

pub use config::ToolConfig;
pub use error::CommandError;
