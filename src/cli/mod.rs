pub(crate) mod args;
pub(crate) mod commands;
pub(crate) mod error;

pub(crate) use args::Cli;
pub(crate) use commands::{Commands, parse_command};
pub(crate) use error::AppError;
