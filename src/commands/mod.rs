//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod cli;
pub mod command_traits;
pub mod conversion_args;
pub mod analyze_command;
pub mod convert_command;
pub mod folder_command;

pub use cli::{build_cli, DEFAULT_LOG_FILE};
pub use command_traits::{Command, CommandFactory};
pub use analyze_command::AnalyzeCommand;
pub use convert_command::ConvertCommand;
pub use folder_command::{BatchConvertCommand, FolderConvertCommand};

use clap::ArgMatches;
use crate::convert::{ConvertError, ConvertResult};
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the selected subcommand and creates
/// the appropriate command instance for execution.
#[derive(Default)]
pub struct Tif2ImageCommandFactory;

impl Tif2ImageCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        Tif2ImageCommandFactory
    }
}

impl<'a> CommandFactory<'a> for Tif2ImageCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> ConvertResult<Box<dyn Command + 'a>> {
        match args.subcommand() {
            Some(("convert", sub)) => Ok(Box::new(ConvertCommand::new(sub, logger)?)),
            Some(("folder-convert", sub)) => Ok(Box::new(FolderConvertCommand::new(sub, logger)?)),
            Some(("batch-convert", sub)) => Ok(Box::new(BatchConvertCommand::new(sub, logger)?)),
            Some(("analyze", sub)) => Ok(Box::new(AnalyzeCommand::new(sub, logger)?)),
            Some((other, _)) => Err(ConvertError::Config(format!("Unknown command '{}'", other))),
            None => Err(ConvertError::Config("No command given".to_string())),
        }
    }
}
