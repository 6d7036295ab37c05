//! CLI command implementations

pub mod command_traits;
pub mod fetch_command;
pub mod info_command;

pub use command_traits::{Command, CommandFactory};
pub use fetch_command::{FetchCommand, OutputFormat};
pub use info_command::InfoCommand;

use clap::ArgMatches;
use crate::config::Settings;
use crate::tiff::errors::TiffResult;

/// Picks the command to run from the CLI arguments
///
/// `--info` lists the pages; otherwise a region is fetched.
pub struct TiffRegionCommandFactory;

impl TiffRegionCommandFactory {
    pub fn new() -> Self {
        TiffRegionCommandFactory
    }
}

impl Default for TiffRegionCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for TiffRegionCommandFactory {
    fn create_command(&self, args: &ArgMatches, settings: &'a Settings) -> TiffResult<Box<dyn Command + 'a>> {
        if args.get_flag("info") || args.get_one::<String>("output").is_none() {
            Ok(Box::new(InfoCommand::new(args, settings)?))
        } else {
            Ok(Box::new(FetchCommand::new(args, settings)?))
        }
    }
}
