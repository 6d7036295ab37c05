//! Command pattern interfaces for the CLI

use crate::config::Settings;
use crate::tiff::errors::TiffResult;

/// An executable CLI operation
pub trait Command {
    /// Execute the command
    fn execute(&self) -> TiffResult<()>;
}

/// Creates commands from parsed CLI arguments
pub trait CommandFactory<'a> {
    /// Create the command selected by `args`
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `settings` - Loaded configuration
    fn create_command(&self, args: &clap::ArgMatches, settings: &'a Settings) -> TiffResult<Box<dyn Command + 'a>>;
}
