//! Page listing command

use clap::ArgMatches;
use log::debug;
use std::fmt::Write as _;

use crate::commands::command_traits::Command;
use crate::config::Settings;
use crate::fetcher::{FileResolver, ImageReference, ResourceResolver};
use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::{TiffReader, TiffReaderBuilder};
use crate::io::seekable::SeekableReader;

/// Lists the pages of a TIFF file
pub struct InfoCommand<'a> {
    input: String,
    verbose: bool,
    settings: &'a Settings,
}

impl<'a> InfoCommand<'a> {
    pub fn new(args: &ArgMatches, settings: &'a Settings) -> TiffResult<Self> {
        let input = args.get_one::<String>("input")
            .ok_or_else(|| TiffError::GenericError("Missing input file".to_string()))?
            .clone();

        Ok(InfoCommand {
            input,
            verbose: args.get_flag("verbose"),
            settings,
        })
    }

    /// Builds the listing printed by `execute`
    pub fn describe(&self) -> TiffResult<String> {
        let resolver = FileResolver::with_capacity(self.settings.reader.buffer_capacity);
        let mut source = resolver.open(&ImageReference::new(self.input.as_str()))?;

        let mut reader = TiffReaderBuilder::new()
            .max_pages(self.settings.reader.max_pages)
            .build();
        let document = reader.read(source.as_mut())?;

        let mut out = format!("{}\n", document);
        for ifd in &document.ifds {
            self.describe_page(&mut out, &reader, source.as_mut(), ifd);
        }
        Ok(out)
    }

    fn describe_page(
        &self,
        out: &mut String,
        reader: &TiffReader,
        source: &mut dyn SeekableReader,
        ifd: &IFD,
    ) {
        let _ = write!(out, "{}", ifd);

        if ifd.has_tag(tags::PAGE_NAME) {
            match reader.read_ascii_tag(source, ifd, tags::PAGE_NAME) {
                Ok(name) if !name.is_empty() => { let _ = writeln!(out, "  Name: {}", name); }
                Ok(_) => {}
                Err(e) => debug!("Cannot read PageName of page {}: {}", ifd.number, e),
            }
        }

        if self.verbose {
            let _ = writeln!(out, "  Entries: {}", ifd.entry_count());
            for entry in &ifd.entries {
                let _ = writeln!(out, "    {}", entry.description());
            }
        }
    }
}

impl<'a> Command for InfoCommand<'a> {
    fn execute(&self) -> TiffResult<()> {
        print!("{}", self.describe()?);
        Ok(())
    }
}
