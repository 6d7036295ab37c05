//! Region fetch command

use clap::ArgMatches;
use image::RgbaImage;
use log::info;
use std::fs;
use std::str::FromStr;

use crate::commands::command_traits::Command;
use crate::config::Settings;
use crate::decoder::Region;
use crate::fetcher::{DecodeRequest, FileResolver, ImageReference, RawPixelBytes, ResourceResolver};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::reader::TiffReaderBuilder;

/// How fetched pixels are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Interleaved RGBA8 bytes without header
    Raw,
    Png,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" | "rgba" => Ok(OutputFormat::Raw),
            "png" => Ok(OutputFormat::Png),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Fetches one region and writes it to a file
pub struct FetchCommand<'a> {
    input: String,
    output: String,
    page: usize,
    sample_size: u32,
    region: Option<Region>,
    format: OutputFormat,
    settings: &'a Settings,
}

impl<'a> FetchCommand<'a> {
    pub fn new(args: &ArgMatches, settings: &'a Settings) -> TiffResult<Self> {
        let input = args.get_one::<String>("input")
            .ok_or_else(|| TiffError::GenericError("Missing input file".to_string()))?
            .clone();
        let output = args.get_one::<String>("output")
            .ok_or_else(|| TiffError::GenericError("Missing output file".to_string()))?
            .clone();

        let page = parse_arg::<usize>(args, "page")?.unwrap_or(0);
        let sample_size = parse_arg::<u32>(args, "sample-size")?.unwrap_or(1);
        let region = parse_arg::<Region>(args, "region")?;

        let format = match parse_arg::<OutputFormat>(args, "format")? {
            Some(format) => format,
            None if output.to_lowercase().ends_with(".png") => OutputFormat::Png,
            None => OutputFormat::Raw,
        };

        Ok(FetchCommand { input, output, page, sample_size, region, format, settings })
    }

    /// Whole page, used when no region is given
    fn page_region(&self) -> TiffResult<Region> {
        let resolver = FileResolver::with_capacity(self.settings.reader.buffer_capacity);
        let mut source = resolver.open(&ImageReference::new(self.input.as_str()))?;
        let document = TiffReaderBuilder::new()
            .max_pages(self.settings.reader.max_pages)
            .build()
            .read(source.as_mut())?;

        let (width, height) = document.page(self.page)?
            .get_dimensions()
            .ok_or(TiffError::MissingDimensions)?;
        Ok(Region::new(0, 0, clamp_to_i32(width), clamp_to_i32(height)))
    }

    fn write(&self, pixels: RawPixelBytes) -> TiffResult<()> {
        match self.format {
            OutputFormat::Raw => fs::write(&self.output, pixels.as_bytes())?,
            OutputFormat::Png => {
                let (width, height) = (pixels.width, pixels.height);
                let image = RgbaImage::from_raw(width, height, pixels.into_bytes())
                    .ok_or_else(|| TiffError::GenericError("Pixel buffer does not match its size".to_string()))?;
                image.save(&self.output)
                    .map_err(|e| TiffError::GenericError(format!("Cannot write {}: {}", self.output, e)))?;
            }
        }
        Ok(())
    }
}

impl<'a> Command for FetchCommand<'a> {
    fn execute(&self) -> TiffResult<()> {
        let region = match self.region {
            Some(region) => region,
            None => self.page_region()?,
        };

        let request = DecodeRequest::new(ImageReference::new(self.input.as_str()), region)
            .page(self.page)
            .sample_size(self.sample_size);

        let pixels = self.settings.fetcher().fetch(&request)
            .map_err(|e| TiffError::GenericError(format!("{} [{}]", e, e.code())))?;

        info!("Writing {}x{} pixels to {} as {:?}", pixels.width, pixels.height, self.output, self.format);
        self.write(pixels)
    }
}

fn parse_arg<T: FromStr>(args: &ArgMatches, name: &str) -> TiffResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match args.get_one::<String>(name) {
        None => Ok(None),
        Some(value) => value.parse::<T>()
            .map(Some)
            .map_err(|e| TiffError::GenericError(format!("Invalid --{} '{}': {}", name, value, e))),
    }
}

fn clamp_to_i32(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_formats() {
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("raw".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);
        assert!("jpeg".parse::<OutputFormat>().is_err());
    }
}
