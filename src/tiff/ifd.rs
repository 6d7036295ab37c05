//! Image File Directory (IFD) structures and methods
//!
//! Each page of a multi-page TIFF is described by one IFD: a list of tag
//! entries giving its dimensions, sample layout, compression and where the
//! pixel data lives.

use std::collections::HashMap;
use std::fmt;
use crate::tiff::constants::{compression, planar_config, photometric, tags};
use log::{debug, trace};
use crate::utils::tag_utils;

/// Represents an Image File Directory (IFD) in a TIFF file
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in this IFD
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based), which is also the page index
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Index into `entries` by tag number
    tag_map: HashMap<u16, usize>,
}

/// Represents an entry in an Image File Directory (IFD)
///
/// Small values are stored inside the entry itself; they are decoded while
/// the directory is read and kept in `inline_values`. Larger values live at
/// `value_offset` and must be read from the file on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// First inline value, or offset to the values
    pub value_offset: u64,
    /// Values decoded from the entry when they fit inline
    pub inline_values: Option<Vec<u64>>,
}

impl IFDEntry {
    /// Creates an entry whose values live at `value_offset`
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64) -> Self {
        IFDEntry {
            tag,
            field_type,
            count,
            value_offset,
            inline_values: None,
        }
    }

    /// Creates an entry holding its values inline
    pub fn with_inline_values(tag: u16, field_type: u16, values: Vec<u64>) -> Self {
        IFDEntry {
            tag,
            field_type,
            count: values.len() as u64,
            value_offset: values.first().copied().unwrap_or(0),
            inline_values: Some(values),
        }
    }

    /// Returns a human-readable description of this entry
    pub fn description(&self) -> String {
        let tag_name = tag_utils::get_tag_name(self.tag);
        let field_type_name = tag_utils::get_field_type_name(self.field_type);

        let value_display = match self.tag {
            tags::COMPRESSION => format!("{} ({})",
                                         self.value_offset,
                                         tag_utils::get_compression_name(self.value_offset)),
            tags::PHOTOMETRIC_INTERPRETATION => format!("{} ({})",
                                                        self.value_offset,
                                                        tag_utils::get_photometric_name(self.value_offset)),
            _ => match &self.inline_values {
                Some(values) if values.len() > 1 => format!("{:?}", values),
                Some(_) => self.value_offset.to_string(),
                None => format!("@{}", self.value_offset),
            },
        };

        format!("Tag: {} ({}), Type: {} ({}), Count: {}, Value: {}",
                self.tag, tag_name, self.field_type, field_type_name, self.count, value_display)
    }
}

impl IFD {
    /// Creates a new, empty IFD
    pub fn new(number: usize, offset: u64) -> Self {
        debug!("Creating IFD #{} at offset {}", number, offset);

        IFD {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry to this IFD
    ///
    /// A repeated tag replaces the lookup of the earlier one.
    pub fn add_entry(&mut self, entry: IFDEntry) {
        trace!("Adding entry to IFD #{}: {}", self.number, entry.description());

        self.tag_map.insert(entry.tag, self.entries.len());
        self.entries.push(entry);
    }

    /// Gets a tag value (first inline value or offset)
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        let value = self.get_entry(tag).map(|entry| entry.value_offset);
        trace!("IFD #{} tag {} ({}) -> {:?}",
               self.number, tag, tag_utils::get_tag_name(tag), value);
        value
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).and_then(|&index| self.entries.get(index))
    }

    /// Gets the dimensions of the page described by this IFD
    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some((width, height))
    }

    /// Returns number of samples per pixel (default 1 if not specified)
    pub fn get_samples_per_pixel(&self) -> u64 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    /// Compression code, defaulting to none
    pub fn get_compression(&self) -> u64 {
        self.get_tag_value(tags::COMPRESSION).unwrap_or(compression::NONE as u64)
    }

    /// Photometric interpretation, defaulting to BlackIsZero
    pub fn get_photometric(&self) -> u64 {
        self.get_tag_value(tags::PHOTOMETRIC_INTERPRETATION)
            .unwrap_or(photometric::BLACK_IS_ZERO as u64)
    }

    /// Planar configuration, defaulting to chunky
    pub fn get_planar_configuration(&self) -> u64 {
        self.get_tag_value(tags::PLANAR_CONFIGURATION)
            .unwrap_or(planar_config::CHUNKY as u64)
    }

    /// Whether pixel data is organized in tiles rather than strips
    pub fn is_tiled(&self) -> bool {
        self.has_tag(tags::TILE_WIDTH) && self.has_tag(tags::TILE_LENGTH)
    }

    /// Gets the number of entries in this IFD
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Page #{} (IFD offset: {})", self.number, self.offset)?;

        match self.get_dimensions() {
            Some((width, height)) => writeln!(f, "  Dimensions: {}x{}", width, height)?,
            None => writeln!(f, "  Dimensions: unknown")?,
        }

        writeln!(f, "  Samples per pixel: {}", self.get_samples_per_pixel())?;
        writeln!(f, "  Compression: {}", tag_utils::get_compression_name(self.get_compression()))?;
        writeln!(f, "  Photometric: {}", tag_utils::get_photometric_name(self.get_photometric()))?;
        writeln!(f, "  Layout: {}", if self.is_tiled() { "tiled" } else { "stripped" })?;

        Ok(())
    }
}
