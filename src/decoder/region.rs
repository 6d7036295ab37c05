//! Requested regions and their placement on a page
//!
//! A `Region` is what the caller asked for, in page pixels, and may be
//! degenerate or hang off the page. A `PixelRect` is the part of it that
//! will actually be decoded.

use std::fmt;
use std::str::FromStr;

use crate::tiff::errors::{TiffError, TiffResult};

/// Rectangle requested by the caller, in pixels at native resolution
///
/// Coordinates are signed so that callers can pass through whatever they
/// received; the decoder decides what to do with negative or empty values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// X-coordinate of the top-left corner
    pub left: i32,
    /// Y-coordinate of the top-left corner
    pub top: i32,
    /// Width of the region in pixels
    pub width: i32,
    /// Height of the region in pixels
    pub height: i32,
}

impl Region {
    /// Create a new region
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Region { left, top, width, height }
    }

    /// Exclusive right edge
    pub fn right(&self) -> i64 {
        self.left as i64 + self.width as i64
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i64 {
        self.top as i64 + self.height as i64
    }

    /// Whether the region has no area at all
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Places the region on a page of the given size
    ///
    /// Under `RegionPolicy::Clip` the region is intersected with the page;
    /// under `RegionPolicy::Reject` it must lie fully inside. Either way an
    /// empty result is an `EmptyRegion` error.
    pub fn place(&self, page_width: u32, page_height: u32, policy: RegionPolicy) -> TiffResult<PixelRect> {
        if self.is_degenerate() {
            return Err(TiffError::EmptyRegion(format!("{} has no area", self)));
        }

        let inside = self.left >= 0
            && self.top >= 0
            && self.right() <= page_width as i64
            && self.bottom() <= page_height as i64;
        if policy == RegionPolicy::Reject && !inside {
            return Err(TiffError::EmptyRegion(format!(
                "{} is not inside the {}x{} page", self, page_width, page_height
            )));
        }

        let x0 = (self.left as i64).max(0);
        let y0 = (self.top as i64).max(0);
        let x1 = self.right().min(page_width as i64);
        let y1 = self.bottom().min(page_height as i64);

        if x1 <= x0 || y1 <= y0 {
            return Err(TiffError::EmptyRegion(format!(
                "{} does not intersect the {}x{} page", self, page_width, page_height
            )));
        }

        Ok(PixelRect {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rect({}, {} - {}, {})", self.left, self.top, self.right(), self.bottom())
    }
}

impl FromStr for Region {
    type Err = String;

    /// Parses `left,top,width,height`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(format!("Expected left,top,width,height but got '{}'", s));
        }

        let mut values = [0i32; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part.parse()
                .map_err(|e| format!("Invalid region component '{}': {}", part, e))?;
        }

        Ok(Region::new(values[0], values[1], values[2], values[3]))
    }
}

/// What to do with a region that is not fully inside the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionPolicy {
    /// Decode the part of the region that overlaps the page
    #[default]
    Clip,
    /// Refuse to decode unless the region is fully inside the page
    Reject,
}

impl FromStr for RegionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clip" => Ok(RegionPolicy::Clip),
            "reject" => Ok(RegionPolicy::Reject),
            _ => Err(format!("Unknown region policy: {}", s)),
        }
    }
}

/// A non-empty rectangle inside a page, in page pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Exclusive right edge
    pub fn end_x(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn end_y(&self) -> u32 {
        self.y + self.height
    }

    /// Output dimensions after keeping every `sample_size`-th pixel
    pub fn sampled_dimensions(&self, sample_size: u32) -> (u32, u32) {
        (self.width.div_ceil(sample_size), self.height.div_ceil(sample_size))
    }
}
