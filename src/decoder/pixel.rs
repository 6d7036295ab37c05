//! Conversion of decoded samples to RGBA8

use crate::io::byte_order::ByteOrder;

use super::layout::{AlphaMode, ColorModel, PageLayout};

/// Bytes per output pixel (interleaved RGBA)
pub const RGBA_CHANNELS: usize = 4;

/// Converts pixels of one page's decoded rows to RGBA8
pub struct PixelConverter<'a> {
    bits: usize,
    samples_per_pixel: usize,
    byte_order: ByteOrder,
    color: &'a ColorModel,
    alpha: Option<(usize, AlphaMode)>,
}

impl<'a> PixelConverter<'a> {
    pub fn new(layout: &'a PageLayout) -> Self {
        PixelConverter {
            bits: layout.bits_per_sample as usize,
            samples_per_pixel: layout.samples_per_pixel as usize,
            byte_order: layout.byte_order,
            color: &layout.color,
            alpha: layout.alpha.map(|(index, mode)| (index as usize, mode)),
        }
    }

    /// Raw value of the `index`-th sample in a row
    fn sample(&self, row: &[u8], index: usize) -> u16 {
        match self.bits {
            8 => row[index] as u16,
            16 => {
                let offset = index * 2;
                self.byte_order.u16_from_bytes([row[offset], row[offset + 1]])
            }
            bits => {
                let bit = index * bits;
                let shift = 8 - bits - bit % 8;
                let mask = (1u16 << bits) - 1;
                (row[bit / 8] as u16 >> shift) & mask
            }
        }
    }

    /// Sample value scaled to 8 bits
    fn sample_u8(&self, row: &[u8], index: usize) -> u8 {
        let value = self.sample(row, index);
        match self.bits {
            8 => value as u8,
            16 => (value >> 8) as u8,
            bits => {
                let max = (1u32 << bits) - 1;
                (value as u32 * 255 / max) as u8
            }
        }
    }

    /// RGBA value of the pixel at column `x` of `row`
    pub fn pixel_at(&self, row: &[u8], x: u32) -> [u8; RGBA_CHANNELS] {
        let base = x as usize * self.samples_per_pixel;

        let [r, g, b] = match self.color {
            ColorModel::Gray { inverted } => {
                let value = self.sample_u8(row, base);
                let value = if *inverted { 255 - value } else { value };
                [value, value, value]
            }
            ColorModel::Rgb => [
                self.sample_u8(row, base),
                self.sample_u8(row, base + 1),
                self.sample_u8(row, base + 2),
            ],
            ColorModel::Palette { colormap } => {
                let index = self.sample(row, base) as usize;
                colormap.get(index).copied().unwrap_or([0, 0, 0])
            }
        };

        match self.alpha {
            None => [r, g, b, 255],
            Some((offset, mode)) => {
                let a = self.sample_u8(row, base + offset);
                match mode {
                    AlphaMode::Unassociated => [r, g, b, a],
                    AlphaMode::Associated => [unpremultiply(r, a), unpremultiply(g, a), unpremultiply(b, a), a],
                }
            }
        }
    }
}

fn unpremultiply(channel: u8, alpha: u8) -> u8 {
    if alpha == 0 {
        0
    } else {
        ((channel as u32 * 255 + alpha as u32 / 2) / alpha as u32).min(255) as u8
    }
}
