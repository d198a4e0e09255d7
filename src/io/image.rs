//! Single-channel sample extraction from landscape images

use crate::io::error::{Result, WithPath};
use crate::spatial::Grid;
use image::DynamicImage;
use ndarray::Array2;
use std::path::Path;

/// Image channel read into the sample grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Channel {
    /// First RGBA channel
    Red,
    /// Second RGBA channel, where the simulation writes food density
    #[default]
    Green,
    /// Third RGBA channel
    Blue,
    /// Fourth RGBA channel
    Alpha,
    /// Luminance of the color image
    Luma,
}

impl Channel {
    const fn rgba_index(self) -> Option<usize> {
        match self {
            Self::Red => Some(0),
            Self::Green => Some(1),
            Self::Blue => Some(2),
            Self::Alpha => Some(3),
            Self::Luma => None,
        }
    }
}

/// Decodes images into grids of one deterministic channel
///
/// Samples come from the 8-bit representation of the image, so every grid
/// holds integral values in `0..=255`. Grayscale sources replicate their
/// single channel into red, green and blue.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelDecoder {
    channel: Channel,
}

impl ChannelDecoder {
    /// Create a decoder for `channel`
    pub const fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// Channel this decoder extracts
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Read an image file and extract the configured channel
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened or is not a decodable image (`Decode`)
    /// - The image is not square or smaller than 2x2 (`InvalidInput`, `InvalidDimension`)
    pub fn decode(&self, path: &Path) -> Result<Grid> {
        let img = image::open(path).with_path(path)?;
        self.decode_image(&img)
    }

    /// Extract the configured channel from an already decoded image
    ///
    /// # Errors
    ///
    /// Returns an error if the image is not square or smaller than 2x2
    pub fn decode_image(&self, img: &DynamicImage) -> Result<Grid> {
        let (width, height) = (img.width() as usize, img.height() as usize);

        let samples: Array2<u8> = match self.channel.rgba_index() {
            Some(channel_index) => {
                let rgba = img.to_rgba8();
                Array2::from_shape_fn((height, width), |(row, col)| {
                    rgba.get_pixel(col as u32, row as u32)
                        .0
                        .get(channel_index)
                        .copied()
                        .unwrap_or(0)
                })
            }
            None => {
                let luma = img.to_luma8();
                Array2::from_shape_fn((height, width), |(row, col)| {
                    let [value] = luma.get_pixel(col as u32, row as u32).0;
                    value
                })
            }
        };

        Grid::from_samples(&samples)
    }
}
