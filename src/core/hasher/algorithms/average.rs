//! Average Hash (aHash) implementation.
//!
//! aHash works by:
//! 1. Converting to grayscale
//! 2. Resizing to hash_size x hash_size
//! 3. Computing the mean brightness of the grid
//! 4. For each cell: if brighter than the mean, set bit to 1, else 0
//!
//! Tolerant to re-encoding and mild resampling, not to crops or rotation.

use super::super::decode::decode_image;
use super::super::traits::{Fingerprint, FingerprintStrategy, StrategyKind};
use crate::error::FingerprintError;
use image::imageops::{self, FilterType};
use image::DynamicImage;
use std::path::Path;

/// Average Hash (aHash) strategy
#[derive(Debug, Clone, Copy)]
pub struct AverageStrategy {
    /// Size of the grid (width and height)
    hash_size: u32,
}

impl AverageStrategy {
    pub fn new(hash_size: u32) -> Self {
        Self {
            hash_size: hash_size.max(1),
        }
    }

    /// Fingerprint an already-decoded image
    pub fn fingerprint_image(&self, image: &DynamicImage) -> Fingerprint {
        let gray = image.to_luma8();
        let grid = imageops::resize(&gray, self.hash_size, self.hash_size, FilterType::Lanczos3);

        let count = (self.hash_size * self.hash_size) as f64;
        let mean = grid.pixels().map(|p| p[0] as f64).sum::<f64>() / count;

        let mut hash_bytes = Vec::with_capacity((self.hash_size * self.hash_size / 8) as usize + 1);
        let mut current_byte: u8 = 0;
        let mut bit_position = 0;

        for pixel in grid.pixels() {
            if pixel[0] as f64 > mean {
                current_byte |= 1 << (7 - bit_position);
            }

            bit_position += 1;

            if bit_position == 8 {
                hash_bytes.push(current_byte);
                current_byte = 0;
                bit_position = 0;
            }
        }

        if bit_position > 0 {
            hash_bytes.push(current_byte);
        }

        Fingerprint::from_bytes(&hash_bytes)
    }
}

impl Default for AverageStrategy {
    fn default() -> Self {
        Self::new(8)
    }
}

impl FingerprintStrategy for AverageStrategy {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
        let image = decode_image(path)?;
        Ok(self.fingerprint_image(&image))
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::AveragePerceptual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_solid_image(r: u8, g: u8, b: u8) -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |_, _| Rgb([r, g, b]));
        DynamicImage::ImageRgb8(img)
    }

    fn create_split_image() -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |x, _| {
            if x < 50 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn fingerprint_is_16_hex_chars_for_8x8() {
        let fp = AverageStrategy::default().fingerprint_image(&create_split_image());
        assert_eq!(fp.as_str().len(), 16);
    }

    #[test]
    fn solid_image_produces_all_zero_bits() {
        let fp = AverageStrategy::default().fingerprint_image(&create_solid_image(128, 128, 128));
        assert_eq!(fp.as_str(), "0000000000000000");
    }

    #[test]
    fn left_dark_right_bright_sets_right_half() {
        let fp = AverageStrategy::default().fingerprint_image(&create_split_image());
        // Each row: four dark cells then four bright cells
        assert_eq!(fp.as_str(), "0f0f0f0f0f0f0f0f");
    }

    #[test]
    fn resized_copy_has_same_fingerprint() {
        let strategy = AverageStrategy::default();
        let original = create_split_image();
        let smaller = original.resize_exact(50, 50, FilterType::Triangle);

        assert_eq!(
            strategy.fingerprint_image(&original),
            strategy.fingerprint_image(&smaller)
        );
    }

    #[test]
    fn kind_returns_average() {
        assert_eq!(AverageStrategy::default().kind(), StrategyKind::AveragePerceptual);
    }
}
