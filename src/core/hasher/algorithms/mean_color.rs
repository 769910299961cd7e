//! Mean-color fingerprint.
//!
//! Normalizes the image to a 64x64 RGB canvas, averages each channel and
//! renders the three means as uppercase hex, e.g. `7BC896`. Any two images
//! with the same average color collide regardless of composition; this
//! strategy trades precision for speed.

use super::super::decode::decode_image;
use super::super::traits::{Fingerprint, FingerprintStrategy, StrategyKind};
use crate::error::FingerprintError;
use image::imageops::{self, FilterType};
use image::DynamicImage;
use std::path::Path;

const CANVAS_SIZE: u32 = 64;

/// Mean-color strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanColorStrategy;

impl MeanColorStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Fingerprint an already-decoded image
    pub fn fingerprint_image(&self, image: &DynamicImage) -> Fingerprint {
        let rgb = image.to_rgb8();
        let canvas = imageops::resize(&rgb, CANVAS_SIZE, CANVAS_SIZE, FilterType::CatmullRom);

        let mut sums = [0u64; 3];
        for pixel in canvas.pixels() {
            for (sum, channel) in sums.iter_mut().zip(pixel.0) {
                *sum += channel as u64;
            }
        }

        let count = (CANVAS_SIZE * CANVAS_SIZE) as u64;
        // Integer division truncates, matching a floor of the float mean
        let [r, g, b] = sums.map(|sum| (sum / count) as u8);

        Fingerprint::new(format!("{:02X}{:02X}{:02X}", r, g, b))
    }
}

impl FingerprintStrategy for MeanColorStrategy {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
        let image = decode_image(path)?;
        Ok(self.fingerprint_image(&image))
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::MeanColor
    }
}
