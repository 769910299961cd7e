//! Perceptual Hash (pHash) implementation.
//!
//! pHash runs a Discrete Cosine Transform over a reduced grayscale grid,
//! keeps the low-frequency block and sets one bit per coefficient relative
//! to the median. This makes it more robust than aHash to:
//! - Brightness/contrast and gamma changes
//! - Compression artifacts
//! - Scaling
//!
//! The DCT and median hashing come from the image_hasher crate.

use super::super::decode::decode_image;
use super::super::traits::{Fingerprint, FingerprintStrategy, StrategyKind};
use crate::error::FingerprintError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig as ImageHasherConfig};
use std::path::Path;

/// Perceptual Hash (pHash) strategy
pub struct PerceptualStrategy {
    hasher: image_hasher::Hasher,
}

impl PerceptualStrategy {
    pub fn new(hash_size: u32) -> Self {
        let hash_size = hash_size.max(2);
        let hasher = ImageHasherConfig::new()
            .hash_size(hash_size, hash_size)
            .hash_alg(HashAlg::Median)
            .preproc_dct()
            .to_hasher();

        Self { hasher }
    }

    /// Fingerprint an already-decoded image
    pub fn fingerprint_image(&self, image: &DynamicImage) -> Fingerprint {
        let hash = self.hasher.hash_image(image);
        Fingerprint::from_bytes(hash.as_bytes())
    }
}

impl Default for PerceptualStrategy {
    fn default() -> Self {
        Self::new(8)
    }
}

impl FingerprintStrategy for PerceptualStrategy {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
        let image = decode_image(path)?;
        Ok(self.fingerprint_image(&image))
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::FrequencyPerceptual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_gradient_image(offset: u8) -> DynamicImage {
        let img = ImageBuffer::from_fn(128, 128, |x, y| {
            let v = ((x + y) / 2) as u8;
            let v = v.saturating_add(offset);
            Rgb([v, v, v])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn identical_images_produce_identical_fingerprint() {
        let strategy = PerceptualStrategy::default();
        let image = create_gradient_image(0);

        assert_eq!(
            strategy.fingerprint_image(&image),
            strategy.fingerprint_image(&image)
        );
    }

    #[test]
    fn fingerprint_is_fixed_width() {
        let strategy = PerceptualStrategy::default();
        let a = strategy.fingerprint_image(&create_gradient_image(0));
        let b = strategy.fingerprint_image(&create_gradient_image(40));
        // 8x8 bits = 8 bytes = 16 hex chars
        assert_eq!(a.as_str().len(), 16);
        assert_eq!(b.as_str().len(), 16);
    }

    #[test]
    fn kind_returns_frequency_perceptual() {
        assert_eq!(
            PerceptualStrategy::default().kind(),
            StrategyKind::FrequencyPerceptual
        );
    }
}
