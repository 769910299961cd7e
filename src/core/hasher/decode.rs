//! Image decoding with a fast path for JPEG.
//!
//! Uses zune-jpeg for JPEG files (1.5-2x faster than image crate),
//! falls back to the image crate for everything else or when zune-jpeg
//! rejects the file.

use crate::error::FingerprintError;
use image::{DynamicImage, ImageBuffer, ImageError, ImageReader, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Decoder routes by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeRoute {
    Jpeg,
    Generic,
}

impl DecodeRoute {
    fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("jpg" | "jpeg") => Self::Jpeg,
            _ => Self::Generic,
        }
    }
}

/// Decode an image from a file path using the fastest available decoder.
pub fn decode_image(path: &Path) -> Result<DynamicImage, FingerprintError> {
    match DecodeRoute::from_path(path) {
        DecodeRoute::Jpeg => decode_jpeg(path).or_else(|_| decode_generic(path)),
        DecodeRoute::Generic => decode_generic(path),
    }
}

fn decode_jpeg(path: &Path) -> Result<DynamicImage, FingerprintError> {
    let file_bytes = fs::read(path).map_err(|e| FingerprintError::UnreadableFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
    let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

    let pixels = decoder
        .decode()
        .map_err(|e| unreadable(path, format!("zune-jpeg decode failed: {:?}", e)))?;

    let info = decoder
        .info()
        .ok_or_else(|| unreadable(path, "missing JPEG header information"))?;

    let width = info.width as u32;
    let height = info.height as u32;

    let image = match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
        ColorSpace::RGB => {
            let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
                ImageBuffer::from_raw(width, height, pixels)
                    .ok_or_else(|| unreadable(path, "RGB buffer size mismatch"))?;
            DynamicImage::ImageRgb8(buffer)
        }
        ColorSpace::RGBA => {
            let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
                ImageBuffer::from_raw(width, height, pixels)
                    .ok_or_else(|| unreadable(path, "RGBA buffer size mismatch"))?;
            DynamicImage::ImageRgba8(buffer)
        }
        ColorSpace::Luma => {
            let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
                ImageBuffer::from_raw(width, height, pixels)
                    .ok_or_else(|| unreadable(path, "Luma buffer size mismatch"))?;
            DynamicImage::ImageLuma8(buffer)
        }
        _ => return decode_generic(path),
    };

    Ok(image)
}

/// Decode with the image crate, sniffing the format from the content
fn decode_generic(path: &Path) -> Result<DynamicImage, FingerprintError> {
    let reader = ImageReader::open(path).map_err(|e| FingerprintError::UnreadableFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let reader = reader
        .with_guessed_format()
        .map_err(|e| FingerprintError::UnreadableFile {
            path: path.to_path_buf(),
            source: e,
        })?;

    reader.decode().map_err(|e| match e {
        ImageError::IoError(source) => FingerprintError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        },
        other => unreadable(path, other.to_string()),
    })
}

fn unreadable(path: &Path, reason: impl Into<String>) -> FingerprintError {
    FingerprintError::UnreadableImage {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}
