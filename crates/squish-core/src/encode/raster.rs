//! Format encoders for conversion output.
//!
//! JPEG and PNG go through the `image` crate's encoders; lossy WebP uses
//! the `webp` crate (libwebp), since the `image` crate only writes
//! lossless WebP. Quality is a fraction in 0.0 to 1.0 at this boundary and
//! is mapped to each codec's native scale internally.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;

use crate::decode::DecodedImage;
use crate::OutputFormat;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec produced no data
    #[error("Encoding to {format} failed: {reason}")]
    EncodingFailed { format: &'static str, reason: String },
}

/// A black-box encode capability: raster + format + quality in, bytes out.
///
/// The target size search is written against this trait so that the numeric
/// search can be tested with deterministic synthetic encoders. Encoding must
/// be deterministic: the same raster at the same quality yields byte-identical
/// output.
pub trait FormatEncoder {
    /// Encode an RGB raster to the given format.
    ///
    /// # Arguments
    ///
    /// * `image` - Source raster (read-only, not consumed)
    /// * `format` - Output format
    /// * `quality` - Quality fraction in 0.0 to 1.0; values outside the
    ///   range are clamped. Ignored by formats without quality control.
    fn encode(
        &self,
        image: &DecodedImage,
        format: OutputFormat,
        quality: f32,
    ) -> Result<Vec<u8>, EncodeError>;
}

/// Production encoder backed by the `image` and `webp` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterEncoder;

impl RasterEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self
    }
}

impl FormatEncoder for RasterEncoder {
    fn encode(
        &self,
        image: &DecodedImage,
        format: OutputFormat,
        quality: f32,
    ) -> Result<Vec<u8>, EncodeError> {
        validate_raster(image)?;
        let quality = quality.clamp(0.0, 1.0);

        match format {
            OutputFormat::Jpeg => encode_jpeg(image, quality),
            OutputFormat::Png => encode_png(image),
            OutputFormat::Webp => encode_webp(image, quality),
        }
    }
}

fn validate_raster(image: &DecodedImage) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = (image.width as usize) * (image.height as usize) * 3;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    Ok(())
}

fn encode_jpeg(image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
    // Map 0.0-1.0 to the codec's 1-100 scale; 0.0 still encodes at minimum.
    let q = ((quality * 100.0).round() as u8).clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, q);

    encoder
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::EncodingFailed {
            format: "jpeg",
            reason: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

fn encode_png(image: &DecodedImage) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = PngEncoder::new(&mut buffer);

    encoder
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::EncodingFailed {
            format: "png",
            reason: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

fn encode_webp(image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
    let encoder = webp::Encoder::from_rgb(&image.pixels, image.width, image.height);
    let encoded = encoder.encode(quality * 100.0);
    Ok(encoded.to_vec())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating image dimensions (keep small for speed).
    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=40, 1u32..=40)
    }

    /// Strategy for generating quality values.
    fn quality_strategy() -> impl Strategy<Value = f32> {
        0.0f32..=1.0
    }

    fn flat_image(width: u32, height: u32, value: u8) -> DecodedImage {
        DecodedImage::new(width, height, vec![value; (width * height * 3) as usize])
    }

    proptest! {
        /// Property: valid input produces a valid container for every format.
        #[test]
        fn prop_valid_input_produces_output(
            (width, height) in dimensions_strategy(),
            quality in quality_strategy(),
        ) {
            let img = flat_image(width, height, 128);
            let encoder = RasterEncoder::new();

            let jpeg = encoder.encode(&img, OutputFormat::Jpeg, quality).unwrap();
            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

            let png = encoder.encode(&img, OutputFormat::Png, quality).unwrap();
            prop_assert_eq!(&png[0..4], &[0x89, 0x50, 0x4E, 0x47]);

            let webp = encoder.encode(&img, OutputFormat::Webp, quality).unwrap();
            prop_assert_eq!(&webp[0..4], b"RIFF");
        }

        /// Property: same input always produces same output (deterministic).
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=20, 1u32..=20),
            quality in quality_strategy(),
        ) {
            let img = flat_image(width, height, 100);
            let encoder = RasterEncoder::new();

            let a = encoder.encode(&img, OutputFormat::Jpeg, quality).unwrap();
            let b = encoder.encode(&img, OutputFormat::Jpeg, quality).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Property: mismatched pixel buffer length always returns an error.
        #[test]
        fn prop_invalid_pixel_length_returns_error(
            (width, height) in dimensions_strategy(),
            quality in quality_strategy(),
            extra_or_missing in -10i32..=10,
        ) {
            prop_assume!(extra_or_missing != 0);

            let expected = (width as usize) * (height as usize) * 3;
            let actual = if extra_or_missing > 0 {
                expected + extra_or_missing as usize
            } else {
                expected.saturating_sub((-extra_or_missing) as usize)
            };
            prop_assume!(actual != expected);

            let img = DecodedImage {
                width,
                height,
                pixels: vec![128u8; actual],
            };
            let result = RasterEncoder::new().encode(&img, OutputFormat::Jpeg, quality);

            let is_invalid_pixel_data = matches!(result, Err(EncodeError::InvalidPixelData { .. }));
            prop_assert!(is_invalid_pixel_data);
        }
    }
}
