//! Raster decoding with EXIF orientation handling.
//!
//! All formats the converter accepts go through [`decode_image`], which
//! sniffs the container, decodes to RGB8 and applies the EXIF orientation
//! so downstream resizing and encoding see the image the way the user does.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, DecodedImage, Orientation};

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// The format is detected from the file content, not from a filename.
/// Supported inputs are the formats the `image` crate reader is built with:
/// JPEG, PNG, WebP, GIF, BMP and TIFF.
///
/// # Arguments
///
/// * `bytes` - Raw image file bytes
///
/// # Returns
///
/// A `DecodedImage` with RGB pixel data and correct orientation applied.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format is not recognized.
/// Returns `DecodeError::CorruptedFile` if the file cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    // Extract EXIF orientation before decoding; non-EXIF containers
    // (PNG, BMP, ...) simply report Normal.
    let orientation = extract_orientation(bytes);

    let img = decode_to_dynamic(bytes)?;

    // Apply orientation transformation
    let oriented_img = apply_orientation(img, orientation);

    // Convert to RGB8; alpha is flattened since the converter works on
    // opaque rasters (matches canvas drawImage behavior).
    let rgb_img = oriented_img.into_rgb8();
    Ok(DecodedImage::from_rgb_image(rgb_img))
}

/// Decode an image from bytes without applying EXIF orientation.
///
/// Use this when the source is known to be correctly oriented, or when
/// orientation is handled separately.
pub fn decode_image_no_orientation(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let img = decode_to_dynamic(bytes)?;
    let rgb_img = img.into_rgb8();
    Ok(DecodedImage::from_rgb_image(rgb_img))
}

/// Extract the EXIF orientation value from image bytes (for external use).
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn decode_to_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let cursor = Cursor::new(bytes);
    let reader = ImageReader::new(cursor)
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Some(value) = field.value.get_uint(0) {
                    return Orientation::from(value);
                }
            }
            Orientation::Normal
        }
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    /// Encode a small gradient image to PNG bytes for decode tests.
    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 255 / width.max(1)) as u8);
                pixels.push((y * 255 / height.max(1)) as u8);
                pixels.push(128);
            }
        }
        let mut buffer = Cursor::new(Vec::new());
        PngEncoder::new(&mut buffer)
            .write_image(&pixels, width, height, ExtendedColorType::Rgb8)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_valid_png() {
        let bytes = png_fixture(16, 8);
        let img = decode_image(&bytes).unwrap();

        assert_eq!(img.width, 16);
        assert_eq!(img.height, 8);
        assert_eq!(img.pixels.len(), 16 * 8 * 3);
    }

    #[test]
    fn test_decode_invalid_bytes() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_empty_bytes() {
        let result = decode_image(&[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_truncated_png() {
        let mut bytes = png_fixture(16, 16);
        bytes.truncate(bytes.len() / 2);
        let result = decode_image(&bytes);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_orientation_defaults_to_normal_without_exif() {
        // PNG carries no EXIF container
        let bytes = png_fixture(4, 4);
        assert_eq!(get_orientation(&bytes), Orientation::Normal);
    }

    #[test]
    fn test_no_orientation_variant_matches_for_png() {
        let bytes = png_fixture(8, 8);
        let a = decode_image(&bytes).unwrap();
        let b = decode_image_no_orientation(&bytes).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }
}
