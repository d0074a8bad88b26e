//! Image decoding WASM bindings.
//!
//! This module exposes the squish-core decoding functions to JavaScript.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode an image (JPEG, PNG, WebP, GIF, BMP, TIFF)
//! - [`get_orientation`] - Probe the EXIF orientation of image bytes
//! - [`resize`] - Resize an image to exact dimensions
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize } from '@squish/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const half = resize(image, image.width / 2, image.height / 2, 2);
//! console.log(`Resized to ${half.width}x${half.height}`);
//! ```

use crate::types::{filter_from_u8, JsDecodedImage};
use squish_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an image from bytes.
///
/// The format is detected from the content; EXIF orientation correction is
/// applied automatically so the raster matches what the user sees.
///
/// # Arguments
///
/// * `bytes` - The raw image file bytes as a `Uint8Array`
///
/// # Errors
///
/// Returns an error if the bytes are not a recognized image format or the
/// file is corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the EXIF orientation value (1-8) of image bytes.
///
/// Returns 1 (normal) for formats without EXIF data.
#[wasm_bindgen]
pub fn get_orientation(bytes: &[u8]) -> u8 {
    decode::get_orientation(bytes) as u8
}

/// Resize an image to exact dimensions.
///
/// # Arguments
///
/// * `image` - The source image
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
/// * `filter` - Filter type: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3
///
/// # Errors
///
/// Returns an error if a target dimension is zero.
#[wasm_bindgen]
pub fn resize(
    image: &JsDecodedImage,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    decode::resize(&image.to_decoded(), width, height, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
