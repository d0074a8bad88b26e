//! Image decoding pipeline for Squish.
//!
//! This module provides functionality for:
//! - Decoding common raster formats (JPEG, PNG, WebP, GIF, BMP, TIFF)
//! - EXIF orientation correction for photographic sources
//! - Image resizing for conversion output
//!
//! # Architecture
//!
//! The decoding pipeline is designed to be used from Web Workers via WASM
//! bindings. All operations are synchronous and single-threaded within WASM.
//! A decode produces an owned RGB raster scoped to one conversion job; the
//! buffer is released when the job's result is returned, on every exit path.

mod raster;
mod resize;
mod types;

pub use raster::{decode_image, decode_image_no_orientation, get_orientation};
pub use resize::resize;
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
