//! Squish WASM - WebAssembly bindings for Squish
//!
//! This crate exposes the squish-core conversion functionality to the
//! browser application. Conversion runs inside Web Workers; the bindings
//! here are the worker-side entry points.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings (decode, resize)
//! - `convert` - Conversion bindings (full pipeline, target size pre-flight)
//!
//! # Usage
//!
//! ```typescript
//! import init, { convert_image, check_target_size } from '@squish/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = convert_image(bytes, {
//!   format: 'webp',
//!   targetSize: { value: 2, unit: 'MB' },
//! });
//! console.log(`Converted to ${result.byte_length} bytes`);
//! ```

use wasm_bindgen::prelude::*;

mod convert;
mod decode;
mod types;

// Re-export public types
pub use convert::{check_target_size, convert_image, JsConversionResult, TargetSizeStatus};
pub use decode::{decode_image, get_orientation, resize};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: set up a panic hook for readable errors in the browser
    // console when the console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
