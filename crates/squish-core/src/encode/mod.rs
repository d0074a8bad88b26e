//! Image encoding pipeline for Squish.
//!
//! This module provides functionality for:
//! - Encoding RGB rasters to WebP, PNG, or JPEG with configurable quality
//! - Fitting an encoding to a target byte budget by searching the quality
//!   range of the format's encoder
//!
//! # Architecture
//!
//! The encoder is modeled as a capability behind the [`FormatEncoder`]
//! trait. The budget search in [`target_size`] is generic over that trait,
//! so it can be unit tested against deterministic synthetic encoders
//! instead of real codecs. [`RasterEncoder`] is the production
//! implementation, used from Web Workers via WASM bindings. All operations
//! are synchronous and single-threaded within WASM.

mod raster;
mod target_size;

pub use raster::{EncodeError, FormatEncoder, RasterEncoder};
pub use target_size::{
    fit_to_budget, BudgetFit, FittedEncoding, QUALITY_FLOOR, SEARCH_ITERATIONS,
};
