//! Conversion WASM bindings.
//!
//! This module exposes the full conversion pipeline to JavaScript: decode,
//! resize, then encode at a fixed quality or fitted to a target size.
//!
//! # Functions
//!
//! - [`convert_image`] - Run one conversion job
//! - [`check_target_size`] - Pre-flight a byte budget before offering the
//!   conversion action in the UI
//!
//! # Example
//!
//! ```typescript
//! import { convert_image, check_target_size } from '@squish/wasm';
//!
//! // Gate the convert button on the same thresholds the pipeline enforces
//! check_target_size(budgetBytes, file.size);
//!
//! const result = convert_image(bytes, {
//!   format: 'jpeg',
//!   width: 1920,
//!   targetSize: { value: 500, unit: 'KB' },
//! });
//! if (result.best_effort) {
//!   console.warn('Budget was not achievable; returned smallest encoding');
//! }
//! ```

use js_sys::Uint8Array;
use squish_core::{BudgetOutcome, ConversionResult, ConversionSettings, TargetSizeCheck};
use wasm_bindgen::prelude::*;

/// Outcome of the target size pre-flight check.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSizeStatus {
    /// Budget is reasonable for this source.
    Ok,
    /// Budget is under 0.5% of the source size; conversion will proceed
    /// but the output will be heavily degraded.
    ExtremeCompression,
}

/// A finished conversion, exposed to JavaScript.
#[wasm_bindgen]
pub struct JsConversionResult {
    inner: ConversionResult,
}

#[wasm_bindgen]
impl JsConversionResult {
    /// The encoded payload as a Uint8Array (copied to JS memory).
    pub fn bytes(&self) -> Uint8Array {
        Uint8Array::from(self.inner.bytes.as_slice())
    }

    /// Size of the encoded payload in bytes.
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.bytes.len()
    }

    /// Output width in pixels.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Output height in pixels.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Quality the payload was encoded at (0.0 to 1.0).
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.inner.quality
    }

    /// MIME type of the encoded payload.
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.format.mime_type().to_string()
    }

    /// True when a target size was requested and the output fits it.
    #[wasm_bindgen(getter)]
    pub fn budget_satisfied(&self) -> bool {
        self.inner.budget == BudgetOutcome::Satisfied
    }

    /// True when a target size was requested but not achievable: the
    /// payload is the smallest encoding the format could produce and
    /// exceeds the budget. The UI must surface this distinctly from a
    /// satisfied result.
    #[wasm_bindgen(getter)]
    pub fn best_effort(&self) -> bool {
        self.inner.budget == BudgetOutcome::BestEffort
    }

    /// True when the budget was under 0.5% of the source size.
    #[wasm_bindgen(getter)]
    pub fn extreme_compression(&self) -> bool {
        self.inner.extreme_compression
    }
}

/// Run one conversion job.
///
/// # Arguments
///
/// * `bytes` - Source file bytes as a `Uint8Array`
/// * `settings` - Settings object, e.g.
///   `{ format: 'webp', quality: 0.8, width: 1920, targetSize: { value: 2, unit: 'MB' } }`.
///   Omitted fields take their defaults.
///
/// # Errors
///
/// Returns an error for malformed settings, undecodable sources, invalid
/// resolved dimensions, budgets below the 5 KiB floor, or encoder failures.
#[wasm_bindgen]
pub fn convert_image(bytes: &[u8], settings: JsValue) -> Result<JsConversionResult, JsValue> {
    let settings: ConversionSettings = serde_wasm_bindgen::from_value(settings)
        .map_err(|e| JsValue::from_str(&format!("Invalid settings: {e}")))?;

    let result = squish_core::convert(bytes, &settings)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    web_sys::console::log_1(
        &format!(
            "squish: {} bytes -> {} bytes ({}x{} {})",
            bytes.len(),
            result.bytes.len(),
            result.width,
            result.height,
            result.format.extension(),
        )
        .into(),
    );

    Ok(JsConversionResult { inner: result })
}

/// Pre-flight a byte budget against a source file size.
///
/// Backed by the same thresholds the conversion itself enforces, so the UI
/// gate and the execution-time check cannot disagree.
///
/// # Errors
///
/// Returns an error when the budget is below the 5 KiB absolute floor; the
/// conversion action should not be offered in that case.
#[wasm_bindgen]
pub fn check_target_size(budget_bytes: f64, source_bytes: f64) -> Result<TargetSizeStatus, JsValue> {
    let budget = if budget_bytes.is_finite() && budget_bytes > 0.0 {
        budget_bytes.round() as u64
    } else {
        0
    };
    let source = if source_bytes.is_finite() && source_bytes > 0.0 {
        source_bytes.round() as u64
    } else {
        0
    };

    match squish_core::check_target_size(budget, source) {
        Ok(TargetSizeCheck::Ok) => Ok(TargetSizeStatus::Ok),
        Ok(TargetSizeCheck::ExtremeCompression) => Ok(TargetSizeStatus::ExtremeCompression),
        Err(e) => Err(JsValue::from_str(&e.to_string())),
    }
}
