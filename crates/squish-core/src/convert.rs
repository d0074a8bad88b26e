//! The conversion pipeline: decode, resize, encode.
//!
//! One call to [`convert`] is one conversion job: the source bytes are
//! decoded into an owned raster, output dimensions are resolved, the raster
//! is resampled exactly once, then encoded — at a fixed quality, or fitted
//! to a byte budget when one is set. The job holds no state across calls
//! and shares nothing with concurrent jobs; the decoded raster is dropped
//! on every exit path.
//!
//! # Pre-flight guard
//!
//! Target sizes below [`MIN_TARGET_SIZE_BYTES`] are rejected before any
//! decode or encode work: encoders can't usefully target below that floor
//! for realistic raster sizes, and attempting it produces pathological
//! low-quality artifacts. The same [`check_target_size`] backs the UI gate
//! that decides whether to offer the conversion at all, so the two checks
//! can't drift apart.

use thiserror::Error;

use crate::decode::{self, DecodeError, FilterType};
use crate::encode::{fit_to_budget, BudgetFit, EncodeError, FormatEncoder, RasterEncoder};
use crate::{ConversionSettings, OutputFormat};

/// Hard lower bound for a target size, in bytes (5 KiB).
pub const MIN_TARGET_SIZE_BYTES: u64 = 5 * 1024;

/// Budgets below this fraction of the source file size get an
/// extreme-compression warning (non-fatal).
pub const EXTREME_COMPRESSION_RATIO: f64 = 0.005;

/// Errors that fail a conversion job.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Resolved output dimensions are not positive.
    #[error("Resolved dimensions {width}x{height} are invalid")]
    InvalidDimension { width: i64, height: i64 },

    /// The source bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The encoder failed to produce data.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The requested target size is below the absolute floor.
    #[error("Target size of {requested} bytes is below the {floor} byte minimum")]
    BudgetTooSmall { requested: u64, floor: u64 },
}

/// Outcome of the pre-flight target size check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSizeCheck {
    /// The budget is reasonable for the source.
    Ok,
    /// The budget is under 0.5% of the source size; conversion proceeds
    /// but the result will likely look heavily degraded.
    ExtremeCompression,
}

/// How the result relates to the requested byte budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetOutcome {
    /// No target size was set; the fixed quality was used.
    NotRequested,
    /// The output is within the requested budget.
    Satisfied,
    /// The budget was unachievable; the output is the smallest encoding
    /// the format could produce and exceeds the budget.
    BestEffort,
}

impl From<BudgetFit> for BudgetOutcome {
    fn from(fit: BudgetFit) -> Self {
        match fit {
            BudgetFit::Satisfied => BudgetOutcome::Satisfied,
            BudgetFit::BestEffort => BudgetOutcome::BestEffort,
        }
    }
}

/// A finished conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// The encoded payload.
    pub bytes: Vec<u8>,
    /// Format the payload was encoded to.
    pub format: OutputFormat,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Quality the payload was encoded at (1.0 when the fast path fit,
    /// the searched value when a budget was set, the caller's fixed
    /// quality otherwise).
    pub quality: f32,
    /// Whether a requested byte budget was honored.
    pub budget: BudgetOutcome,
    /// True when the budget was under 0.5% of the source size.
    pub extreme_compression: bool,
}

/// Validate a byte budget against the source size before doing any work.
///
/// # Errors
///
/// Returns [`ConvertError::BudgetTooSmall`] when the budget is below
/// [`MIN_TARGET_SIZE_BYTES`]. This is the only hard failure; a budget that
/// is merely tiny relative to the source yields
/// [`TargetSizeCheck::ExtremeCompression`], a warning the caller may
/// surface while proceeding.
pub fn check_target_size(
    budget_bytes: u64,
    source_bytes: u64,
) -> Result<TargetSizeCheck, ConvertError> {
    if budget_bytes < MIN_TARGET_SIZE_BYTES {
        return Err(ConvertError::BudgetTooSmall {
            requested: budget_bytes,
            floor: MIN_TARGET_SIZE_BYTES,
        });
    }

    if (budget_bytes as f64) < source_bytes as f64 * EXTREME_COMPRESSION_RATIO {
        return Ok(TargetSizeCheck::ExtremeCompression);
    }

    Ok(TargetSizeCheck::Ok)
}

/// Compute final output dimensions from the source size and settings.
///
/// Priority order:
/// 1. Both explicit width and height: used verbatim (aspect ratio may be
///    distorted — that is the caller's choice).
/// 2. Only width: height derived preserving the source aspect ratio.
/// 3. Only height: width derived preserving the source aspect ratio.
/// 4. Neither, scale != 1: both derived from the scale factor.
/// 5. Otherwise: source dimensions unchanged.
///
/// Pure function, no side effects.
///
/// # Errors
///
/// Returns [`ConvertError::InvalidDimension`] when a resolved dimension
/// lands below 1 pixel (zero explicit value, vanishing scale) or overflows.
pub fn resolve_dimensions(
    source_width: u32,
    source_height: u32,
    width: Option<u32>,
    height: Option<u32>,
    scale: f32,
) -> Result<(u32, u32), ConvertError> {
    if source_width == 0 || source_height == 0 {
        return Err(ConvertError::InvalidDimension {
            width: source_width as i64,
            height: source_height as i64,
        });
    }

    let src_w = source_width as f64;
    let src_h = source_height as f64;

    let (w, h) = match (width, height) {
        (Some(w), Some(h)) => (w as f64, h as f64),
        (Some(w), None) => (w as f64, (w as f64 * src_h / src_w).round()),
        (None, Some(h)) => ((h as f64 * src_w / src_h).round(), h as f64),
        (None, None) if (scale - 1.0).abs() > f32::EPSILON => {
            ((src_w * scale as f64).round(), (src_h * scale as f64).round())
        }
        (None, None) => (src_w, src_h),
    };

    if !w.is_finite() || !h.is_finite() || w < 1.0 || h < 1.0 || w > u32::MAX as f64 || h > u32::MAX as f64 {
        return Err(ConvertError::InvalidDimension {
            width: w as i64,
            height: h as i64,
        });
    }

    Ok((w as u32, h as u32))
}

/// Convert an image file with the production encoder.
///
/// Decodes `file_bytes`, resolves output dimensions, resamples once with
/// Lanczos3, then encodes per `settings`: fixed quality, or the highest
/// quality fitting the target size when one is set.
pub fn convert(
    file_bytes: &[u8],
    settings: &ConversionSettings,
) -> Result<ConversionResult, ConvertError> {
    convert_with_encoder(file_bytes, settings, &RasterEncoder::new())
}

/// Convert an image file with a caller-supplied encoder.
///
/// This is the testability seam: the pipeline and the quality search run
/// against any [`FormatEncoder`], so tests can use deterministic synthetic
/// encoders instead of real codecs.
pub fn convert_with_encoder<E: FormatEncoder>(
    file_bytes: &[u8],
    settings: &ConversionSettings,
    encoder: &E,
) -> Result<ConversionResult, ConvertError> {
    // Pre-flight: reject hopeless budgets before any decode work. This
    // re-checks what the UI gate already checked, in case settings changed
    // between offer and invocation.
    let budget = settings.target_size_bytes();
    let mut extreme_compression = false;
    if let Some(budget_bytes) = budget {
        extreme_compression = matches!(
            check_target_size(budget_bytes, file_bytes.len() as u64)?,
            TargetSizeCheck::ExtremeCompression
        );
    }

    let source = decode::decode_image(file_bytes)?;
    let (width, height) = resolve_dimensions(
        source.width,
        source.height,
        settings.width,
        settings.height,
        settings.scale,
    )?;

    // Resample exactly once; the quality search below re-encodes this
    // raster without touching dimensions again.
    let resized = decode::resize(&source, width, height, FilterType::Lanczos3)?;
    drop(source);

    match budget {
        Some(budget_bytes) => {
            let fitted = fit_to_budget(encoder, &resized, settings.format, budget_bytes)?;
            Ok(ConversionResult {
                bytes: fitted.bytes,
                format: settings.format,
                width,
                height,
                quality: fitted.quality,
                budget: fitted.fit.into(),
                extreme_compression,
            })
        }
        None => {
            let bytes = encoder.encode(&resized, settings.format, settings.quality)?;
            Ok(ConversionResult {
                bytes,
                format: settings.format,
                width,
                height,
                quality: settings.quality,
                budget: BudgetOutcome::NotRequested,
                extreme_compression,
            })
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
