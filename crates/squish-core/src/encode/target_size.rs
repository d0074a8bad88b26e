//! Target size fitting: find the highest quality that fits a byte budget.
//!
//! Encoded size is assumed monotonically non-decreasing in quality for the
//! lossy formats (JPEG, WebP). That holds in practice rather than by codec
//! guarantee, so the binary search below is a heuristic, not a proof-backed
//! optimum. Ten iterations give a quality resolution of ~1/1024, more than
//! enough for a 0-100% slider.
//!
//! Each iteration is one full re-encode of the raster, which can be
//! expensive for large images, so the iteration count is fixed rather than
//! convergence-driven. Iterations are strictly sequential: each probe's
//! fit/no-fit result steers the next one.

use crate::decode::DecodedImage;
use crate::OutputFormat;

use super::{EncodeError, FormatEncoder};

/// Number of binary search iterations over the quality range.
pub const SEARCH_ITERATIONS: u32 = 10;

/// Quality used for the last-resort encode when no probed quality fits.
pub const QUALITY_FLOOR: f32 = 0.01;

/// Whether a fitted encoding honored the requested byte budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetFit {
    /// The encoding is within the requested budget.
    Satisfied,
    /// The budget was not achievable; this is the smallest encoding the
    /// format could produce (quality floor, or the single PNG encoding).
    BestEffort,
}

/// Result of fitting an encoding to a byte budget.
#[derive(Debug, Clone)]
pub struct FittedEncoding {
    /// The encoded payload.
    pub bytes: Vec<u8>,
    /// Quality the payload was encoded at.
    pub quality: f32,
    /// Whether the budget was honored.
    pub fit: BudgetFit,
}

/// Find the largest encoding of `image` that fits within `budget_bytes`.
///
/// Searches the encoder's quality range with a bounded binary search.
/// Dimension selection is not part of the search: the raster is taken as
/// already resampled, and only quality varies.
///
/// # Behavior
///
/// 1. Encode at quality 1.0 first. If that fits, it is returned immediately
///    (max quality already satisfies the budget, nothing to search).
/// 2. For formats without quality control (PNG), that single encoding is
///    returned as-is, flagged [`BudgetFit::BestEffort`] when it exceeds the
///    budget. No further encodes are attempted.
/// 3. Otherwise run [`SEARCH_ITERATIONS`] rounds of binary search over
///    quality: a probe that fits becomes the current best candidate and
///    raises the lower bound; a probe that exceeds the budget lowers the
///    upper bound.
/// 4. If no probe ever fit, one final encode at [`QUALITY_FLOOR`] is
///    returned as [`BudgetFit::BestEffort`].
///
/// # Errors
///
/// Any encoder failure aborts the search immediately and is propagated;
/// a failed encode is never retried, at the same or any other quality.
pub fn fit_to_budget<E: FormatEncoder>(
    encoder: &E,
    image: &DecodedImage,
    format: OutputFormat,
    budget_bytes: u64,
) -> Result<FittedEncoding, EncodeError> {
    // Fast path: max quality already fits
    let max_quality = encoder.encode(image, format, 1.0)?;
    if max_quality.len() as u64 <= budget_bytes {
        return Ok(FittedEncoding {
            bytes: max_quality,
            quality: 1.0,
            fit: BudgetFit::Satisfied,
        });
    }

    // Quality can't shrink a PNG; return the one encoding we have
    if !format.has_quality_control() {
        return Ok(FittedEncoding {
            bytes: max_quality,
            quality: 1.0,
            fit: BudgetFit::BestEffort,
        });
    }

    let mut low = 0.0f32;
    let mut high = 1.0f32;
    let mut best: Option<(f32, Vec<u8>)> = None;

    for _ in 0..SEARCH_ITERATIONS {
        let mid = (low + high) / 2.0;
        let bytes = encoder.encode(image, format, mid)?;

        if bytes.len() as u64 <= budget_bytes {
            // Candidate found; search for a higher quality that still fits
            best = Some((mid, bytes));
            low = mid;
        } else {
            // Too big, reduce quality
            high = mid;
        }
    }

    match best {
        Some((quality, bytes)) => Ok(FittedEncoding {
            bytes,
            quality,
            fit: BudgetFit::Satisfied,
        }),
        None => {
            // Even the lowest probed quality exceeded the budget. Encode at
            // the floor and report the overage to the caller.
            let bytes = encoder.encode(image, format, QUALITY_FLOOR)?;
            Ok(FittedEncoding {
                bytes,
                quality: QUALITY_FLOOR,
                fit: BudgetFit::BestEffort,
            })
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;

    struct LinearEncoder {
        scale: f64,
        calls: Cell<u32>,
    }

    impl FormatEncoder for LinearEncoder {
        fn encode(
            &self,
            _image: &DecodedImage,
            _format: OutputFormat,
            quality: f32,
        ) -> Result<Vec<u8>, EncodeError> {
            self.calls.set(self.calls.get() + 1);
            Ok(vec![0u8; (quality as f64 * self.scale).floor() as usize])
        }
    }

    fn raster() -> DecodedImage {
        DecodedImage::new(2, 2, vec![0u8; 2 * 2 * 3])
    }

    proptest! {
        /// Property: with a monotonic encoder, a satisfied result never
        /// exceeds the budget, and a best-effort result is flagged.
        #[test]
        fn prop_result_respects_budget(budget in 0u64..150_000) {
            let encoder = LinearEncoder { scale: 100_000.0, calls: Cell::new(0) };
            let fitted =
                fit_to_budget(&encoder, &raster(), OutputFormat::Jpeg, budget).unwrap();

            match fitted.fit {
                BudgetFit::Satisfied => {
                    prop_assert!(fitted.bytes.len() as u64 <= budget);
                }
                BudgetFit::BestEffort => {
                    prop_assert!(fitted.bytes.len() as u64 > budget);
                    prop_assert_eq!(fitted.quality, QUALITY_FLOOR);
                }
            }
        }

        /// Property: the search never issues more encode calls than the
        /// fast path + iteration budget + one floor encode.
        #[test]
        fn prop_bounded_encode_calls(budget in 0u64..150_000) {
            let encoder = LinearEncoder { scale: 100_000.0, calls: Cell::new(0) };
            fit_to_budget(&encoder, &raster(), OutputFormat::Jpeg, budget).unwrap();
            prop_assert!(encoder.calls.get() <= 1 + SEARCH_ITERATIONS + 1);
        }

        /// Property: when the budget is satisfiable, the returned quality is
        /// within one search step of the true optimum.
        #[test]
        fn prop_quality_within_resolution(budget in 2_000u64..99_000) {
            let encoder = LinearEncoder { scale: 100_000.0, calls: Cell::new(0) };
            let fitted =
                fit_to_budget(&encoder, &raster(), OutputFormat::Jpeg, budget).unwrap();

            prop_assert_eq!(fitted.fit, BudgetFit::Satisfied);
            let step = 1.0 / 1024.0;
            let next_size = ((fitted.quality as f64 + step) * 100_000.0).floor() as u64;
            prop_assert!(next_size > budget);
        }
    }
}
