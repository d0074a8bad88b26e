//! Squish Core - Image conversion library
//!
//! This crate provides the core conversion functionality for Squish:
//! decoding common raster formats, resizing, and re-encoding to WebP, PNG,
//! or JPEG — either at a fixed quality or fitted to a target output size
//! by searching the encoder's quality range.

pub mod convert;
pub mod decode;
pub mod encode;

pub use convert::{
    check_target_size, convert, convert_with_encoder, resolve_dimensions, BudgetOutcome,
    ConversionResult, ConvertError, TargetSizeCheck, MIN_TARGET_SIZE_BYTES,
};
pub use encode::{
    fit_to_budget, BudgetFit, EncodeError, FittedEncoding, FormatEncoder, RasterEncoder,
};

/// Default encoder quality when the caller doesn't specify one.
pub const DEFAULT_QUALITY: f32 = 0.8;

/// Output formats supported by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// WebP (lossy, quality-controlled)
    #[default]
    Webp,
    /// PNG (lossless, quality parameter ignored)
    Png,
    /// JPEG (lossy, quality-controlled)
    #[serde(alias = "jpg")]
    Jpeg,
}

impl OutputFormat {
    /// Returns true if the encoder for this format honors a quality setting.
    ///
    /// PNG is lossless: its encoder accepts a quality argument for interface
    /// uniformity but the value has no effect on output size.
    pub fn has_quality_control(self) -> bool {
        !matches!(self, OutputFormat::Png)
    }

    /// MIME type for the encoded output.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Webp => "image/webp",
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    /// File extension for the encoded output (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Webp => "webp",
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// Unit for caller-specified target sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum SizeUnit {
    /// Kibibytes (value * 1024 bytes)
    #[serde(rename = "KB")]
    Kb,
    /// Mebibytes (value * 1024 * 1024 bytes)
    #[default]
    #[serde(rename = "MB")]
    Mb,
}

impl SizeUnit {
    /// Number of bytes in one unit.
    pub fn bytes(self) -> u64 {
        match self {
            SizeUnit::Kb => 1024,
            SizeUnit::Mb => 1024 * 1024,
        }
    }
}

/// A target output size expressed as a value plus unit, as entered in the UI.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TargetSize {
    /// Size value in the selected unit (e.g. 2.5 for "2.5 MB").
    pub value: f64,
    /// Unit the value is expressed in.
    pub unit: SizeUnit,
}

impl TargetSize {
    /// Create a new target size.
    pub fn new(value: f64, unit: SizeUnit) -> Self {
        Self { value, unit }
    }

    /// Resolve to a whole number of bytes.
    ///
    /// Non-positive or non-finite values collapse to 0, which callers treat
    /// as "no target set".
    pub fn to_bytes(&self) -> u64 {
        if !self.value.is_finite() || self.value <= 0.0 {
            return 0;
        }
        (self.value * self.unit.bytes() as f64).round() as u64
    }
}

/// Per-file conversion settings.
///
/// One instance is constructed per conversion job and consumed by
/// [`convert`]. When `target_size` resolves to a positive byte count it
/// overrides `quality` entirely: the encoder searches for the highest
/// quality that fits the budget instead of using the fixed value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionSettings {
    /// Output format to encode to.
    pub format: OutputFormat,
    /// Encoder quality in 0.0 to 1.0. Ignored when `target_size` is set.
    pub quality: f32,
    /// Explicit output width in pixels.
    pub width: Option<u32>,
    /// Explicit output height in pixels.
    pub height: Option<u32>,
    /// Uniform scale factor, used only when no explicit dimension is set.
    pub scale: f32,
    /// Optional target output size. Zero or negative values mean "unset".
    pub target_size: Option<TargetSize>,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Webp,
            quality: DEFAULT_QUALITY,
            width: None,
            height: None,
            scale: 1.0,
            target_size: None,
        }
    }
}

impl ConversionSettings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// The resolved byte budget, if a positive target size is set.
    pub fn target_size_bytes(&self) -> Option<u64> {
        self.target_size
            .as_ref()
            .map(TargetSize::to_bytes)
            .filter(|bytes| *bytes > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ConversionSettings::new();
        assert_eq!(settings.format, OutputFormat::Webp);
        assert_eq!(settings.quality, DEFAULT_QUALITY);
        assert_eq!(settings.scale, 1.0);
        assert!(settings.width.is_none());
        assert!(settings.height.is_none());
        assert!(settings.target_size_bytes().is_none());
    }

    #[test]
    fn test_size_unit_conversion() {
        assert_eq!(TargetSize::new(4.0, SizeUnit::Kb).to_bytes(), 4 * 1024);
        assert_eq!(TargetSize::new(2.0, SizeUnit::Mb).to_bytes(), 2 * 1024 * 1024);
        assert_eq!(TargetSize::new(0.5, SizeUnit::Mb).to_bytes(), 512 * 1024);
    }

    #[test]
    fn test_target_size_non_positive_is_unset() {
        assert_eq!(TargetSize::new(0.0, SizeUnit::Mb).to_bytes(), 0);
        assert_eq!(TargetSize::new(-1.5, SizeUnit::Kb).to_bytes(), 0);
        assert_eq!(TargetSize::new(f64::NAN, SizeUnit::Mb).to_bytes(), 0);

        let mut settings = ConversionSettings::new();
        settings.target_size = Some(TargetSize::new(0.0, SizeUnit::Mb));
        assert!(settings.target_size_bytes().is_none());
    }

    #[test]
    fn test_target_size_bytes_when_set() {
        let mut settings = ConversionSettings::new();
        settings.target_size = Some(TargetSize::new(1.0, SizeUnit::Mb));
        assert_eq!(settings.target_size_bytes(), Some(1024 * 1024));
    }

    #[test]
    fn test_format_quality_control() {
        assert!(OutputFormat::Webp.has_quality_control());
        assert!(OutputFormat::Jpeg.has_quality_control());
        assert!(!OutputFormat::Png.has_quality_control());
    }

    #[test]
    fn test_format_accessors() {
        assert_eq!(OutputFormat::Webp.mime_type(), "image/webp");
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
    }
}
