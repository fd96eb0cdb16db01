//! Types used by the image preprocessor.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value range of the `f32` pixels fed to the model.
///
/// The shipped classifier was calibrated on raw `[0, 255]` magnitudes, which is why
/// [`PixelScale::Raw`] is the default. Feeding it `[0, 1]` inputs produces confident but
/// wrong predictions without any error, so the loader refuses to pair a preprocessor and a
/// model whose scales disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelScale {
    /// Pixel values kept as-is in `[0, 255]`.
    #[default]
    Raw,
    /// Pixel values divided by 255 into `[0, 1]`.
    UnitInterval,
}

impl PixelScale {
    /// Multiplier applied to each 8-bit channel value.
    pub fn factor(self) -> f32 {
        match self {
            PixelScale::Raw => 1.0,
            PixelScale::UnitInterval => 1.0 / 255.0,
        }
    }
}

impl fmt::Display for PixelScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelScale::Raw => write!(f, "raw"),
            PixelScale::UnitInterval => write!(f, "unit_interval"),
        }
    }
}

impl FromStr for PixelScale {
    type Err = String;

    /// Accepts the names used in configuration files and model metadata.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" | "0-255" | "0_255" => Ok(PixelScale::Raw),
            "unit_interval" | "unit" | "0-1" | "0_1" => Ok(PixelScale::UnitInterval),
            other => Err(format!("unknown pixel scale '{other}'")),
        }
    }
}

/// Resampling filter used when resizing to the model resolution.
///
/// Every variant is deterministic: identical bytes always resize to identical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    /// Nearest neighbour.
    Nearest,
    /// Bilinear.
    Triangle,
    /// Bicubic.
    #[default]
    CatmullRom,
    /// Gaussian.
    Gaussian,
    /// Lanczos with window 3.
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl FromStr for ResizeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(ResizeFilter::Nearest),
            "triangle" | "bilinear" => Ok(ResizeFilter::Triangle),
            "catmull_rom" | "catmullrom" | "bicubic" => Ok(ResizeFilter::CatmullRom),
            "gaussian" => Ok(ResizeFilter::Gaussian),
            "lanczos3" | "lanczos" => Ok(ResizeFilter::Lanczos3),
            other => Err(format!("unknown resize filter '{other}'")),
        }
    }
}
