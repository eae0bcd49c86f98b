use anyhow::Result;
use color_thief::ColorFormat;
use colorburst_core::{Color, ColorExtractor};
use image::RgbaImage;
use thiserror::Error;

pub const DEFAULT_COLOR_COUNT: u32 = 10;
pub const DEFAULT_QUALITY: u32 = 10;
const MAX_COLOR_COUNT: u32 = 20;
// color_thief only takes strides up to 10
const MAX_QUALITY: u32 = 10;

const MIN_ALPHA: u8 = 125;
const WHITE_THRESHOLD: u8 = 250;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("a palette needs 2 to 20 colors; use get_color for a single one")]
    SingleColorPalette,
    #[error("image has no opaque, non-white pixels to sample")]
    NoPixels,
    #[error("quantization failed: {0}")]
    Quantize(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColorThief;

impl ColorExtractor<RgbaImage> for ColorThief {
    fn get_color(&self, image: &RgbaImage, quality: Option<u32>) -> Result<Color> {
        let palette = self.get_palette(image, Some(5), quality)?;
        Ok(palette.into_iter().next().ok_or(ExtractError::NoPixels)?)
    }

    fn get_palette(&self, image: &RgbaImage, color_count: Option<u32>, quality: Option<u32>) -> Result<Vec<Color>> {
        let color_count = match color_count {
            None => DEFAULT_COLOR_COUNT,
            Some(1) => return Err(ExtractError::SingleColorPalette.into()),
            Some(n) => n.clamp(2, MAX_COLOR_COUNT),
        };
        let quality = quality
            .filter(|&q| q >= 1)
            .unwrap_or(DEFAULT_QUALITY)
            .min(MAX_QUALITY);

        if !has_samples(image, quality as usize) {
            return Err(ExtractError::NoPixels.into());
        }

        let palette = color_thief::get_palette(image.as_raw(), ColorFormat::Rgba, quality as u8, color_count as u8)
            .map_err(|e| ExtractError::Quantize(format!("{:?}", e)))?;
        log::debug!("Extracted {} colors (stride {})", palette.len(), quality);

        Ok(palette.into_iter().map(|c| Color::new(c.r, c.g, c.b)).collect())
    }
}

// Mirrors the pixel filter inside color_thief.
fn has_samples(image: &RgbaImage, stride: usize) -> bool {
    image
        .as_raw()
        .chunks_exact(4)
        .step_by(stride.max(1))
        .any(|p| p[3] >= MIN_ALPHA && !(p[0] > WHITE_THRESHOLD && p[1] > WHITE_THRESHOLD && p[2] > WHITE_THRESHOLD))
}
