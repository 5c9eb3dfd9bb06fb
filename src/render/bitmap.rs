//! Finished label bitmaps and their PNG encoding.

use base64::Engine;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::path::Path;

use crate::error::LabelError;

const METERS_PER_INCH: f64 = 0.0254;

/// A composed label, optionally tagged with its print resolution.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub image: RgbImage,
    /// Written to the PNG `pHYs` chunk when present.
    pub dpi: Option<u32>,
}

impl Bitmap {
    pub fn new(image: RgbImage) -> Self {
        Self { image, dpi: None }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, LabelError> {
        let mut buffer = Vec::new();
        match self.dpi {
            Some(dpi) => {
                let mut encoder = png::Encoder::new(&mut buffer, self.width(), self.height());
                encoder.set_color(png::ColorType::Rgb);
                encoder.set_depth(png::BitDepth::Eight);
                let ppm = (dpi as f64 / METERS_PER_INCH).round() as u32;
                encoder.set_pixel_dims(Some(png::PixelDimensions {
                    xppu: ppm,
                    yppu: ppm,
                    unit: png::Unit::Meter,
                }));
                let mut writer = encoder
                    .write_header()
                    .map_err(|e| LabelError::Image(format!("PNG header: {}", e)))?;
                writer
                    .write_image_data(self.image.as_raw())
                    .map_err(|e| LabelError::Image(format!("PNG data: {}", e)))?;
                writer
                    .finish()
                    .map_err(|e| LabelError::Image(format!("PNG finish: {}", e)))?;
            }
            None => {
                image::codecs::png::PngEncoder::new(&mut buffer)
                    .write_image(
                        self.image.as_raw(),
                        self.width(),
                        self.height(),
                        ExtendedColorType::Rgb8,
                    )
                    .map_err(|e| LabelError::Image(e.to_string()))?;
            }
        }
        Ok(buffer)
    }

    /// Encode as PNG and write to `path`.
    pub fn save_png(&self, path: &Path) -> Result<(), LabelError> {
        std::fs::write(path, self.to_png()?)?;
        Ok(())
    }

    /// PNG bytes as standard base64, for inline previews.
    pub fn to_base64(&self) -> Result<String, LabelError> {
        Ok(base64::engine::general_purpose::STANDARD.encode(self.to_png()?))
    }
}

// ============================================================================
// TESTS
// ============================================================================
