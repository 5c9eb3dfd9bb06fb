//! Per-request parameters of one label.
//!
//! Built once from the request and the configuration snapshot, then passed
//! read-only through fitting and compositing.

use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::FontChoice;
use crate::error::LabelError;

/// Text layout direction on the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Feed direction is the declared width.
    #[default]
    Standard,
    /// Width and height swapped before laying out text.
    Rotated,
}

impl FromStr for Orientation {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "rotated" => Ok(Self::Rotated),
            other => Err(LabelError::Parse(format!(
                "Unknown orientation '{}'. Use 'standard' or 'rotated'",
                other
            ))),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standard => "standard",
            Self::Rotated => "rotated",
        })
    }
}

/// Horizontal alignment of lines within a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for Align {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(LabelError::Parse(format!("Unknown alignment '{}'", other))),
        }
    }
}

/// Margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Margins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Margins {
    /// Derive pixel margins from percentages of the font size.
    ///
    /// A 40px font with the default percentages gives
    /// top 9, bottom 18, left 14, right 14 (truncated). Negative or NaN
    /// percentages give 0; values past `u32::MAX` saturate.
    pub fn from_percent(font_size: u32, percent: &MarginPercent) -> Self {
        let px = |pct: f64| (font_size as f64 * pct / 100.0).max(0.0) as u32;
        Self {
            top: px(percent.top),
            bottom: px(percent.bottom),
            left: px(percent.left),
            right: px(percent.right),
        }
    }

    #[inline]
    pub fn horizontal(&self) -> u32 {
        self.left.saturating_add(self.right)
    }

    #[inline]
    pub fn vertical(&self) -> u32 {
        self.top.saturating_add(self.bottom)
    }
}

/// Margins expressed as percentages of the font size (UI units).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginPercent {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for MarginPercent {
    fn default() -> Self {
        Self {
            top: 24.0,
            bottom: 45.0,
            left: 35.0,
            right: 35.0,
        }
    }
}

/// Ink colour for a size identifier: red for two-colour media, else black.
pub fn fill_for(size_id: &str) -> Rgb<u8> {
    if size_id.contains("red") {
        Rgb([255, 0, 0])
    } else {
        Rgb([0, 0, 0])
    }
}

/// Smallest font size the fitter will shrink to.
pub const MIN_FONT_SIZE: u32 = 8;

/// Everything needed to lay out one label.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub text: Option<String>,
    pub font: FontChoice,
    pub font_size: u32,
    pub min_font_size: u32,
    pub size_id: String,
    pub margins: Margins,
    pub align: Align,
    pub orientation: Orientation,
    pub fill: Rgb<u8>,
    pub printer: Option<String>,
    pub quantity: u32,
}

impl RenderContext {
    /// A context with default margins, alignment and colour for `size_id`.
    pub fn new(size_id: &str, font: FontChoice, font_size: u32) -> Self {
        Self {
            text: None,
            font,
            font_size,
            min_font_size: MIN_FONT_SIZE,
            size_id: size_id.to_string(),
            margins: Margins::from_percent(font_size, &MarginPercent::default()),
            align: Align::default(),
            orientation: Orientation::default(),
            fill: fill_for(size_id),
            printer: None,
            quantity: 1,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_printer(mut self, printer: &str) -> Self {
        self.printer = Some(printer.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margins_from_default_percent() {
        let m = Margins::from_percent(40, &MarginPercent::default());
        assert_eq!(m, Margins { top: 9, bottom: 18, left: 14, right: 14 });
        assert_eq!(m.horizontal(), 28);
        assert_eq!(m.vertical(), 27);
    }

    #[test]
    fn test_margins_saturate() {
        let percent = MarginPercent {
            top: f64::NAN,
            bottom: -10.0,
            left: 1e12,
            right: 1e12,
        };
        let m = Margins::from_percent(40, &percent);
        assert_eq!((m.top, m.bottom), (0, 0));
        assert_eq!(m.left, u32::MAX);
        assert_eq!(m.horizontal(), u32::MAX);
        assert_eq!(m.vertical(), 0);
    }

    #[test]
    fn test_orientation_parse() {
        assert_eq!("Rotated".parse::<Orientation>().unwrap(), Orientation::Rotated);
        assert_eq!(" standard ".parse::<Orientation>().unwrap(), Orientation::Standard);
        assert!("sideways".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_align_parse() {
        assert_eq!("center".parse::<Align>().unwrap(), Align::Center);
        assert_eq!("RIGHT".parse::<Align>().unwrap(), Align::Right);
        assert!("justify".parse::<Align>().is_err());
    }

    #[test]
    fn test_fill_for_red_media() {
        assert_eq!(fill_for("62red"), Rgb([255, 0, 0]));
        assert_eq!(fill_for("62"), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_context_defaults() {
        let ctx = RenderContext::new("62", FontChoice::new("DejaVu Sans", "Book"), 40)
            .with_text("hi");
        assert_eq!(ctx.quantity, 1);
        assert_eq!(ctx.orientation, Orientation::Standard);
        assert_eq!(ctx.margins.top, 9);
        assert_eq!(ctx.text.as_deref(), Some("hi"));
    }
}
