//! TTF text measurement and drawing.
//!
//! Uses ab_glyph. Font sizes are em sizes in pixels (a 40px font has a
//! 40px em square), matching how label font sizes are entered in the UI.
//! Multi-line text is laid out line by line with a fixed gap between lines.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::context::Align;
use crate::config::FontChoice;
use crate::error::LabelError;

/// Pixels between consecutive lines.
pub const LINE_SPACING: f32 = 4.0;

/// Family/style of the built-in font.
pub const EMBEDDED_FAMILY: &str = "DejaVu Sans";
pub const EMBEDDED_STYLE: &str = "Book";

static DEJAVU_SANS: OnceLock<FontArc> = OnceLock::new();

fn dejavu_sans() -> &'static FontArc {
    DEJAVU_SANS.get_or_init(|| {
        FontArc::try_from_slice(include_bytes!("fonts/DejaVuSans.ttf"))
            .expect("Failed to load DejaVu Sans")
    })
}

/// Size of a laid-out text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBox {
    pub width: u32,
    pub height: u32,
}

/// Anything that can measure multi-line text at a font size.
///
/// Implementations must be monotonic: a smaller size never yields a
/// larger box.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: u32) -> TextBox;
}

/// A loaded TTF/OTF font.
#[derive(Clone)]
pub struct LabelFont {
    font: FontArc,
}

impl LabelFont {
    /// The font compiled into the binary.
    pub fn embedded() -> Self {
        Self {
            font: dejavu_sans().clone(),
        }
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, LabelError> {
        let font = FontArc::try_from_vec(data)
            .map_err(|e| LabelError::ConfigurationIncomplete(format!("invalid font: {}", e)))?;
        Ok(Self { font })
    }

    pub fn from_path(path: &Path) -> Result<Self, LabelError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    fn scale(&self, font_size: u32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(font_size as f32 * self.font.height_unscaled() / units_per_em)
    }

    fn line_width(&self, line: &str, scale: PxScale) -> f32 {
        let scaled = self.font.as_scaled(scale);
        let mut width = 0.0f32;
        let mut prev = None;
        for ch in line.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    fn line_height(&self, scale: PxScale) -> f32 {
        let scaled = self.font.as_scaled(scale);
        scaled.ascent() - scaled.descent()
    }

    /// Draw `text` with its block's top-left corner at `origin`.
    ///
    /// Lines are aligned inside the block width; pixels outside the canvas
    /// are clipped.
    pub fn draw(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        font_size: u32,
        origin: (i64, i64),
        align: Align,
        fill: Rgb<u8>,
    ) {
        let scale = self.scale(font_size);
        let scaled = self.font.as_scaled(scale);
        let block = self.measure(text, font_size);
        let line_advance = self.line_height(scale) + LINE_SPACING;
        let (canvas_w, canvas_h) = (canvas.width() as i64, canvas.height() as i64);

        for (row, line) in text.split('\n').enumerate() {
            let width = self.line_width(line, scale);
            let shift = match align {
                Align::Left => 0.0,
                Align::Center => (block.width as f32 - width) / 2.0,
                Align::Right => block.width as f32 - width,
            };
            let baseline = origin.1 as f32 + row as f32 * line_advance + scaled.ascent();
            let mut caret = origin.0 as f32 + shift;
            let mut prev = None;

            for ch in line.chars() {
                let id = self.font.glyph_id(ch);
                if let Some(prev) = prev {
                    caret += scaled.kern(prev, id);
                }
                let glyph = id.with_scale_and_position(scale, ab_glyph::point(caret, baseline));
                caret += scaled.h_advance(id);
                prev = Some(id);

                let Some(outlined) = self.font.outline_glyph(glyph) else {
                    continue;
                };
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    let x = px as i64 + bounds.min.x as i64;
                    let y = py as i64 + bounds.min.y as i64;
                    if x < 0 || y < 0 || x >= canvas_w || y >= canvas_h {
                        return;
                    }
                    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                    let c = coverage.clamp(0.0, 1.0);
                    for i in 0..3 {
                        let blended = pixel[i] as f32 * (1.0 - c) + fill[i] as f32 * c;
                        pixel[i] = blended.round() as u8;
                    }
                });
            }
        }
    }
}

impl TextMeasure for LabelFont {
    fn measure(&self, text: &str, font_size: u32) -> TextBox {
        let scale = self.scale(font_size);
        let lines: Vec<&str> = text.split('\n').collect();
        let width = lines
            .iter()
            .map(|line| self.line_width(line, scale))
            .fold(0.0f32, f32::max);
        let rows = lines.len() as f32;
        let height = rows * self.line_height(scale) + (rows - 1.0) * LINE_SPACING;
        TextBox {
            width: width.ceil() as u32,
            height: height.ceil() as u32,
        }
    }
}

// ============================================================================
// FONT BOOK
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum FontSource {
    Embedded,
    File(PathBuf),
}

/// Available fonts by family and style.
#[derive(Debug, Clone)]
pub struct FontBook {
    fonts: BTreeMap<String, BTreeMap<String, FontSource>>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::with_embedded()
    }
}

impl FontBook {
    /// A book holding only the built-in font.
    pub fn with_embedded() -> Self {
        let mut book = Self::empty();
        book.insert(EMBEDDED_FAMILY, EMBEDDED_STYLE, FontSource::Embedded);
        book
    }

    pub fn empty() -> Self {
        Self {
            fonts: BTreeMap::new(),
        }
    }

    fn insert(&mut self, family: &str, style: &str, source: FontSource) {
        self.fonts
            .entry(family.to_string())
            .or_default()
            .insert(style.to_string(), source);
    }

    /// Register a font file under an explicit family and style.
    pub fn add_file(&mut self, family: &str, style: &str, path: impl Into<PathBuf>) {
        self.insert(family, style, FontSource::File(path.into()));
    }

    /// Register every `.ttf`/`.otf` directly inside `dir`.
    ///
    /// Family and style come from the file stem: `Roboto-Bold.ttf` is
    /// family `Roboto`, style `Bold`; a stem without `-` gets style
    /// `Regular`. Returns how many files were added; a missing folder adds
    /// none.
    pub fn add_folder(&mut self, dir: &Path) -> usize {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Could not read font folder {}: {}", dir.display(), e);
                return 0;
            }
        };

        let mut added = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
            if !is_font {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let (family, style) = match stem.rsplit_once('-') {
                Some((family, style)) if !family.is_empty() && !style.is_empty() => {
                    (family.to_string(), style.to_string())
                }
                _ => (stem.to_string(), "Regular".to_string()),
            };
            log::debug!("registered font {} ({}) from {}", family, style, path.display());
            self.insert(&family, &style, FontSource::File(path));
            added += 1;
        }
        added
    }

    /// Family → styles, for the UI and validation.
    pub fn families(&self) -> BTreeMap<String, Vec<String>> {
        self.fonts
            .iter()
            .map(|(family, styles)| (family.clone(), styles.keys().cloned().collect()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn contains(&self, choice: &FontChoice) -> bool {
        self.fonts
            .get(&choice.family)
            .is_some_and(|styles| styles.contains_key(&choice.style))
    }

    /// `requested` if available, else the first available default, else
    /// any registered font. `None` only for an empty book.
    pub fn choose(&self, requested: Option<&FontChoice>, defaults: &[FontChoice]) -> Option<FontChoice> {
        if let Some(choice) = requested
            .into_iter()
            .chain(defaults.iter())
            .find(|choice| self.contains(choice))
        {
            return Some(choice.clone());
        }
        let fallback = self.any()?;
        log::warn!(
            "None of the default fonts are available, using {} ({})",
            fallback.family,
            fallback.style
        );
        Some(fallback)
    }

    /// The built-in font if registered, else the first family's first style.
    fn any(&self) -> Option<FontChoice> {
        let embedded = FontChoice::new(EMBEDDED_FAMILY, EMBEDDED_STYLE);
        if self.contains(&embedded) {
            return Some(embedded);
        }
        let (family, styles) = self.fonts.iter().next()?;
        let style = styles.keys().next()?;
        Some(FontChoice::new(family, style))
    }

    /// Load the font for `choice`.
    pub fn load(&self, choice: &FontChoice) -> Result<LabelFont, LabelError> {
        let source = self
            .fonts
            .get(&choice.family)
            .and_then(|styles| styles.get(&choice.style))
            .ok_or_else(|| {
                LabelError::ConfigurationIncomplete(format!(
                    "Couldn't find the font & style {} ({})",
                    choice.family, choice.style
                ))
            })?;
        match source {
            FontSource::Embedded => Ok(LabelFont::embedded()),
            FontSource::File(path) => LabelFont::from_path(path),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
