//! # Label Compositor
//!
//! Paints a label onto a white canvas of the resolved pixel size.
//!
//! Free text is fitted with [`fit`](super::fit::fit) and placed by
//! orientation:
//!
//! | Orientation | x | y |
//! |-------------|---|---|
//! | standard | centred in the remaining width (never negative) | top margin |
//! | rotated | left margin | centred in the remaining height, shifted by `(top - bottom) / 2` |
//!
//! Template labels hand the canvas to a list of [`ElementPainter`]s.
//!
//! For printers that print bitmaps 1:1, [`CompositeOptions`] grows the
//! canvas by a registration offset and tags the result with its DPI.

use image::{Rgb, RgbImage};

use super::bitmap::Bitmap;
use super::context::{Orientation, RenderContext};
use super::fit::{fit, normalize_lines};
use super::font::{LabelFont, TextMeasure};
use crate::error::LabelError;
use crate::media::PixelSize;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// One element of a declarative label template.
pub trait ElementPainter: Send + Sync {
    /// Paint onto `canvas`, which has the label's pixel size.
    fn paint(&self, canvas: &mut RgbImage, ctx: &RenderContext) -> Result<(), LabelError>;
}

/// What goes on the label.
pub enum LabelContent<'a> {
    Text { text: &'a str, font: &'a LabelFont },
    Elements(&'a [Box<dyn ElementPainter>]),
}

/// Device-level adjustments applied after painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositeOptions {
    /// Paste the painted label at `(x, y)` on a canvas grown by the same amount.
    pub offset: Option<(u32, u32)>,
    /// DPI written into the bitmap metadata.
    pub dpi: Option<u32>,
}

/// Top-left corner of a `text` block on a `canvas`-sized label.
pub fn text_origin(canvas: PixelSize, text: (u32, u32), ctx: &RenderContext) -> (i64, i64) {
    let (w, h) = (canvas.width as i64, canvas.height as i64);
    let (tw, th) = (text.0 as i64, text.1 as i64);
    let m = &ctx.margins;
    match ctx.orientation {
        Orientation::Standard => (((w - tw).div_euclid(2)).max(0), m.top as i64),
        Orientation::Rotated => {
            let y = (h - th).div_euclid(2) + (m.top as i64 - m.bottom as i64).div_euclid(2);
            (m.left as i64, y)
        }
    }
}

/// Compose a label of `size` pixels.
///
/// Returns the bitmap together with the font size actually used for text
/// content (`None` for templates).
pub fn compose(
    size: PixelSize,
    content: LabelContent<'_>,
    ctx: &RenderContext,
    options: &CompositeOptions,
) -> Result<(Bitmap, Option<u32>), LabelError> {
    if !size.is_positive() {
        return Err(LabelError::Composition(format!(
            "label size {}x{} is empty",
            size.width, size.height
        )));
    }

    let mut canvas = RgbImage::from_pixel(size.width, size.height, WHITE);
    let mut used_size = None;

    match content {
        LabelContent::Text { text, font } => {
            let text = normalize_lines(text);
            let font_size = fit(font, &text, ctx.font_size, ctx.min_font_size, size, &ctx.margins);
            if font_size != ctx.font_size {
                log::debug!("shrunk font from {} to {} to fit {}x{}", ctx.font_size, font_size, size.width, size.height);
            }
            let block = font.measure(&text, font_size);
            let origin = text_origin(size, (block.width, block.height), ctx);
            font.draw(&mut canvas, &text, font_size, origin, ctx.align, ctx.fill);
            used_size = Some(font_size);
        }
        LabelContent::Elements(elements) => {
            for element in elements {
                element.paint(&mut canvas, ctx)?;
            }
        }
    }

    if let Some((x, y)) = options.offset
        && (x > 0 || y > 0)
    {
        let (Some(width), Some(height)) = (size.width.checked_add(x), size.height.checked_add(y)) else {
            return Err(LabelError::Composition(format!(
                "label offset {}x{} is too large for {}x{}",
                x, y, size.width, size.height
            )));
        };
        let mut padded = RgbImage::from_pixel(width, height, WHITE);
        image::imageops::replace(&mut padded, &canvas, x as i64, y as i64);
        log::info!(
            "Applied label offset for '{}': x={}, y={}, new size: {}x{}",
            ctx.size_id,
            x,
            y,
            padded.width(),
            padded.height()
        );
        canvas = padded;
    }

    let mut bitmap = Bitmap::new(canvas);
    if let Some(dpi) = options.dpi {
        bitmap = bitmap.with_dpi(dpi);
    }
    Ok((bitmap, used_size))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontChoice;
    use crate::render::context::Margins;

    fn context(orientation: Orientation, margins: Margins) -> RenderContext {
        RenderContext::new("62", FontChoice::new("DejaVu Sans", "Book"), 40)
            .with_orientation(orientation)
            .with_margins(margins)
    }

    fn margins() -> Margins {
        Margins {
            top: 10,
            bottom: 30,
            left: 12,
            right: 12,
        }
    }

    struct FillRect {
        x: u32,
        y: u32,
    }

    impl ElementPainter for FillRect {
        fn paint(&self, canvas: &mut RgbImage, _ctx: &RenderContext) -> Result<(), LabelError> {
            canvas.put_pixel(self.x, self.y, Rgb([0, 0, 0]));
            Ok(())
        }
    }

    struct Broken;

    impl ElementPainter for Broken {
        fn paint(&self, _canvas: &mut RgbImage, _ctx: &RenderContext) -> Result<(), LabelError> {
            Err(LabelError::Composition("element failed".into()))
        }
    }

    #[test]
    fn test_origin_standard_centres_horizontally() {
        let ctx = context(Orientation::Standard, margins());
        assert_eq!(text_origin(PixelSize::new(200, 100), (100, 20), &ctx), (50, 10));
        // wider than the canvas clamps to 0
        assert_eq!(text_origin(PixelSize::new(200, 100), (260, 20), &ctx), (0, 10));
    }

    #[test]
    fn test_origin_rotated_centres_vertically() {
        let ctx = context(Orientation::Rotated, margins());
        // (100 - 20) / 2 + (10 - 30) / 2 = 40 - 10
        assert_eq!(text_origin(PixelSize::new(200, 100), (100, 20), &ctx), (12, 30));
    }

    #[test]
    fn test_origin_rotated_floors_odd_values() {
        let m = Margins {
            top: 9,
            bottom: 18,
            left: 14,
            right: 14,
        };
        let ctx = context(Orientation::Rotated, m);
        // (101 - 20).div_euclid(2) = 40, (9 - 18).div_euclid(2) = -5
        assert_eq!(text_origin(PixelSize::new(300, 101), (50, 20), &ctx), (14, 35));
    }

    #[test]
    fn test_compose_text_has_canvas_size() {
        let font = LabelFont::embedded();
        let ctx = context(Orientation::Standard, margins());
        let (bitmap, used) = compose(
            PixelSize::new(400, 120),
            LabelContent::Text { text: "Hello", font: &font },
            &ctx,
            &CompositeOptions::default(),
        )
        .unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (400, 120));
        assert!(bitmap.dpi.is_none());
        assert!(used.unwrap() <= 40);
        assert!(bitmap.image.pixels().any(|p| p[0] < 128));
    }

    #[test]
    fn test_compose_shrinks_long_text_to_floor() {
        let font = LabelFont::embedded();
        let ctx = context(Orientation::Standard, margins());
        let (_, used) = compose(
            PixelSize::new(40, 20),
            LabelContent::Text {
                text: "A very long line of text for a tiny label",
                font: &font,
            },
            &ctx,
            &CompositeOptions::default(),
        )
        .unwrap();
        assert_eq!(used, Some(ctx.min_font_size));
    }

    #[test]
    fn test_compose_red_fill() {
        let font = LabelFont::embedded();
        let ctx = RenderContext::new("62red", FontChoice::new("DejaVu Sans", "Book"), 40);
        let (bitmap, _) = compose(
            PixelSize::new(400, 120),
            LabelContent::Text { text: "Red", font: &font },
            &ctx,
            &CompositeOptions::default(),
        )
        .unwrap();
        assert!(bitmap.image.pixels().any(|p| p[0] == 255 && p[1] < 64 && p[2] < 64));
    }

    #[test]
    fn test_compose_offset_grows_canvas() {
        let ctx = context(Orientation::Standard, margins());
        let elements: Vec<Box<dyn ElementPainter>> = vec![Box::new(FillRect { x: 0, y: 0 })];
        let options = CompositeOptions {
            offset: Some((5, 7)),
            dpi: Some(203),
        };
        let (bitmap, used) = compose(
            PixelSize::new(50, 30),
            LabelContent::Elements(&elements),
            &ctx,
            &options,
        )
        .unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (55, 37));
        assert_eq!(bitmap.dpi, Some(203));
        assert_eq!(used, None);
        assert_eq!(bitmap.image.get_pixel(5, 7), &Rgb([0, 0, 0]));
        assert_eq!(bitmap.image.get_pixel(0, 0), &WHITE);
    }

    #[test]
    fn test_compose_offset_overflow_is_error() {
        let ctx = context(Orientation::Standard, margins());
        let elements: Vec<Box<dyn ElementPainter>> = vec![Box::new(FillRect { x: 0, y: 0 })];
        let options = CompositeOptions {
            offset: Some((u32::MAX, 0)),
            dpi: None,
        };
        let result = compose(
            PixelSize::new(50, 30),
            LabelContent::Elements(&elements),
            &ctx,
            &options,
        );
        assert!(matches!(result, Err(LabelError::Composition(_))));
    }

    #[test]
    fn test_compose_element_error_propagates() {
        let ctx = context(Orientation::Standard, margins());
        let elements: Vec<Box<dyn ElementPainter>> = vec![Box::new(Broken)];
        let result = compose(
            PixelSize::new(50, 30),
            LabelContent::Elements(&elements),
            &ctx,
            &CompositeOptions::default(),
        );
        assert!(matches!(result, Err(LabelError::Composition(_))));
    }

    #[test]
    fn test_compose_rejects_empty_size() {
        let font = LabelFont::embedded();
        let ctx = context(Orientation::Standard, margins());
        let result = compose(
            PixelSize::new(0, 30),
            LabelContent::Text { text: "x", font: &font },
            &ctx,
            &CompositeOptions::default(),
        );
        assert!(result.is_err());
    }
}
