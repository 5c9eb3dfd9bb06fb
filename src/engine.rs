//! # Label Engine
//!
//! Glue between the configuration snapshot, the print sink, the size
//! resolver and the compositor. One engine serves all requests; every call
//! takes a fresh [`Config`] snapshot and keeps it for its whole duration.
//!
//! ## Print server use
//!
//! With `USE_CUPS` enabled, printer lists, media catalogs, default media and
//! resolution come from the sink. With it disabled, those answers come from
//! configuration alone. Jobs always go to the sink.

use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Config, ConfigHandle, FontChoice, filter_printers, validate_configuration};
use crate::error::LabelError;
use crate::media::{
    self, Catalog, PixelSize, ResolveInput, build_catalog, configured_catalog, orient, resolve,
};
use crate::render::{
    Align, Bitmap, CompositeOptions, ElementPainter, FontBook, LabelContent, MarginPercent,
    Margins, Orientation, RenderContext, compose,
};
use crate::sink::{PrintOptions, PrintOutcome, PrintSink};

/// Font size when the request does not name one.
pub const DEFAULT_REQUEST_FONT_SIZE: u32 = 40;

/// Label parameters as submitted by the UI (query string or form).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabelRequest {
    pub text: Option<String>,
    /// `"Family (Style)"`.
    pub font_family: Option<String>,
    pub font_size: Option<u32>,
    pub label_size: Option<String>,
    pub align: Option<String>,
    pub orientation: Option<String>,
    pub margin_top: Option<f64>,
    pub margin_bottom: Option<f64>,
    pub margin_left: Option<f64>,
    pub margin_right: Option<f64>,
    pub printer: Option<String>,
    pub quantity: Option<u32>,
}

/// Split `"DejaVu Sans (Book)"` into family and style.
pub fn parse_font_family(value: &str) -> Option<FontChoice> {
    let (family, style) = value.rsplit_once('(')?;
    let family = family.trim();
    let style = style.trim_end_matches(')').trim();
    if family.is_empty() || style.is_empty() {
        return None;
    }
    Some(FontChoice::new(family, style))
}

/// Label engine shared by the HTTP handlers and the CLI.
pub struct LabelEngine {
    config: ConfigHandle,
    sink: Arc<dyn PrintSink>,
    fonts: FontBook,
}

impl LabelEngine {
    pub fn new(config: ConfigHandle, sink: Arc<dyn PrintSink>, fonts: FontBook) -> Self {
        Self { config, sink, fonts }
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// The sink for queries, when the print server is enabled.
    fn query_sink<'a>(&'a self, config: &Config) -> Option<&'a dyn PrintSink> {
        config.printer.use_cups.then_some(self.sink.as_ref())
    }

    // ========================================================================
    // PRINTERS
    // ========================================================================

    /// All printers, before include/exclude filtering.
    pub fn printers(&self) -> Vec<String> {
        let config = self.config.snapshot();
        match self.query_sink(&config) {
            Some(sink) => sink.list_printers().unwrap_or_else(|e| {
                log::warn!(
                    "Error getting list of printers. Verify that CUPS server is running and accessible: {}",
                    e
                );
                Vec::new()
            }),
            None => config.configured_printer().map(str::to_string).into_iter().collect(),
        }
    }

    /// Printers offered to the UI.
    pub fn available_printers(&self) -> Vec<String> {
        let config = self.config.snapshot();
        filter_printers(&self.printers(), &config)
    }

    /// Printer preselected in the UI: the configured one if offered, else
    /// the first offered printer.
    pub fn ui_default_printer(&self) -> Option<String> {
        let config = self.config.snapshot();
        let available = self.available_printers();
        match config.configured_printer() {
            Some(p) if available.iter().any(|a| a == p) => Some(p.to_string()),
            _ => available.into_iter().next(),
        }
    }

    /// Printer a request talks to: requested, configured, or the server default.
    fn target_printer(&self, config: &Config, requested: Option<&str>) -> Option<String> {
        if let Some(p) = requested.filter(|p| !p.is_empty()) {
            return Some(p.to_string());
        }
        if let Some(p) = config.configured_printer() {
            return Some(p.to_string());
        }
        match self.query_sink(config)?.default_printer() {
            Ok(printer) => printer,
            Err(e) => {
                log::warn!("Could not get default printer: {}", e);
                None
            }
        }
    }

    /// DPI used to convert physical sizes for `printer`.
    pub fn printer_dpi(&self, printer: Option<&str>) -> u32 {
        let config = self.config.snapshot();
        self.dpi_for(&config, printer)
    }

    fn dpi_for(&self, config: &Config, printer: Option<&str>) -> u32 {
        let reported = self.query_sink(config).zip(printer).and_then(|(sink, p)| {
            sink.resolution(p)
                .inspect_err(|e| log::debug!("No resolution for '{}': {}", p, e))
                .ok()
                .flatten()
        });
        match reported {
            Some(dpi) if dpi > 0 => dpi,
            _ => config.printer_dpi(),
        }
    }

    // ========================================================================
    // SIZES
    // ========================================================================

    /// Merged size catalog for `printer`.
    pub fn label_sizes(&self, printer: Option<&str>) -> Catalog {
        let config = self.config.snapshot();
        self.catalog_for(&config, printer)
    }

    fn catalog_for(&self, config: &Config, printer: Option<&str>) -> Catalog {
        let section = &config.printer;
        let Some(sink) = self.query_sink(config) else {
            return configured_catalog(printer, &section.label_sizes, &section.enabled_sizes);
        };
        let Some(printer) = self.target_printer(config, printer) else {
            log::warn!("No printer available, offering configured sizes only");
            return configured_catalog(None, &section.label_sizes, &section.enabled_sizes);
        };
        let media = sink.media_catalog(&printer).unwrap_or_else(|e| {
            log::warn!("Could not get media for printer '{}': {}", printer, e);
            Vec::new()
        });
        let dpi = self.dpi_for(config, Some(&printer));
        build_catalog(
            &printer,
            &media,
            &section.label_sizes,
            &section.label_printable_area,
            &section.enabled_sizes,
            dpi,
        )
    }

    /// Size preselected for `printer`.
    pub fn default_label_size(&self, printer: Option<&str>) -> Option<String> {
        let config = self.config.snapshot();
        self.default_size_for(&config, printer)
    }

    fn default_size_for(&self, config: &Config, printer: Option<&str>) -> Option<String> {
        let configured = config.label.default_size.clone();
        let Some(sink) = self.query_sink(config) else {
            return configured;
        };
        let from_sink = self
            .target_printer(config, printer)
            .and_then(|p| match sink.default_media(&p) {
                Ok(media) => media,
                Err(e) => {
                    log::warn!("Could not get default media for '{}': {}", p, e);
                    None
                }
            });
        from_sink.or(configured)
    }

    /// Pixel size of `size_id` on `printer`, in layout orientation.
    pub fn dimensions(&self, size_id: &str, printer: Option<&str>, orientation: Orientation) -> PixelSize {
        let config = self.config.snapshot();
        self.dimensions_for(&config, size_id, printer, orientation)
    }

    fn dimensions_for(
        &self,
        config: &Config,
        size_id: &str,
        printer: Option<&str>,
        orientation: Orientation,
    ) -> PixelSize {
        let printer = self.target_printer(config, printer);
        let input = ResolveInput {
            size_id,
            printer: printer.as_deref(),
            config,
            sink: self.query_sink(config),
            dpi: self.dpi_for(config, printer.as_deref()),
        };
        orient(resolve(&input), orientation)
    }

    // ========================================================================
    // RENDERING
    // ========================================================================

    /// Build a render context from a request, filling in defaults.
    pub fn context(&self, request: &LabelRequest) -> Result<RenderContext, LabelError> {
        let config = self.config.snapshot();
        let printer = request.printer.as_deref().filter(|p| !p.is_empty());

        let size_id = match request.label_size.as_deref().filter(|s| !s.is_empty()) {
            Some(size) => size.to_string(),
            None => self.default_size_for(&config, printer).ok_or_else(|| {
                LabelError::ConfigurationIncomplete("No label size selected".into())
            })?,
        };

        let requested_font = request.font_family.as_deref().and_then(parse_font_family);
        let font = self
            .fonts
            .choose(requested_font.as_ref(), &config.label.default_fonts)
            .ok_or_else(|| {
                LabelError::ConfigurationIncomplete("Couldn't find the font & style".into())
            })?;

        let font_size = request.font_size.unwrap_or(DEFAULT_REQUEST_FONT_SIZE).max(1);
        let defaults = MarginPercent::default();
        let percent = MarginPercent {
            top: request.margin_top.unwrap_or(defaults.top),
            bottom: request.margin_bottom.unwrap_or(defaults.bottom),
            left: request.margin_left.unwrap_or(defaults.left),
            right: request.margin_right.unwrap_or(defaults.right),
        };

        let mut ctx = RenderContext::new(&size_id, font, font_size)
            .with_margins(Margins::from_percent(font_size, &percent))
            .with_orientation(match request.orientation.as_deref() {
                Some(o) => o.parse()?,
                None => config.label.default_orientation,
            });
        ctx.align = match request.align.as_deref() {
            Some(a) => a.parse()?,
            None => Align::default(),
        };
        ctx.quantity = request.quantity.unwrap_or(1).max(1);
        ctx.text = request.text.clone();
        if let Some(p) = printer {
            ctx = ctx.with_printer(p);
        }
        Ok(ctx)
    }

    fn composite_options(&self, config: &Config, size_id: &str) -> CompositeOptions {
        if !config.printer.use_new_print_workflow {
            return CompositeOptions::default();
        }
        let offset = config.label_offset(Some(size_id));
        CompositeOptions {
            offset: offset.enabled.then_some((offset.offset_x, offset.offset_y)),
            dpi: Some(config.printer_dpi()),
        }
    }

    /// Render the context's text.
    pub fn render_text(&self, ctx: &RenderContext) -> Result<Bitmap, LabelError> {
        let text = ctx
            .text
            .as_deref()
            .ok_or_else(|| LabelError::Composition("Please provide the text for the label".into()))?;
        let config = self.config.snapshot();
        let size = self.dimensions_for(&config, &ctx.size_id, ctx.printer.as_deref(), ctx.orientation);
        let font = self.fonts.load(&ctx.font)?;
        let options = self.composite_options(&config, &ctx.size_id);
        let (bitmap, used) = compose(size, LabelContent::Text { text, font: &font }, ctx, &options)?;
        log::debug!(
            "rendered '{}' at {}x{} (font {:?})",
            ctx.size_id,
            bitmap.width(),
            bitmap.height(),
            used
        );
        Ok(bitmap)
    }

    /// Render a template label from its elements.
    pub fn render_elements(
        &self,
        ctx: &RenderContext,
        elements: &[Box<dyn ElementPainter>],
    ) -> Result<Bitmap, LabelError> {
        let config = self.config.snapshot();
        let size = self.dimensions_for(&config, &ctx.size_id, ctx.printer.as_deref(), ctx.orientation);
        let options = self.composite_options(&config, &ctx.size_id);
        let (bitmap, _) = compose(size, LabelContent::Elements(elements), ctx, &options)?;
        Ok(bitmap)
    }

    // ========================================================================
    // PRINTING
    // ========================================================================

    /// Media option for a standard-workflow job.
    fn media_option(&self, config: &Config, size_id: &str, printer: &str) -> String {
        let Some(sink) = self.query_sink(config) else {
            return size_id.to_string();
        };
        let media = match sink.media_catalog(printer) {
            Ok(media) => media,
            Err(e) => {
                log::warn!(
                    "Could not verify media availability: {}. Attempting to use selected size anyway.",
                    e
                );
                return size_id.to_string();
            }
        };
        if media.iter().any(|m| m.name == size_id) {
            return size_id.to_string();
        }
        if config.printer.label_sizes.contains_key(size_id) {
            let dpi = self.dpi_for(config, Some(printer));
            let canonical = media::to_canonical(size_id, &config.printer.label_printable_area, dpi);
            log::info!(
                "Using custom config size '{}' (converted to '{}') for printer '{}'.",
                size_id,
                canonical,
                printer
            );
            return canonical;
        }
        log::warn!(
            "Selected media '{}' not available on printer '{}'. Attempting to use selected size anyway.",
            size_id,
            printer
        );
        size_id.to_string()
    }

    /// Send a rendered label to the context's printer.
    pub fn print(&self, bitmap: &Bitmap, ctx: &RenderContext) -> PrintOutcome {
        let config = self.config.snapshot();
        let Some(printer) = self.target_printer(&config, ctx.printer.as_deref()) else {
            return PrintOutcome::failed("No printer specified and no default printer available");
        };

        let direct = config.printer.use_new_print_workflow;
        let mut options = PrintOptions::copies(ctx.quantity);
        let mut bitmap = bitmap.clone();
        if direct {
            let dpi = config.printer_dpi();
            bitmap.dpi = Some(dpi);
            options.ppi = Some(dpi);
            log::info!("Using direct print workflow, printing 1:1 at {} DPI", dpi);
        } else {
            options.media = Some(self.media_option(&config, &ctx.size_id, &printer));
        }

        let path = spool_path();
        let result = bitmap
            .save_png(&path)
            .and_then(|_| self.sink.submit(&path, &printer, &options));
        if let Err(e) = std::fs::remove_file(&path) {
            log::debug!("could not remove {}: {}", path.display(), e);
        }

        match result {
            Ok(()) if direct => PrintOutcome::ok(format!(
                "Successfully printed {} label(s) using 1:1 workflow at {} DPI",
                options.copies,
                options.ppi.unwrap_or_else(|| config.printer_dpi())
            )),
            Ok(()) => PrintOutcome::ok(format!("Printed {} label(s) on {}", options.copies, printer)),
            Err(e) => {
                log::warn!("Printing on '{}' failed: {}", printer, e);
                PrintOutcome::failed(e.to_string())
            }
        }
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Configuration warnings for the UI.
    pub fn validate(&self) -> Vec<String> {
        let config = self.config.snapshot();
        let printers = self.available_printers();
        let printer = self.target_printer(&config, None);
        let catalog = self.catalog_for(&config, printer.as_deref());
        validate_configuration(&self.fonts.families(), &catalog, &printers, &config)
    }
}

fn spool_path() -> PathBuf {
    std::env::temp_dir().join(format!("labelweb-{}.png", uuid::Uuid::new_v4()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrintableArea;
    use crate::media::{PhysicalSize, Unit};
    use crate::sink::{MediaRecord, MemorySink};
    use pretty_assertions::assert_eq;

    fn config(use_cups: bool) -> Config {
        let mut config = Config::default();
        config.printer.use_cups = use_cups;
        config.printer.printer = Some("zebra".into());
        config.printer.label_sizes = [("62", "62mm endless"), ("4x6in", "4 x 6 inch")]
            .into_iter()
            .collect();
        config
            .printer
            .label_printable_area
            .insert("62".into(), PrintableArea::new(696, 271));
        config.label.default_size = Some("62".into());
        config
    }

    fn sink() -> MemorySink {
        MemorySink::new()
            .with_printer(
                "zebra",
                vec![
                    MediaRecord::sized("w288h432", PhysicalSize::new(288.0, 432.0, Unit::Point)),
                    MediaRecord::sized("na_index-4x6_4x6in", PhysicalSize::new(4.0, 6.0, Unit::Inch)),
                ],
            )
            .with_printer("laser", vec![])
            .with_default_media("zebra", "w288h432")
            .with_resolution("zebra", 300)
    }

    fn setup(config: Config, sink: MemorySink) -> (LabelEngine, Arc<MemorySink>) {
        let sink = Arc::new(sink);
        let engine = LabelEngine::new(ConfigHandle::new(config), sink.clone(), FontBook::with_embedded());
        (engine, sink)
    }

    #[test]
    fn test_parse_font_family() {
        assert_eq!(
            parse_font_family("DejaVu Sans (Book)"),
            Some(FontChoice::new("DejaVu Sans", "Book"))
        );
        assert_eq!(
            parse_font_family("Noto (Sans) (Bold)"),
            Some(FontChoice::new("Noto (Sans)", "Bold"))
        );
        assert_eq!(parse_font_family("DejaVu Sans"), None);
    }

    #[test]
    fn test_printers_without_cups() {
        let (engine, _) = setup(config(false), sink());
        assert_eq!(engine.printers(), vec!["zebra".to_string()]);
        assert_eq!(engine.ui_default_printer().as_deref(), Some("zebra"));
    }

    #[test]
    fn test_printers_filtered() {
        let mut cfg = config(true);
        cfg.printer.printers_exclude = vec!["zebra".into()];
        let (engine, _) = setup(cfg, sink());
        assert_eq!(engine.available_printers(), vec!["laser".to_string()]);
        assert_eq!(engine.ui_default_printer().as_deref(), Some("laser"));
    }

    #[test]
    fn test_printers_sink_failure_is_empty() {
        let (engine, _) = setup(config(true), sink().failing());
        assert!(engine.printers().is_empty());
    }

    #[test]
    fn test_catalog_without_cups_uses_raw_keys() {
        let (engine, _) = setup(config(false), sink());
        let keys: Vec<String> = engine.label_sizes(None).keys().map(str::to_string).collect();
        assert_eq!(keys, vec!["62", "4x6in"]);
    }

    #[test]
    fn test_catalog_with_cups_merges() {
        let (engine, _) = setup(config(true), sink());
        let catalog = engine.label_sizes(Some("zebra"));
        assert!(catalog.contains("w288h432"));
        assert!(catalog.contains("na_index-4x6_4x6in"));
        assert!(catalog.contains("Custom.4x6in"));
        // 696x271 px at 300 dpi
        assert!(catalog.contains("Custom.59x23mm"));
    }

    #[test]
    fn test_default_label_size() {
        let (engine, _) = setup(config(true), sink());
        assert_eq!(engine.default_label_size(None).as_deref(), Some("w288h432"));

        let (engine, _) = setup(config(true), sink().failing());
        assert_eq!(engine.default_label_size(None).as_deref(), Some("62"));

        let (engine, _) = setup(config(false), sink());
        assert_eq!(engine.default_label_size(None).as_deref(), Some("62"));
    }

    #[test]
    fn test_dpi_sources() {
        let (engine, _) = setup(config(true), sink());
        assert_eq!(engine.printer_dpi(Some("zebra")), 300);
        assert_eq!(engine.printer_dpi(Some("laser")), 203);

        let mut cfg = config(false);
        cfg.printer.printer_dpi = Some(600);
        let (engine, _) = setup(cfg, sink());
        assert_eq!(engine.printer_dpi(Some("zebra")), 600);
    }

    #[test]
    fn test_dimensions_from_sink() {
        let (engine, _) = setup(config(true), sink());
        // 288x432 pt at 300 dpi = 1200x1800 px, wide first
        assert_eq!(
            engine.dimensions("w288h432", None, Orientation::Standard),
            PixelSize::new(1800, 1200)
        );
        assert_eq!(
            engine.dimensions("w288h432", None, Orientation::Rotated),
            PixelSize::new(1200, 1800)
        );
    }

    #[test]
    fn test_dimensions_from_config() {
        let (engine, _) = setup(config(false), sink());
        assert_eq!(
            engine.dimensions("62", None, Orientation::Standard),
            PixelSize::new(696, 271)
        );
    }

    #[test]
    fn test_context_defaults() {
        let (engine, _) = setup(config(false), sink());
        let ctx = engine
            .context(&LabelRequest {
                text: Some("Hi".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(ctx.size_id, "62");
        assert_eq!(ctx.font_size, 40);
        assert_eq!(ctx.font, FontChoice::new("DejaVu Sans", "Book"));
        assert_eq!(ctx.margins, Margins { top: 9, bottom: 18, left: 14, right: 14 });
        assert_eq!(ctx.align, Align::Left);
        assert_eq!(ctx.quantity, 1);
    }

    #[test]
    fn test_context_unknown_font_falls_back() {
        let (engine, _) = setup(config(false), sink());
        let ctx = engine
            .context(&LabelRequest {
                font_family: Some("Comic Sans (Bold)".into()),
                label_size: Some("62red".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(ctx.font, FontChoice::new("DejaVu Sans", "Book"));
        assert_eq!(ctx.fill, image::Rgb([255, 0, 0]));
    }

    #[test]
    fn test_context_missing_default_font_uses_embedded() {
        let mut cfg = config(false);
        cfg.label.default_fonts = vec![FontChoice::new("Missing", "Regular")];
        let (engine, _) = setup(cfg, sink());
        let ctx = engine
            .context(&LabelRequest {
                font_family: Some("Comic Sans (Bold)".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(ctx.font, FontChoice::new("DejaVu Sans", "Book"));
    }

    #[test]
    fn test_context_without_fonts_is_incomplete() {
        let mut cfg = config(false);
        cfg.label.default_fonts = vec![FontChoice::new("Missing", "Regular")];
        let engine = LabelEngine::new(
            ConfigHandle::new(cfg),
            Arc::new(sink()),
            FontBook::empty(),
        );
        let result = engine.context(&LabelRequest::default());
        assert!(matches!(result, Err(LabelError::ConfigurationIncomplete(_))));
    }

    #[test]
    fn test_context_rejects_bad_orientation() {
        let (engine, _) = setup(config(false), sink());
        let result = engine.context(&LabelRequest {
            orientation: Some("diagonal".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(LabelError::Parse(_))));
    }

    #[test]
    fn test_render_text_requires_text() {
        let (engine, _) = setup(config(false), sink());
        let ctx = engine.context(&LabelRequest::default()).unwrap();
        assert!(matches!(engine.render_text(&ctx), Err(LabelError::Composition(_))));
    }

    #[test]
    fn test_render_huge_font_size_fits_label() {
        let (engine, _) = setup(config(false), sink());
        let ctx = engine
            .context(&LabelRequest {
                text: Some("Hi".into()),
                font_size: Some(u32::MAX),
                ..Default::default()
            })
            .unwrap();
        let bitmap = engine.render_text(&ctx).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (696, 271));
    }

    #[test]
    fn test_render_huge_margins_floor_font() {
        let (engine, _) = setup(config(false), sink());
        let ctx = engine
            .context(&LabelRequest {
                text: Some("Hi".into()),
                margin_left: Some(1e12),
                margin_right: Some(1e12),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(ctx.margins.left, u32::MAX);
        let bitmap = engine.render_text(&ctx).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (696, 271));
    }

    #[test]
    fn test_render_direct_workflow_offset() {
        let mut cfg = config(false);
        cfg.printer.use_new_print_workflow = true;
        cfg.printer
            .label_printable_area
            .insert("62".into(), PrintableArea::new(696, 271).with_offset(8, 4));
        let (engine, _) = setup(cfg, sink());
        let ctx = engine
            .context(&LabelRequest {
                text: Some("Offset".into()),
                ..Default::default()
            })
            .unwrap();
        let bitmap = engine.render_text(&ctx).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (704, 275));
        assert_eq!(bitmap.dpi, Some(203));
    }

    #[test]
    fn test_print_standard_converts_configured_size() {
        let (engine, sink) = setup(config(true), sink());
        let ctx = engine
            .context(&LabelRequest {
                text: Some("Box 1".into()),
                label_size: Some("62".into()),
                quantity: Some(2),
                ..Default::default()
            })
            .unwrap();
        let bitmap = engine.render_text(&ctx).unwrap();
        let outcome = engine.print(&bitmap, &ctx);
        assert!(outcome.success, "{}", outcome.message);

        let jobs = sink.jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].printer, "zebra");
        assert_eq!(jobs[0].options.copies, 2);
        assert_eq!(jobs[0].options.media.as_deref(), Some("Custom.59x23mm"));
        assert!(!jobs[0].bitmap.exists());
    }

    #[test]
    fn test_print_standard_passes_listed_media() {
        let (engine, sink) = setup(config(true), sink());
        let ctx = engine
            .context(&LabelRequest {
                text: Some("x".into()),
                label_size: Some("w288h432".into()),
                ..Default::default()
            })
            .unwrap();
        let bitmap = engine.render_text(&ctx).unwrap();
        assert!(engine.print(&bitmap, &ctx).success);
        assert_eq!(sink.jobs()[0].options.media.as_deref(), Some("w288h432"));
    }

    #[test]
    fn test_print_direct_workflow() {
        let mut cfg = config(false);
        cfg.printer.use_new_print_workflow = true;
        let (engine, sink) = setup(cfg, sink());
        let ctx = engine
            .context(&LabelRequest {
                text: Some("x".into()),
                ..Default::default()
            })
            .unwrap();
        let bitmap = engine.render_text(&ctx).unwrap();
        let outcome = engine.print(&bitmap, &ctx);
        assert!(outcome.success);
        assert!(outcome.message.contains("1:1 workflow at 203 DPI"));
        let job = &sink.jobs()[0];
        assert_eq!(job.options.media, None);
        assert_eq!(job.options.ppi, Some(203));
    }

    #[test]
    fn test_print_failure_is_reported() {
        let (engine, _) = setup(config(false), sink().failing());
        let ctx = engine
            .context(&LabelRequest {
                text: Some("x".into()),
                ..Default::default()
            })
            .unwrap();
        let bitmap = engine.render_text(&ctx).unwrap();
        let outcome = engine.print(&bitmap, &ctx);
        assert!(!outcome.success);
        assert!(outcome.message.contains("unreachable"));
    }

    #[test]
    fn test_validate_reports_missing_printer() {
        let mut cfg = config(true);
        cfg.printer.printer = Some("ghost".into());
        let (engine, _) = setup(cfg, sink());
        let errors = engine.validate();
        assert!(
            errors.iter().any(|e| e.contains("'ghost' not found")),
            "{:?}",
            errors
        );
    }

    #[test]
    fn test_validate_clean_config() {
        let (engine, _) = setup(config(false), sink());
        assert_eq!(engine.validate(), Vec::<String>::new());
    }
}
