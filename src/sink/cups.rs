//! # CUPS Sink
//!
//! Talks to a CUPS server through its command-line clients:
//!
//! | Operation | Command |
//! |-----------|---------|
//! | list printers | `lpstat -e` |
//! | default printer | `lpstat -d` |
//! | media, default media, resolution | `lpoptions -p NAME -l` |
//! | submit | `lp -d NAME -n COPIES [-o media=..] [-o ppi=..] FILE` |
//!
//! A remote server is addressed with `-h HOST` on every call. Parsing is
//! kept in free functions so it can be tested against captured output.

use regex::Regex;
use std::path::Path;
use std::process::{Command, Output};
use std::sync::OnceLock;

use super::{MediaRecord, PrintOptions, PrintSink};
use crate::error::LabelError;
use crate::media::{PhysicalSize, Unit, key};

/// PPD names of the form `w162h90` (points).
fn ppd_size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^w(\d+(?:\.\d+)?)h(\d+(?:\.\d+)?)$").expect("valid PPD size pattern")
    })
}

/// Sink backed by the CUPS client tools.
#[derive(Debug, Clone, Default)]
pub struct CupsSink {
    /// `host[:port]` of a remote CUPS server; local server when `None`.
    server: Option<String>,
}

impl CupsSink {
    pub fn new(server: Option<&str>) -> Self {
        Self {
            server: server.filter(|s| !s.is_empty()).map(str::to_string),
        }
    }

    fn command(&self, program: &str) -> Command {
        let mut cmd = Command::new(program);
        if let Some(server) = &self.server {
            cmd.arg("-h").arg(server);
        }
        cmd
    }

    fn run(&self, mut cmd: Command) -> Result<String, LabelError> {
        let program = cmd.get_program().to_string_lossy().into_owned();
        let output: Output = cmd
            .output()
            .map_err(|e| LabelError::SinkUnavailable(format!("Failed to run '{}': {}", program, e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LabelError::SinkUnavailable(format!(
                "'{}' failed: {}",
                program,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn options(&self, printer: &str) -> Result<String, LabelError> {
        let mut cmd = self.command("lpoptions");
        cmd.arg("-p").arg(printer).arg("-l");
        self.run(cmd)
    }
}

impl PrintSink for CupsSink {
    fn list_printers(&self) -> Result<Vec<String>, LabelError> {
        let mut cmd = self.command("lpstat");
        cmd.arg("-e");
        Ok(parse_destinations(&self.run(cmd)?))
    }

    fn default_printer(&self) -> Result<Option<String>, LabelError> {
        let mut cmd = self.command("lpstat");
        cmd.arg("-d");
        Ok(parse_default_destination(&self.run(cmd)?))
    }

    fn media_catalog(&self, printer: &str) -> Result<Vec<MediaRecord>, LabelError> {
        let output = self.options(printer)?;
        Ok(option_values(&output, "PageSize")
            .map(|(values, _)| values.iter().map(|v| media_record(v)).collect())
            .unwrap_or_default())
    }

    fn default_media(&self, printer: &str) -> Result<Option<String>, LabelError> {
        let output = self.options(printer)?;
        Ok(option_values(&output, "PageSize").and_then(|(_, default)| default))
    }

    fn resolution(&self, printer: &str) -> Result<Option<u32>, LabelError> {
        let output = self.options(printer)?;
        Ok(option_values(&output, "Resolution")
            .and_then(|(_, default)| default)
            .and_then(|value| parse_resolution(&value)))
    }

    fn submit(&self, bitmap: &Path, printer: &str, options: &PrintOptions) -> Result<(), LabelError> {
        let mut cmd = self.command("lp");
        cmd.arg("-d").arg(printer).arg("-n").arg(options.copies.to_string());
        if let Some(media) = &options.media {
            cmd.arg("-o").arg(format!("media={}", media));
        }
        if let Some(ppi) = options.ppi {
            cmd.arg("-o").arg(format!("ppi={}", ppi));
        }
        cmd.arg(bitmap);
        let output = self.run(cmd)?;
        log::info!("lp: {}", output.trim());
        Ok(())
    }
}

// ============================================================================
// OUTPUT PARSING
// ============================================================================

/// Printer names from `lpstat -e`, one per line.
pub fn parse_destinations(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Default destination from `lpstat -d`.
pub fn parse_default_destination(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        line.trim()
            .strip_prefix("system default destination:")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    })
}

/// Values of one `lpoptions -l` option and its `*`-marked default.
///
/// Lines look like `PageSize/Media Size: w162h90 *w288h432 Custom.WIDTHxHEIGHT`.
pub fn option_values(output: &str, option: &str) -> Option<(Vec<String>, Option<String>)> {
    let line = output.lines().find(|line| {
        line.split(['/', ':'])
            .next()
            .is_some_and(|name| name.trim() == option)
    })?;
    let (_, values) = line.split_once(':')?;

    let mut default = None;
    let mut all = Vec::new();
    for token in values.split_whitespace() {
        let value = match token.strip_prefix('*') {
            Some(value) => {
                default = Some(value.to_string());
                value
            }
            None => token,
        };
        // CUPS placeholder for the custom size form, not a real media
        if value.eq_ignore_ascii_case("Custom.WIDTHxHEIGHT") {
            continue;
        }
        all.push(value.to_string());
    }
    Some((all, default))
}

/// Media name to a record, with a size when the name carries one.
///
/// `w162h90` is in points; names with an explicit unit (`4x6in`,
/// `na_index-4x6_4x6in`) use that unit. Other names stay unsized and
/// are resolved from the name or configuration later.
pub fn media_record(name: &str) -> MediaRecord {
    if let Some(caps) = ppd_size_pattern().captures(name) {
        let width = caps[1].parse::<f64>().ok();
        let height = caps[2].parse::<f64>().ok();
        if let (Some(width), Some(height)) = (width, height) {
            return MediaRecord::sized(name, PhysicalSize::new(width, height, Unit::Point));
        }
    }
    match key::parse(name) {
        Some(parsed) if parsed.explicit_unit => MediaRecord::sized(name, parsed.size),
        _ => MediaRecord::named(name),
    }
}

/// `203dpi` or `300x300dpi` to the horizontal DPI.
pub fn parse_resolution(value: &str) -> Option<u32> {
    let digits = value.trim().trim_end_matches("dpi");
    digits.split('x').next()?.parse().ok()
}

// ============================================================================
// TESTS
// ============================================================================
