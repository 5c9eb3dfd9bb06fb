//! In-process print sink.
//!
//! Serves a fixed printer/media table and records submitted jobs. Stands
//! in for the print server in unit and integration tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{MediaRecord, PrintOptions, PrintSink};
use crate::error::LabelError;

#[derive(Debug, Clone, Default)]
struct PrinterEntry {
    media: Vec<MediaRecord>,
    default_media: Option<String>,
    resolution: Option<u32>,
}

/// A job accepted by [`MemorySink::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedJob {
    pub printer: String,
    pub bitmap: PathBuf,
    pub options: PrintOptions,
    /// Size of the bitmap file at submission time.
    pub bytes: u64,
}

/// Print sink held entirely in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    printers: BTreeMap<String, PrinterEntry>,
    default_printer: Option<String>,
    failing: bool,
    jobs: Mutex<Vec<SubmittedJob>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a printer with its media list.
    pub fn with_printer(mut self, name: &str, media: Vec<MediaRecord>) -> Self {
        self.printers.entry(name.to_string()).or_default().media = media;
        self
    }

    pub fn with_default_printer(mut self, name: &str) -> Self {
        self.default_printer = Some(name.to_string());
        self
    }

    pub fn with_default_media(mut self, printer: &str, media: &str) -> Self {
        self.printers.entry(printer.to_string()).or_default().default_media = Some(media.to_string());
        self
    }

    pub fn with_resolution(mut self, printer: &str, dpi: u32) -> Self {
        self.printers.entry(printer.to_string()).or_default().resolution = Some(dpi);
        self
    }

    /// Every call fails as if the server were unreachable.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Jobs submitted so far.
    pub fn jobs(&self) -> Vec<SubmittedJob> {
        self.jobs.lock().map(|jobs| jobs.clone()).unwrap_or_default()
    }

    fn check(&self) -> Result<(), LabelError> {
        if self.failing {
            return Err(LabelError::SinkUnavailable(
                "print server unreachable".to_string(),
            ));
        }
        Ok(())
    }

    fn printer(&self, name: &str) -> Result<&PrinterEntry, LabelError> {
        self.check()?;
        self.printers
            .get(name)
            .ok_or_else(|| LabelError::SinkUnavailable(format!("unknown printer '{}'", name)))
    }
}

impl PrintSink for MemorySink {
    fn list_printers(&self) -> Result<Vec<String>, LabelError> {
        self.check()?;
        Ok(self.printers.keys().cloned().collect())
    }

    fn default_printer(&self) -> Result<Option<String>, LabelError> {
        self.check()?;
        Ok(self.default_printer.clone())
    }

    fn media_catalog(&self, printer: &str) -> Result<Vec<MediaRecord>, LabelError> {
        Ok(self.printer(printer)?.media.clone())
    }

    fn default_media(&self, printer: &str) -> Result<Option<String>, LabelError> {
        Ok(self.printer(printer)?.default_media.clone())
    }

    fn resolution(&self, printer: &str) -> Result<Option<u32>, LabelError> {
        Ok(self.printer(printer)?.resolution)
    }

    fn submit(&self, bitmap: &Path, printer: &str, options: &PrintOptions) -> Result<(), LabelError> {
        self.printer(printer)?;
        let bytes = std::fs::metadata(bitmap)?.len();
        let job = SubmittedJob {
            printer: printer.to_string(),
            bitmap: bitmap.to_path_buf(),
            options: options.clone(),
            bytes,
        };
        self.jobs
            .lock()
            .map_err(|_| LabelError::SinkUnavailable("job log poisoned".to_string()))?
            .push(job);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{PhysicalSize, Unit};

    fn sink() -> MemorySink {
        MemorySink::new()
            .with_printer(
                "zebra",
                vec![MediaRecord::sized("w288h432", PhysicalSize::new(288.0, 432.0, Unit::Point))],
            )
            .with_default_media("zebra", "w288h432")
            .with_resolution("zebra", 203)
            .with_default_printer("zebra")
    }

    #[test]
    fn test_queries() {
        let sink = sink();
        assert_eq!(sink.list_printers().unwrap(), vec!["zebra".to_string()]);
        assert_eq!(sink.default_printer().unwrap().as_deref(), Some("zebra"));
        assert_eq!(sink.media_catalog("zebra").unwrap().len(), 1);
        assert_eq!(sink.default_media("zebra").unwrap().as_deref(), Some("w288h432"));
        assert_eq!(sink.resolution("zebra").unwrap(), Some(203));
    }

    #[test]
    fn test_unknown_printer() {
        assert!(matches!(
            sink().media_catalog("laser"),
            Err(LabelError::SinkUnavailable(_))
        ));
    }

    #[test]
    fn test_failing() {
        let sink = sink().failing();
        assert!(sink.list_printers().is_err());
        assert!(sink.default_media("zebra").is_err());
    }

    #[test]
    fn test_submit_records_job() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label.png");
        std::fs::write(&path, b"png").unwrap();

        let sink = sink();
        sink.submit(&path, "zebra", &PrintOptions::copies(2)).unwrap();
        let jobs = sink.jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].printer, "zebra");
        assert_eq!(jobs[0].options.copies, 2);
        assert_eq!(jobs[0].bytes, 3);
    }
}
