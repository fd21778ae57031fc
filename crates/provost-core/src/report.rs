//! Extraction operation reporting.

use std::time::Duration;

/// Report of an archive extraction operation.
///
/// Contains the statistics an operator needs to confirm what a deployment
/// run actually wrote, including whether a shared wrapper directory was
/// stripped from the archive layout.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of files written.
    pub files_extracted: usize,

    /// Number of directory entries materialized (ancestors created
    /// implicitly for file entries are not counted).
    pub directories_created: usize,

    /// Total decompressed bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the extraction operation.
    pub duration: Duration,

    /// The top-level directory segment (with trailing `/`) that was removed
    /// from every entry name, when the archive turned out to be wrapped in
    /// a single folder. `None` when entries were extracted verbatim.
    pub stripped_root: Option<String>,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns total number of entries materialized.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }

    /// Returns `true` if a wrapper directory was stripped from entry names.
    #[must_use]
    pub fn was_normalized(&self) -> bool {
        self.stripped_root.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report() {
        let report = ExtractionReport::new();
        assert_eq!(report.files_extracted, 0);
        assert_eq!(report.directories_created, 0);
        assert_eq!(report.bytes_written, 0);
        assert!(!report.was_normalized());
    }

    #[test]
    fn test_total_items() {
        let mut report = ExtractionReport::new();
        report.files_extracted = 10;
        report.directories_created = 5;
        assert_eq!(report.total_items(), 15);
    }

    #[test]
    fn test_was_normalized() {
        let mut report = ExtractionReport::new();
        assert!(!report.was_normalized());
        report.stripped_root = Some("pack/".to_string());
        assert!(report.was_normalized());
    }
}
