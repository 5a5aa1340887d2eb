//! Document batch extraction and metrics-table merge.
//!
//! `extract_batch` turns a list of document paths into disclosure records:
//! documents are processed sequentially in argument order, per-file failures
//! are collected by name and never abort the batch. `merge_metrics` folds the
//! new records into the persisted table with first-seen dedup on
//! `(metric_id, source)`. Persistence itself is the caller's explicit step
//! through `esgtracker-store`.

pub mod document;
pub mod scan;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use esgtracker_shared::MetricRecord;

pub use document::{DocumentFormat, detect_format, extract_text};
pub use scan::scan_text;

// ---------------------------------------------------------------------------
// Batch extraction
// ---------------------------------------------------------------------------

/// A per-file extraction failure, surfaced as a named warning.
#[derive(Debug, Clone)]
pub struct ExtractFailure {
    /// File name of the document that could not be read.
    pub file: String,
    /// Human-readable reason.
    pub reason: String,
}

/// The result of one extraction run.
#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    /// All records found, in document-then-line order.
    pub records: Vec<MetricRecord>,
    /// Documents that could not be read.
    pub failures: Vec<ExtractFailure>,
}

/// Progress callback for reporting per-document extraction status.
pub trait ExtractProgress: Send + Sync {
    /// Called before a document is read.
    fn document_started(&self, name: &str, current: usize, total: usize);
    /// Called after a document is scanned.
    fn document_finished(&self, name: &str, records: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ExtractProgress for SilentProgress {
    fn document_started(&self, _name: &str, _current: usize, _total: usize) {}
    fn document_finished(&self, _name: &str, _records: usize) {}
}

/// The source name recorded on extracted metrics: the final path component.
fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Extract disclosure records from a batch of documents.
///
/// One unreadable file never aborts the run; it lands in
/// [`ExtractionOutcome::failures`] and processing continues.
pub fn extract_batch(paths: &[PathBuf], progress: &dyn ExtractProgress) -> ExtractionOutcome {
    let mut outcome = ExtractionOutcome::default();
    let total = paths.len();

    for (i, path) in paths.iter().enumerate() {
        let name = source_name(path);
        progress.document_started(&name, i + 1, total);

        match document::extract_text(path) {
            Ok(text) => {
                let records = scan::scan_text(&text, &name);
                info!(file = %name, records = records.len(), "document scanned");
                progress.document_finished(&name, records.len());
                outcome.records.extend(records);
            }
            Err(e) => {
                warn!(file = %name, error = %e, "failed to read document, continuing");
                progress.document_finished(&name, 0);
                outcome.failures.push(ExtractFailure {
                    file: name,
                    reason: e.to_string(),
                });
            }
        }
    }

    outcome
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Union of the existing table and newly extracted records, deduplicated on
/// `(metric_id, source)` keeping the first-seen row. Row order is preserved:
/// existing rows first, then new rows in extraction order.
pub fn merge_metrics(
    existing: Vec<MetricRecord>,
    new: Vec<MetricRecord>,
) -> Vec<MetricRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut merged = Vec::with_capacity(existing.len() + new.len());

    for record in existing.into_iter().chain(new) {
        let key = (record.metric_id.clone(), record.source.clone());
        if seen.insert(key) {
            merged.push(record);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use esgtracker_shared::{DEFAULT_SECTOR, DEFAULT_UNIT};

    fn metric(id: &str, desc: &str, source: &str) -> MetricRecord {
        MetricRecord {
            metric_id: id.into(),
            description: desc.into(),
            unit: DEFAULT_UNIT.into(),
            sector_applicability: DEFAULT_SECTOR.into(),
            source: source.into(),
        }
    }

    #[test]
    fn batch_reads_fixture_report() {
        let outcome = extract_batch(
            &[PathBuf::from("../../../fixtures/reports/gri-excerpt.txt")],
            &SilentProgress,
        );

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.records[0].metric_id, "GRI 305-1");
        assert_eq!(outcome.records[0].description, "Direct (Scope 1) GHG emissions");
        assert_eq!(outcome.records[0].source, "gri-excerpt.txt");
    }

    #[test]
    fn batch_with_no_disclosures_yields_zero_records() {
        let outcome = extract_batch(
            &[PathBuf::from("../../../fixtures/reports/no-disclosures.txt")],
            &SilentProgress,
        );
        assert!(outcome.records.is_empty());
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn one_bad_file_does_not_abort_the_batch() {
        let outcome = extract_batch(
            &[
                PathBuf::from("../../../fixtures/reports/does-not-exist.txt"),
                PathBuf::from("../../../fixtures/reports/gri-excerpt.txt"),
            ],
            &SilentProgress,
        );

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].file, "does-not-exist.txt");
        assert_eq!(outcome.records.len(), 3);
    }

    #[test]
    fn scenario_single_hiring_disclosure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hiring.txt");
        std::fs::write(&path, "Page 1\nDisclosure 401-1 New employee hires\n")
            .expect("write report");

        let outcome = extract_batch(&[path], &SilentProgress);
        assert_eq!(outcome.records.len(), 1);

        let record = &outcome.records[0];
        assert_eq!(record.metric_id, "GRI 401-1");
        assert_eq!(record.description, "New employee hires");
        assert_eq!(record.unit, DEFAULT_UNIT);
        assert_eq!(record.sector_applicability, DEFAULT_SECTOR);
        assert_eq!(record.source, "hiring.txt");
    }

    #[test]
    fn merge_unions_and_dedups_on_id_and_source() {
        let existing = vec![metric("GRI 305-1", "Direct GHG emissions", "a.pdf")];
        let new = vec![
            // Same id, different source: kept
            metric("GRI 305-1", "Direct GHG emissions", "b.pdf"),
            // Same id, same source: dropped
            metric("GRI 305-1", "Direct GHG emissions", "a.pdf"),
            metric("GRI 302-1", "Energy consumption", "a.pdf"),
        ];

        let merged = merge_metrics(existing, new);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].source, "a.pdf");
        assert_eq!(merged[1].source, "b.pdf");
        assert_eq!(merged[2].metric_id, "GRI 302-1");
    }

    #[test]
    fn re_extraction_merge_is_idempotent() {
        let records = vec![
            metric("GRI 305-1", "Direct GHG emissions", "a.pdf"),
            metric("GRI 302-1", "Energy consumption", "a.pdf"),
        ];

        let table = merge_metrics(Vec::new(), records.clone());
        let again = merge_metrics(table.clone(), records);
        assert_eq!(again, table);
    }

    #[test]
    fn merge_dedups_even_into_an_empty_table() {
        let new = vec![
            metric("GRI 305-1", "Direct GHG emissions", "a.pdf"),
            metric("GRI 305-1", "Direct GHG emissions", "a.pdf"),
        ];
        assert_eq!(merge_metrics(Vec::new(), new).len(), 1);
    }
}
