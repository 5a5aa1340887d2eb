//! CSV persistence for the three EsgTracker tables.
//!
//! Each table is owned by its own file and rewritten wholesale on every save.
//! A missing file loads as an empty table, never an error; the header row is
//! always written, including for empty tables.
//!
//! **Access rules:**
//! - No locking: single-operator use only, last writer wins.
//! - No append-only log and no partial-write protection, by contract.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use esgtracker_shared::{EsgTrackerError, MetricRecord, OntologyEntry, Result, TaxonomyEntry};

/// Metrics table header, in column order.
pub const METRICS_HEADER: [&str; 5] = [
    "Metric ID",
    "Description",
    "Unit",
    "Sector Applicability",
    "Source",
];

/// Taxonomy table header, in column order. The two manual columns are
/// optional on read so legacy 4-column files load cleanly.
pub const TAXONOMY_HEADER: [&str; 6] = [
    "Metric ID",
    "Description",
    "Category",
    "Subcategory",
    "Manual Category",
    "Manual Subcategory",
];

/// Ontology table header, in column order.
pub const ONTOLOGY_HEADER: [&str; 6] = [
    "Canonical Topic",
    "Synonyms",
    "Related Phrases",
    "GRI ID",
    "BRSR ID",
    "SASB ID",
];

// ---------------------------------------------------------------------------
// Generic row I/O
// ---------------------------------------------------------------------------

/// Read all rows of a table. An absent file is an empty table.
fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        tracing::debug!(?path, "table file not found, loading empty table");
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| EsgTrackerError::Storage(format!("open {}: {e}", path.display())))?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result
            .map_err(|e| EsgTrackerError::Storage(format!("read {}: {e}", path.display())))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Rewrite a table file wholesale: header row first, then every row in order.
fn save_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| EsgTrackerError::io(parent, e))?;
        }
    }

    // Header written explicitly so an empty table still gets one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| EsgTrackerError::Storage(format!("create {}: {e}", path.display())))?;

    writer
        .write_record(header)
        .map_err(|e| EsgTrackerError::Storage(format!("write {}: {e}", path.display())))?;

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| EsgTrackerError::Storage(format!("write {}: {e}", path.display())))?;
    }

    writer
        .flush()
        .map_err(|e| EsgTrackerError::io(path, e))?;

    tracing::debug!(?path, rows = rows.len(), "table saved");
    Ok(())
}

// ---------------------------------------------------------------------------
// Per-table operations
// ---------------------------------------------------------------------------

/// Load the metrics table.
pub fn load_metrics(path: &Path) -> Result<Vec<MetricRecord>> {
    load_rows(path)
}

/// Rewrite the metrics table.
pub fn save_metrics(path: &Path, rows: &[MetricRecord]) -> Result<()> {
    save_rows(path, &METRICS_HEADER, rows)
}

/// Load the taxonomy table.
pub fn load_taxonomy(path: &Path) -> Result<Vec<TaxonomyEntry>> {
    load_rows(path)
}

/// Rewrite the taxonomy table.
pub fn save_taxonomy(path: &Path, rows: &[TaxonomyEntry]) -> Result<()> {
    save_rows(path, &TAXONOMY_HEADER, rows)
}

/// Load the ontology table.
pub fn load_ontology(path: &Path) -> Result<Vec<OntologyEntry>> {
    load_rows(path)
}

/// Rewrite the ontology table.
pub fn save_ontology(path: &Path, rows: &[OntologyEntry]) -> Result<()> {
    save_rows(path, &ONTOLOGY_HEADER, rows)
}

/// Delete a table file. Deleting an absent file is a silent no-op.
pub fn delete_table(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(?path, "table deleted");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(EsgTrackerError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esgtracker_shared::{Category, DEFAULT_SECTOR, DEFAULT_UNIT};

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
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gri_metrics.csv");
        assert!(load_metrics(&path).expect("load").is_empty());
        assert!(load_taxonomy(&path).expect("load").is_empty());
        assert!(load_ontology(&path).expect("load").is_empty());
    }

    #[test]
    fn metrics_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gri_metrics.csv");

        let rows = vec![
            metric("GRI 305-1", "Direct GHG emissions", "a.pdf"),
            metric("GRI 401-1", "New employee hires", "b.pdf"),
        ];
        save_metrics(&path, &rows).expect("save");

        let loaded = load_metrics(&path).expect("load");
        assert_eq!(loaded, rows);
    }

    #[test]
    fn empty_save_still_writes_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ontology.csv");
        save_ontology(&path, &[]).expect("save empty");

        let content = std::fs::read_to_string(&path).expect("read back");
        assert!(content.starts_with("Canonical Topic,Synonyms,Related Phrases"));
        assert!(load_ontology(&path).expect("load").is_empty());
    }

    #[test]
    fn taxonomy_roundtrip_with_manual_columns() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("taxonomy.csv");

        let rows = vec![
            TaxonomyEntry {
                metric_id: "GRI 305-1".into(),
                description: "Direct GHG emissions".into(),
                category: Category::Environment,
                subcategory: "GHG Emissions".into(),
                manual_category: None,
                manual_subcategory: None,
            },
            TaxonomyEntry {
                metric_id: "GRI 413-1".into(),
                description: "Local community engagement".into(),
                category: Category::Uncategorized,
                subcategory: String::new(),
                manual_category: Some(Category::Social),
                manual_subcategory: Some("Community Impact".into()),
            },
        ];
        save_taxonomy(&path, &rows).expect("save");

        let loaded = load_taxonomy(&path).expect("load");
        assert_eq!(loaded, rows);
    }

    #[test]
    fn legacy_four_column_taxonomy_loads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("taxonomy.csv");
        std::fs::write(
            &path,
            "Metric ID,Description,Category,Subcategory\n\
             GRI 305-1,Direct GHG emissions,Environment,GHG Emissions\n",
        )
        .expect("write legacy file");

        let loaded = load_taxonomy(&path).expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].category, Category::Environment);
        assert_eq!(loaded[0].manual_category, None);
        assert_eq!(loaded[0].manual_subcategory, None);
    }

    #[test]
    fn ontology_phrase_cells_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ontology.csv");

        let rows = vec![OntologyEntry {
            canonical_topic: "Energy Consumption".into(),
            synonyms: vec!["kWh usage".into(), "power draw".into()],
            related_phrases: vec!["electricity".into()],
            gri_id: Some("GRI 302-1".into()),
            brsr_id: None,
            sasb_id: None,
        }];
        save_ontology(&path, &rows).expect("save");

        let content = std::fs::read_to_string(&path).expect("read back");
        assert!(content.contains("\"kWh usage, power draw\""));

        let loaded = load_ontology(&path).expect("load");
        assert_eq!(loaded, rows);
    }

    #[test]
    fn save_rewrites_wholesale() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gri_metrics.csv");

        save_metrics(&path, &[metric("GRI 305-1", "Direct GHG emissions", "a.pdf")])
            .expect("first save");
        save_metrics(&path, &[metric("GRI 401-1", "New employee hires", "b.pdf")])
            .expect("second save");

        let loaded = load_metrics(&path).expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].metric_id, "GRI 401-1");
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gri_metrics.csv");

        save_metrics(&path, &[metric("GRI 305-1", "Direct GHG emissions", "a.pdf")])
            .expect("save");
        assert!(path.exists());

        delete_table(&path).expect("delete existing");
        assert!(!path.exists());

        // Absent file: no-op, no error
        delete_table(&path).expect("delete absent");
    }
}
