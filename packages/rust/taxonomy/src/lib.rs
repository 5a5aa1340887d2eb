//! Taxonomy reconciliation over the metrics table.
//!
//! `reconcile` rebuilds the taxonomy from the current metrics table and the
//! previously persisted taxonomy: metrics pairs drive the rows, persisted
//! pairs that no longer appear in metrics are preserved after them, the auto
//! `category`/`subcategory` columns are recomputed on every pass, and the
//! manual override columns are carried over by pair untouched. Viewing and
//! saving are distinct actions; persistence goes through `esgtracker-store`.

pub mod classify;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use esgtracker_shared::{Category, EsgTrackerError, MetricRecord, Result, TaxonomyEntry};

pub use classify::classify;

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Rebuild the taxonomy table from the metrics table and the previously
/// persisted taxonomy.
///
/// Every distinct `(metric_id, description)` pair in `metrics` gets exactly
/// one row, in first-seen order; persisted pairs absent from metrics follow
/// in their prior order. Auto columns are recomputed for all rows.
pub fn reconcile(metrics: &[MetricRecord], previous: &[TaxonomyEntry]) -> Vec<TaxonomyEntry> {
    let manual_by_pair: HashMap<(&str, &str), (&Option<Category>, &Option<String>)> = previous
        .iter()
        .map(|e| (e.pair_key(), (&e.manual_category, &e.manual_subcategory)))
        .collect();

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut rows = Vec::new();

    for metric in metrics {
        let key = (metric.metric_id.clone(), metric.description.clone());
        if !seen.insert(key) {
            continue;
        }

        let (category, subcategory) = classify(&metric.description);
        let (manual_category, manual_subcategory) = manual_by_pair
            .get(&(metric.metric_id.as_str(), metric.description.as_str()))
            .map(|(c, s)| ((*c).clone(), (*s).clone()))
            .unwrap_or((None, None));

        rows.push(TaxonomyEntry {
            metric_id: metric.metric_id.clone(),
            description: metric.description.clone(),
            category,
            subcategory: subcategory.to_string(),
            manual_category,
            manual_subcategory,
        });
    }

    // Pairs no longer backed by any metric row are preserved, not dropped.
    for entry in previous {
        let key = (entry.metric_id.clone(), entry.description.clone());
        if seen.insert(key) {
            let (category, subcategory) = classify(&entry.description);
            rows.push(TaxonomyEntry {
                metric_id: entry.metric_id.clone(),
                description: entry.description.clone(),
                category,
                subcategory: subcategory.to_string(),
                manual_category: entry.manual_category,
                manual_subcategory: entry.manual_subcategory.clone(),
            });
        }
    }

    debug!(rows = rows.len(), "taxonomy reconciled");
    rows
}

// ---------------------------------------------------------------------------
// Manual overrides
// ---------------------------------------------------------------------------

/// A manual curation action on taxonomy rows.
#[derive(Debug, Clone)]
pub enum TaxonomyOverride {
    /// Set the manual category (and optionally subcategory) override.
    Set {
        category: Category,
        subcategory: Option<String>,
    },
    /// Remove any manual override, reverting to the auto classification.
    Clear,
}

/// Apply an override to every row with `metric_id`, narrowed to a single
/// pair when `description` is given. Returns the number of rows changed;
/// errors when nothing matches.
pub fn apply_override(
    rows: &mut [TaxonomyEntry],
    metric_id: &str,
    description: Option<&str>,
    action: &TaxonomyOverride,
) -> Result<usize> {
    let mut changed = 0;

    for row in rows.iter_mut() {
        if row.metric_id != metric_id {
            continue;
        }
        if let Some(desc) = description {
            if row.description != desc {
                continue;
            }
        }

        match action {
            TaxonomyOverride::Set {
                category,
                subcategory,
            } => {
                row.manual_category = Some(*category);
                row.manual_subcategory = subcategory.clone();
            }
            TaxonomyOverride::Clear => {
                row.manual_category = None;
                row.manual_subcategory = None;
            }
        }
        changed += 1;
    }

    if changed == 0 {
        return Err(EsgTrackerError::validation(match description {
            Some(desc) => format!("no taxonomy row matches metric id '{metric_id}' with description '{desc}'"),
            None => format!("no taxonomy row matches metric id '{metric_id}'"),
        }));
    }

    Ok(changed)
}

// ---------------------------------------------------------------------------
// View filters (never persisted)
// ---------------------------------------------------------------------------

/// Keep only rows whose *effective* category matches exactly.
pub fn retain_category(rows: &mut Vec<TaxonomyEntry>, category: Category) {
    rows.retain(|row| row.effective_category() == category);
}
