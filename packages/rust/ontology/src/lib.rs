//! Ontology entry construction and synonym suggestions.
//!
//! Canonical topics are picked from the taxonomy's effective subcategories
//! when any exist, or free-typed on a first run. Suggestions are advisory
//! lookups against the metrics table and never gate an entry. Appended
//! entries are not deduplicated or validated against existing rows.

use tracing::debug;

use esgtracker_shared::{
    EsgTrackerError, MetricRecord, OntologyEntry, Result, TaxonomyEntry, validate_phrases,
};

// ---------------------------------------------------------------------------
// Topic options
// ---------------------------------------------------------------------------

/// The distinct, non-empty effective subcategories in the taxonomy, sorted.
/// This is the selection list for canonical topics.
pub fn topic_options(taxonomy: &[TaxonomyEntry]) -> Vec<String> {
    let mut topics: Vec<String> = taxonomy
        .iter()
        .map(|e| e.effective_subcategory().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    topics.sort();
    topics.dedup();
    topics
}

// ---------------------------------------------------------------------------
// Entry construction
// ---------------------------------------------------------------------------

/// User input for a new ontology entry, before validation.
#[derive(Debug, Clone, Default)]
pub struct NewOntologyEntry {
    pub canonical_topic: String,
    pub synonyms: Vec<String>,
    pub related_phrases: Vec<String>,
    pub gri_id: Option<String>,
    pub brsr_id: Option<String>,
    pub sasb_id: Option<String>,
}

/// Validate user input into an [`OntologyEntry`].
///
/// When `topics` is non-empty the canonical topic must be one of them
/// (selection semantics); on an empty list any free text is accepted.
/// Phrases are trimmed, empties dropped, and embedded commas rejected.
/// Framework ids are accepted on both paths.
pub fn build_entry(input: NewOntologyEntry, topics: &[String]) -> Result<OntologyEntry> {
    let canonical_topic = input.canonical_topic.trim().to_string();
    if canonical_topic.is_empty() {
        return Err(EsgTrackerError::validation("canonical topic is empty"));
    }

    if !topics.is_empty() && !topics.iter().any(|t| t == &canonical_topic) {
        return Err(EsgTrackerError::validation(format!(
            "canonical topic '{canonical_topic}' is not a taxonomy subcategory; \
             available topics: {}",
            topics.join(", ")
        )));
    }

    Ok(OntologyEntry {
        canonical_topic,
        synonyms: validate_phrases(&input.synonyms)?,
        related_phrases: validate_phrases(&input.related_phrases)?,
        gri_id: normalize_id(input.gri_id),
        brsr_id: normalize_id(input.brsr_id),
        sasb_id: normalize_id(input.sasb_id),
    })
}

fn normalize_id(id: Option<String>) -> Option<String> {
    id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Append an entry to the in-memory table. No dedup, no cross-row checks;
/// persistence is the caller's explicit save.
pub fn append(table: &mut Vec<OntologyEntry>, entry: OntologyEntry) {
    debug!(topic = %entry.canonical_topic, "ontology entry appended");
    table.push(entry);
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

/// How many distinct descriptions to surface as synonym suggestions.
const MAX_SYNONYM_SUGGESTIONS: usize = 5;

/// Advisory suggestions for a canonical topic.
#[derive(Debug, Default)]
pub struct Suggestions {
    /// Up to five distinct metric descriptions containing the topic.
    pub synonyms: Vec<String>,
    /// Every metric row whose description contains the topic, as candidate
    /// cross-references.
    pub matches: Vec<MetricRecord>,
}

/// Scan metric descriptions for case-insensitive substring matches against
/// the topic. A blank topic or an empty match set yields empty suggestions,
/// never an error.
pub fn suggest(metrics: &[MetricRecord], topic: &str) -> Suggestions {
    let needle = topic.trim().to_lowercase();
    if needle.is_empty() {
        return Suggestions::default();
    }

    let mut suggestions = Suggestions::default();

    for record in metrics {
        if !record.description.to_lowercase().contains(&needle) {
            continue;
        }

        if suggestions.synonyms.len() < MAX_SYNONYM_SUGGESTIONS
            && !suggestions.synonyms.contains(&record.description)
        {
            suggestions.synonyms.push(record.description.clone());
        }
        suggestions.matches.push(record.clone());
    }

    suggestions
}
