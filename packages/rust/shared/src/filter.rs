//! Keyword filtering shared by the list/view commands.
//!
//! The predicate is plain case-insensitive containment over a row's
//! concatenated field values. No fuzzy matching, no ranking.

use crate::types::{MetricRecord, OntologyEntry, TaxonomyEntry, phrase_list};

/// Rows that can be searched by keyword.
pub trait KeywordSearch {
    /// All field values of the row, concatenated for matching.
    fn search_text(&self) -> String;

    /// Case-insensitive containment check against the row.
    fn matches_keyword(&self, keyword: &str) -> bool {
        self.search_text()
            .to_lowercase()
            .contains(&keyword.to_lowercase())
    }
}

/// Drop rows that do not contain `keyword`.
pub fn retain_matching<T: KeywordSearch>(rows: &mut Vec<T>, keyword: &str) {
    rows.retain(|row| row.matches_keyword(keyword));
}

impl KeywordSearch for MetricRecord {
    fn search_text(&self) -> String {
        [
            self.metric_id.as_str(),
            self.description.as_str(),
            self.unit.as_str(),
            self.sector_applicability.as_str(),
            self.source.as_str(),
        ]
        .join(" ")
    }
}

impl KeywordSearch for TaxonomyEntry {
    fn search_text(&self) -> String {
        let mut text = format!(
            "{} {} {} {}",
            self.metric_id, self.description, self.category, self.subcategory
        );
        if let Some(manual) = self.manual_category {
            text.push(' ');
            text.push_str(&manual.to_string());
        }
        if let Some(manual) = &self.manual_subcategory {
            text.push(' ');
            text.push_str(manual);
        }
        text
    }
}

impl KeywordSearch for OntologyEntry {
    fn search_text(&self) -> String {
        let mut text = format!(
            "{} {} {}",
            self.canonical_topic,
            phrase_list::join(&self.synonyms),
            phrase_list::join(&self.related_phrases),
        );
        for id in [&self.gri_id, &self.brsr_id, &self.sasb_id].into_iter().flatten() {
            text.push(' ');
            text.push_str(id);
        }
        text
    }
}
