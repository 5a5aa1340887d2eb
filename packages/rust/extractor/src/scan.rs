//! Disclosure line scanning.
//!
//! A disclosure line looks like `Disclosure 305-1 Direct GHG emissions`:
//! the keyword, a 3digit-1digit code, and the rest of the line as the
//! description. Matching is case-insensitive with search semantics; lines
//! with no match are ignored, one capture per line.

use regex::Regex;
use std::sync::LazyLock;

use esgtracker_shared::{DEFAULT_SECTOR, DEFAULT_UNIT, MetricRecord};

/// Matches `Disclosure <code> <description>` anywhere in a line.
static DISCLOSURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)disclosure\s+(\d{3}-\d)\s+(.*)").expect("disclosure regex")
});

/// Scan extracted document text for disclosure lines.
///
/// Every match becomes a [`MetricRecord`] with a `"GRI "`-prefixed id, the
/// trimmed rest of the line as description, the fixed unit/sector constants,
/// and `source` as the originating file name.
pub fn scan_text(text: &str, source: &str) -> Vec<MetricRecord> {
    let mut records = Vec::new();

    for line in text.lines() {
        if let Some(caps) = DISCLOSURE_RE.captures(line) {
            records.push(MetricRecord {
                metric_id: format!("GRI {}", &caps[1]),
                description: caps[2].trim().to_string(),
                unit: DEFAULT_UNIT.to_string(),
                sector_applicability: DEFAULT_SECTOR.to_string(),
                source: source.to_string(),
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_disclosure_line() {
        let records = scan_text("Disclosure 305-1 Direct GHG emissions", "a.pdf");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].metric_id, "GRI 305-1");
        assert_eq!(records[0].description, "Direct GHG emissions");
        assert_eq!(records[0].unit, DEFAULT_UNIT);
        assert_eq!(records[0].sector_applicability, DEFAULT_SECTOR);
        assert_eq!(records[0].source, "a.pdf");
    }

    #[test]
    fn match_is_case_insensitive_and_mid_line() {
        let records = scan_text("See DISCLOSURE 401-1 New employee hires", "a.pdf");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].metric_id, "GRI 401-1");
        assert_eq!(records[0].description, "New employee hires");
    }

    #[test]
    fn non_matching_text_yields_nothing() {
        let text = "Annual report 2024\nRevenue grew 12%\nDisclosure without a code\n";
        assert!(scan_text(text, "a.pdf").is_empty());
        assert!(scan_text("", "a.pdf").is_empty());
    }

    #[test]
    fn code_shape_is_three_digits_dash_one() {
        assert!(scan_text("Disclosure 30-1 Something", "a.pdf").is_empty());
        assert!(scan_text("Disclosure 305 Something", "a.pdf").is_empty());
    }

    #[test]
    fn description_is_trimmed() {
        let records = scan_text("Disclosure 302-1 Energy consumption   \n", "a.pdf");
        assert_eq!(records[0].description, "Energy consumption");
    }

    #[test]
    fn one_record_per_matching_line() {
        let text = "Disclosure 305-1 Direct GHG emissions\n\
                    intro text\n\
                    Disclosure 302-1 Energy consumption within the organization\n";
        let records = scan_text(text, "gri.pdf");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].metric_id, "GRI 302-1");
    }
}
