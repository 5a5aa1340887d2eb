//! Core domain types for EsgTracker tables.

use serde::{Deserialize, Serialize};

use crate::error::{EsgTrackerError, Result};

/// Unit string stamped on every extracted disclosure.
pub const DEFAULT_UNIT: &str = "metric tons CO₂e";

/// Sector applicability stamped on every extracted disclosure.
pub const DEFAULT_SECTOR: &str = "All";

// ---------------------------------------------------------------------------
// Framework
// ---------------------------------------------------------------------------

/// A reporting framework, each defining its own disclosure id namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Framework {
    Gri,
    Brsr,
    Sasb,
}

impl Framework {
    /// The id prefix used in `Metric ID` values (e.g. `"GRI"` in `"GRI 305-1"`).
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Gri => "GRI",
            Self::Brsr => "BRSR",
            Self::Sasb => "SASB",
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

impl std::str::FromStr for Framework {
    type Err = EsgTrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GRI" => Ok(Self::Gri),
            "BRSR" => Ok(Self::Brsr),
            "SASB" => Ok(Self::Sasb),
            other => Err(EsgTrackerError::validation(format!(
                "unknown framework '{other}': expected GRI, BRSR, or SASB"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// MetricRecord
// ---------------------------------------------------------------------------

/// One disclosure line item found in a source document.
///
/// Uniqueness key is `(metric_id, source)`: the same id may repeat across
/// source files but never twice from the same file after dedup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Framework-prefixed disclosure id (e.g. `"GRI 305-1"`).
    #[serde(rename = "Metric ID")]
    pub metric_id: String,

    /// Disclosure description, trimmed.
    #[serde(rename = "Description")]
    pub description: String,

    /// Measurement unit (fixed for this extractor).
    #[serde(rename = "Unit")]
    pub unit: String,

    /// Sector applicability (fixed for this extractor).
    #[serde(rename = "Sector Applicability")]
    pub sector_applicability: String,

    /// Originating file name (final path component).
    #[serde(rename = "Source")]
    pub source: String,
}

impl MetricRecord {
    /// The `(metric_id, source)` dedup key.
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.metric_id, &self.source)
    }

    /// The framework this metric id belongs to, by id prefix.
    pub fn framework(&self) -> Option<Framework> {
        [Framework::Gri, Framework::Brsr, Framework::Sasb]
            .into_iter()
            .find(|f| self.metric_id.starts_with(f.prefix()))
    }
}

// ---------------------------------------------------------------------------
// Category & TaxonomyEntry
// ---------------------------------------------------------------------------

/// Top-level ESG category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Environment,
    Social,
    Governance,
    Uncategorized,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Environment => "Environment",
            Self::Social => "Social",
            Self::Governance => "Governance",
            Self::Uncategorized => "Uncategorized",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Category {
    type Err = EsgTrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Environment" => Ok(Self::Environment),
            "Social" => Ok(Self::Social),
            "Governance" => Ok(Self::Governance),
            "Uncategorized" => Ok(Self::Uncategorized),
            other => Err(EsgTrackerError::validation(format!(
                "unknown category '{other}'"
            ))),
        }
    }
}

/// Categorization of one distinct `(metric_id, description)` pair.
///
/// `category`/`subcategory` are auto-derived and recomputed on every
/// reconciliation pass; `manual_category`/`manual_subcategory` are durable
/// user overrides that survive reconciliation and win at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    #[serde(rename = "Metric ID")]
    pub metric_id: String,

    #[serde(rename = "Description")]
    pub description: String,

    /// Auto-derived category.
    #[serde(rename = "Category")]
    pub category: Category,

    /// Auto-derived subcategory, empty when `Uncategorized`.
    #[serde(rename = "Subcategory")]
    pub subcategory: String,

    /// User-set category override; wins over `category` when present.
    #[serde(rename = "Manual Category", default)]
    pub manual_category: Option<Category>,

    /// User-set subcategory override; wins over `subcategory` when present.
    #[serde(rename = "Manual Subcategory", default)]
    pub manual_subcategory: Option<String>,
}

impl TaxonomyEntry {
    /// The `(metric_id, description)` identity of this row.
    pub fn pair_key(&self) -> (&str, &str) {
        (&self.metric_id, &self.description)
    }

    /// The category shown to the user: manual override when set, else auto.
    pub fn effective_category(&self) -> Category {
        self.manual_category.unwrap_or(self.category)
    }

    /// The subcategory shown to the user: manual override when set, else auto.
    pub fn effective_subcategory(&self) -> &str {
        self.manual_subcategory
            .as_deref()
            .unwrap_or(&self.subcategory)
    }
}

// ---------------------------------------------------------------------------
// OntologyEntry
// ---------------------------------------------------------------------------

/// A user-curated cross-framework concept mapping.
///
/// Duplicate canonical topics are permitted and accumulate; entries are never
/// updated or deleted through this tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyEntry {
    /// Preferred human-readable label the synonyms map to.
    #[serde(rename = "Canonical Topic")]
    pub canonical_topic: String,

    /// Alternative names for the topic.
    #[serde(rename = "Synonyms", with = "phrase_list")]
    pub synonyms: Vec<String>,

    /// Looser associated phrasing.
    #[serde(rename = "Related Phrases", with = "phrase_list")]
    pub related_phrases: Vec<String>,

    #[serde(rename = "GRI ID", default)]
    pub gri_id: Option<String>,

    #[serde(rename = "BRSR ID", default)]
    pub brsr_id: Option<String>,

    #[serde(rename = "SASB ID", default)]
    pub sasb_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Phrase lists
// ---------------------------------------------------------------------------

/// Comma-delimited phrase list serialization.
///
/// Written to a single CSV cell joined with `", "`; read back by splitting on
/// `,`, trimming, and dropping empties. Because `,` is the delimiter, phrases
/// containing it are rejected at entry by [`validate_phrases`].
pub mod phrase_list {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Delimiter written between phrases.
    pub const DELIMITER: &str = ", ";

    /// Join phrases into the stored cell representation.
    pub fn join(phrases: &[String]) -> String {
        phrases.join(DELIMITER)
    }

    /// Split a stored cell back into trimmed, non-empty phrases.
    pub fn split(cell: &str) -> Vec<String> {
        cell.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn serialize<S: Serializer>(
        phrases: &[String],
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&join(phrases))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Vec<String>, D::Error> {
        let cell = String::deserialize(deserializer)?;
        Ok(split(&cell))
    }
}

/// Trim phrases, drop empties, and reject any phrase containing the list
/// delimiter `,` (no escaping contract is defined for it).
pub fn validate_phrases(raw: &[String]) -> Result<Vec<String>> {
    let mut phrases = Vec::new();
    for phrase in raw {
        let trimmed = phrase.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.contains(',') {
            return Err(EsgTrackerError::validation(format!(
                "phrase '{trimmed}' contains ',' which is the list delimiter; \
                 pass it as separate phrases"
            )));
        }
        phrases.push(trimmed.to_string());
    }
    Ok(phrases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framework_roundtrip() {
        let f: Framework = "brsr".parse().expect("parse framework");
        assert_eq!(f, Framework::Brsr);
        assert_eq!(f.to_string(), "BRSR");
        assert!("TCFD".parse::<Framework>().is_err());
    }

    #[test]
    fn metric_framework_by_prefix() {
        let record = MetricRecord {
            metric_id: "GRI 305-1".into(),
            description: "Direct GHG emissions".into(),
            unit: DEFAULT_UNIT.into(),
            sector_applicability: DEFAULT_SECTOR.into(),
            source: "report.pdf".into(),
        };
        assert_eq!(record.framework(), Some(Framework::Gri));
    }

    #[test]
    fn category_display_and_parse() {
        assert_eq!(Category::Environment.to_string(), "Environment");
        let c: Category = "Governance".parse().expect("parse category");
        assert_eq!(c, Category::Governance);
        assert!("governance".parse::<Category>().is_err());
    }

    #[test]
    fn effective_values_prefer_manual() {
        let mut entry = TaxonomyEntry {
            metric_id: "GRI 305-1".into(),
            description: "Direct GHG emissions".into(),
            category: Category::Environment,
            subcategory: "GHG Emissions".into(),
            manual_category: None,
            manual_subcategory: None,
        };
        assert_eq!(entry.effective_category(), Category::Environment);
        assert_eq!(entry.effective_subcategory(), "GHG Emissions");

        entry.manual_category = Some(Category::Social);
        entry.manual_subcategory = Some("Community Impact".into());
        assert_eq!(entry.effective_category(), Category::Social);
        assert_eq!(entry.effective_subcategory(), "Community Impact");
    }

    #[test]
    fn phrase_list_roundtrip() {
        let phrases = vec!["kWh usage".to_string(), "power draw".to_string()];
        let cell = phrase_list::join(&phrases);
        assert_eq!(cell, "kWh usage, power draw");
        assert_eq!(phrase_list::split(&cell), phrases);
    }

    #[test]
    fn phrase_split_drops_empties() {
        assert_eq!(
            phrase_list::split(" a ,, b ,"),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(phrase_list::split("").is_empty());
    }

    #[test]
    fn validate_phrases_rejects_delimiter() {
        let ok = validate_phrases(&[" carbon footprint ".into(), String::new()])
            .expect("valid phrases");
        assert_eq!(ok, vec!["carbon footprint".to_string()]);

        let err = validate_phrases(&["CO2, carbon".into()]);
        assert!(err.is_err());
    }
}
