//! Keyword-based auto-classification of metric descriptions.

use esgtracker_shared::Category;

/// One classification rule: any keyword hit assigns the category/subcategory.
struct Rule {
    keywords: &'static [&'static str],
    category: Category,
    subcategory: &'static str,
}

/// Ordered rule table; first match wins.
const RULES: &[Rule] = &[
    Rule {
        keywords: &["emission"],
        category: Category::Environment,
        subcategory: "GHG Emissions",
    },
    Rule {
        keywords: &["energy"],
        category: Category::Environment,
        subcategory: "Energy Consumption",
    },
    Rule {
        keywords: &["diversity", "gender"],
        category: Category::Social,
        subcategory: "Gender Diversity",
    },
    Rule {
        keywords: &["training"],
        category: Category::Social,
        subcategory: "Training Hours",
    },
    Rule {
        keywords: &["board"],
        category: Category::Governance,
        subcategory: "Board Independence",
    },
    Rule {
        keywords: &["corruption"],
        category: Category::Governance,
        subcategory: "Anti-Corruption Practices",
    },
];

/// Classify a description by case-insensitive substring match against the
/// fixed rule table. Pure function: the same input always yields the same
/// `(category, subcategory)`; unmatched descriptions are `Uncategorized`
/// with an empty subcategory.
pub fn classify(description: &str) -> (Category, &'static str) {
    let desc = description.to_lowercase();

    for rule in RULES {
        if rule.keywords.iter().any(|kw| desc.contains(kw)) {
            return (rule.category, rule.subcategory);
        }
    }

    (Category::Uncategorized, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_rule_classifies() {
        assert_eq!(
            classify("Direct GHG emissions"),
            (Category::Environment, "GHG Emissions")
        );
        assert_eq!(
            classify("Energy consumption within the organization"),
            (Category::Environment, "Energy Consumption")
        );
        assert_eq!(
            classify("Gender pay gap"),
            (Category::Social, "Gender Diversity")
        );
        assert_eq!(
            classify("Diversity of governance bodies"),
            (Category::Social, "Gender Diversity")
        );
        assert_eq!(
            classify("Average hours of training per employee"),
            (Category::Social, "Training Hours")
        );
        assert_eq!(
            classify("Board composition"),
            (Category::Governance, "Board Independence")
        );
        assert_eq!(
            classify("Incidents of corruption and actions taken"),
            (Category::Governance, "Anti-Corruption Practices")
        );
    }

    #[test]
    fn anti_corruption_spelling_still_matches() {
        assert_eq!(
            classify("Anti-corruption policies and procedures"),
            (Category::Governance, "Anti-Corruption Practices")
        );
    }

    #[test]
    fn unmatched_is_uncategorized() {
        assert_eq!(classify("New employee hires"), (Category::Uncategorized, ""));
        assert_eq!(classify(""), (Category::Uncategorized, ""));
    }

    #[test]
    fn priority_order_first_match_wins() {
        // Contains both "emission" and "energy": rule 1 wins
        assert_eq!(
            classify("Energy indirect GHG emissions"),
            (Category::Environment, "GHG Emissions")
        );
    }

    #[test]
    fn classification_is_deterministic() {
        let desc = "Energy indirect GHG emissions";
        assert_eq!(classify(desc), classify(desc));
    }

    #[test]
    fn match_is_case_insensitive() {
        assert_eq!(
            classify("DIRECT GHG EMISSIONS"),
            (Category::Environment, "GHG Emissions")
        );
    }
}
