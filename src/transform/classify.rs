//! Credit-line classification.
//!
//! The rule table is evaluated top-down and the first rule with a matching
//! keyword wins. Matching is a case-insensitive substring search.
//!
//! Ordering is the tie-break: a credit line that mentions both gift and
//! purchase language is Philanthropy.

use crate::domain::AcquisitionType;

/// Ordered `(label, keywords)` rules. Keywords are lowercase.
pub const ACQUISITION_RULES: &[(AcquisitionType, &[&str])] = &[
    (
        AcquisitionType::Philanthropy,
        &["gift", "bequest", "donation", "donor"],
    ),
    (AcquisitionType::Purchase, &["purchase"]),
];

/// Label a credit line. Empty text is `Other`.
pub fn classify_credit_line(text: &str) -> AcquisitionType {
    let folded = text.to_lowercase();
    ACQUISITION_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| folded.contains(k)))
        .map(|(label, _)| *label)
        .unwrap_or(AcquisitionType::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn philanthropy_keywords_any_case() {
        for text in [
            "Gift of Jane Doe",
            "BEQUEST OF John Roe, 1931",
            "Anonymous donation",
            "Donor: the Smith family",
            "giftgiving",
        ] {
            assert_eq!(classify_credit_line(text), AcquisitionType::Philanthropy, "{text}");
        }
    }

    #[test]
    fn bequest_without_purchase_is_philanthropy() {
        assert_eq!(
            classify_credit_line("Bequest of Mary Stillman Harkness, 1950"),
            AcquisitionType::Philanthropy
        );
    }

    #[test]
    fn gift_and_purchase_prefers_philanthropy() {
        assert_eq!(
            classify_credit_line("Purchase, Gift of Ann Eden Woodward Foundation"),
            AcquisitionType::Philanthropy
        );
        assert_eq!(
            classify_credit_line("purchased with funds given as a GIFT"),
            AcquisitionType::Philanthropy
        );
    }

    #[test]
    fn purchase_only() {
        assert_eq!(classify_credit_line("Purchase, 1962 Funds"), AcquisitionType::Purchase);
        assert_eq!(classify_credit_line("Rogers Fund, PURCHASED 1907"), AcquisitionType::Purchase);
    }

    #[test]
    fn empty_or_unmatched_is_other() {
        assert_eq!(classify_credit_line(""), AcquisitionType::Other);
        assert_eq!(classify_credit_line("   "), AcquisitionType::Other);
        assert_eq!(classify_credit_line("Rogers Fund, 1919"), AcquisitionType::Other);
        assert_eq!(classify_credit_line("Museum Accession"), AcquisitionType::Other);
    }

    #[test]
    fn rule_table_order() {
        let labels: Vec<AcquisitionType> = ACQUISITION_RULES.iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, [AcquisitionType::Philanthropy, AcquisitionType::Purchase]);
    }
}
