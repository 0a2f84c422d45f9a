//! The fixed RFP field schema.
//!
//! Field names are the contract surface: the prompt lists them verbatim and
//! every [`ExtractionRecord`] carries exactly these keys. Case and whitespace
//! are part of each key.

use crate::models::record::ExtractionRecord;

/// Number of fields in the schema.
pub const FIELD_COUNT: usize = 20;

/// Canonical field names in declared order.
pub const FIELDS: [&str; FIELD_COUNT] = [
    "Bid Number",
    "Title",
    "Due Date",
    "Bid Submission Type",
    "Term of Bid",
    "Pre Bid Meeting",
    "Installation",
    "Bid Bond Requirement",
    "Delivery Date",
    "Payment Terms",
    "Any Additional Documentation Required",
    "MFG for Registration",
    "Contract or Cooperative to use",
    "Model_no",
    "Part_no",
    "Product",
    "contact_info",
    "company_name",
    "Bid Summary",
    "Product Specification",
];

/// The ordered field list.
pub fn fields() -> &'static [&'static str] {
    &FIELDS
}

/// A record with every field set to the empty string.
pub fn empty_record() -> ExtractionRecord {
    ExtractionRecord::default()
}

/// Index of a field in declared order, matched exactly.
pub fn position(field: &str) -> Option<usize> {
    FIELDS.iter().position(|f| *f == field)
}

/// Identifier-style name for a field (`"Bid Number"` -> `"Bid_Number"`).
///
/// Used wherever spaces are not allowed in a key, such as CSV headers meant
/// for spreadsheets or struct-like exports.
pub fn attribute_name(field: &str) -> String {
    field.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_twenty_unique_fields() {
        let unique: HashSet<_> = fields().iter().collect();
        assert_eq!(fields().len(), 20);
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn test_empty_record_has_every_field_blank() {
        let record = empty_record();
        for field in fields() {
            assert_eq!(record.get(field), Some(""));
        }
        assert_eq!(record.iter().count(), FIELD_COUNT);
    }

    #[test]
    fn test_position_is_exact_match() {
        assert_eq!(position("Bid Number"), Some(0));
        assert_eq!(position("Product Specification"), Some(19));
        assert_eq!(position("bid number"), None);
        assert_eq!(position("Bid  Number"), None);
    }

    #[test]
    fn test_attribute_names() {
        assert_eq!(attribute_name("Bid Number"), "Bid_Number");
        assert_eq!(
            attribute_name("Any Additional Documentation Required"),
            "Any_Additional_Documentation_Required"
        );
        assert_eq!(attribute_name("Model_no"), "Model_no");
        assert_eq!(attribute_name("contact_info"), "contact_info");
    }
}
