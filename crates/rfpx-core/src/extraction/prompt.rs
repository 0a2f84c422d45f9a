//! Prompt rendering.

use super::DEFAULT_MAX_TEXT_CHARS;

/// Renders the extraction instruction sent to the model.
///
/// Output depends only on the field list, the text, and the character cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptBuilder {
    max_text_chars: usize,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }

    /// Set the maximum number of characters of source text embedded.
    pub fn with_max_text_chars(mut self, max_text_chars: usize) -> Self {
        self.max_text_chars = max_text_chars;
        self
    }

    pub fn max_text_chars(&self) -> usize {
        self.max_text_chars
    }

    /// Render the prompt for `fields` over `text`.
    ///
    /// Text beyond the cap is dropped without error.
    pub fn build(&self, fields: &[&str], text: &str) -> String {
        let field_list = fields
            .iter()
            .map(|f| quote(f))
            .collect::<Vec<_>>()
            .join(", ");

        let example_entries = fields
            .iter()
            .map(|f| format!("  {}: \"\"", quote(f)))
            .collect::<Vec<_>>()
            .join(",\n");

        let excerpt = truncate_chars(text, self.max_text_chars);

        let mut prompt = String::with_capacity(excerpt.len() + 2048);
        prompt.push_str(
            "Carefully extract ONLY the following fields as a JSON object with EXACT field names \
             (including capitalization and spaces):\n",
        );
        prompt.push_str(&field_list);
        prompt.push_str(
            "\nIf a field is not present in the document, set it to an empty string. \
             Do not generate extra fields.\n",
        );
        prompt.push_str("Example output:\n{\n");
        prompt.push_str(&example_entries);
        prompt.push_str("\n}\n\nRFP TEXT:\n");
        prompt.push_str(excerpt);
        prompt.push_str("\n\nRespond only with valid JSON.");
        prompt
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The first `max_chars` characters of `text` (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// A field name as a JSON string literal.
fn quote(field: &str) -> String {
    serde_json::Value::from(field).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exact_layout_for_small_schema() {
        let prompt = PromptBuilder::new().build(&["Bid Number", "Due Date"], "Bid Number: 1");
        assert_eq!(
            prompt,
            "Carefully extract ONLY the following fields as a JSON object with EXACT field names \
             (including capitalization and spaces):\n\
             \"Bid Number\", \"Due Date\"\n\
             If a field is not present in the document, set it to an empty string. \
             Do not generate extra fields.\n\
             Example output:\n\
             {\n  \"Bid Number\": \"\",\n  \"Due Date\": \"\"\n}\n\
             \n\
             RFP TEXT:\n\
             Bid Number: 1\n\
             \n\
             Respond only with valid JSON."
        );
    }

    #[test]
    fn test_lists_every_schema_field_verbatim() {
        let prompt = PromptBuilder::new().build(schema::fields(), "text");
        for field in schema::fields() {
            assert!(prompt.contains(&format!("\"{}\"", field)), "missing {field}");
            assert!(prompt.contains(&format!("  \"{}\": \"\"", field)));
        }
        assert!(prompt.ends_with("Respond only with valid JSON."));
    }

    #[test]
    fn test_example_block_is_valid_json_in_schema_order() {
        let prompt = PromptBuilder::new().build(schema::fields(), "");
        let start = prompt.find("Example output:\n").unwrap() + "Example output:\n".len();
        let end = prompt.find("\n\nRFP TEXT:").unwrap();

        let example: serde_json::Value = serde_json::from_str(&prompt[start..end]).unwrap();
        let object = example.as_object().unwrap();
        assert_eq!(object.len(), schema::FIELD_COUNT);
        assert!(object.values().all(|v| v == ""));
        assert_eq!(&prompt[start..end], serde_json::to_string_pretty(&schema::empty_record()).unwrap());
    }

    #[test]
    fn test_text_truncated_to_cap() {
        let text = format!("{}{}", "a".repeat(8000), "TAIL");
        let prompt = PromptBuilder::new().build(schema::fields(), &text);
        assert!(prompt.contains(&"a".repeat(8000)));
        assert!(!prompt.contains("TAIL"));
    }

    #[test]
    fn test_truncation_counts_characters() {
        assert_eq!(truncate_chars("żółw", 2), "żó");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_deterministic() {
        let builder = PromptBuilder::new().with_max_text_chars(100);
        let text = "Payment Terms: Net 45";
        assert_eq!(
            builder.build(schema::fields(), text),
            builder.build(schema::fields(), text)
        );
    }
}
