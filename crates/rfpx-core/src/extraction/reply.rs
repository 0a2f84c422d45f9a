//! Locating and parsing the JSON object inside a model reply.
//!
//! Models often wrap their JSON in prose or markdown fences. Both strategies
//! here are best-effort recovery, not strict parsing.

use serde_json::{Map, Value};

use crate::models::config::ReplyScan;

/// Parse the JSON object in `reply`, or `None` if none can be recovered.
pub fn parse_reply(reply: &str, scan: ReplyScan) -> Option<Map<String, Value>> {
    match scan {
        ReplyScan::Outermost => outermost_span(reply).and_then(parse_object),
        ReplyScan::Balanced => balanced_spans(reply).find_map(parse_object),
    }
}

/// The inclusive span from the first `{` to the last `}`.
pub fn outermost_span(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}

/// Every brace-balanced span starting at a `{`, in order of their start.
///
/// Braces inside JSON string literals do not count toward the depth.
pub fn balanced_spans(reply: &str) -> impl Iterator<Item = &str> {
    reply
        .match_indices('{')
        .filter_map(move |(start, _)| matching_close(&reply[start..]).map(|len| &reply[start..start + len]))
}

/// Byte length of the balanced object at the start of `s` (which begins with `{`).
fn matching_close(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outermost_strips_prose() {
        let reply = r#"Here is the data: {"Bid Number": "12345"} Hope this helps!"#;
        assert_eq!(outermost_span(reply), Some(r#"{"Bid Number": "12345"}"#));
    }

    #[test]
    fn test_outermost_strips_fences() {
        let reply = "```json\n{\"Title\": \"Radios\"}\n```";
        let map = parse_reply(reply, ReplyScan::Outermost).unwrap();
        assert_eq!(map["Title"], "Radios");
    }

    #[test]
    fn test_missing_braces() {
        assert_eq!(outermost_span("not json at all"), None);
        assert_eq!(outermost_span("only { open"), None);
        assert_eq!(outermost_span("only } close"), None);
        assert_eq!(outermost_span("} backwards {"), None);
    }

    #[test]
    fn test_invalid_candidate_fails() {
        assert!(parse_reply("{not: valid}", ReplyScan::Outermost).is_none());
        assert!(parse_reply("{\"a\": \"b\",}", ReplyScan::Outermost).is_none());
    }

    #[test]
    fn test_outermost_misfires_on_two_fragments() {
        let reply = r#"{"a": "1"} and also {"b": "2"}"#;
        assert!(parse_reply(reply, ReplyScan::Outermost).is_none());

        let map = parse_reply(reply, ReplyScan::Balanced).unwrap();
        assert_eq!(map["a"], "1");
    }

    #[test]
    fn test_balanced_ignores_braces_in_strings() {
        let reply = r#"Note {draft}. {"Title": "Fixtures {phase 2}", "Part_no": "A\"}"}"#;
        let map = parse_reply(reply, ReplyScan::Balanced).unwrap();
        assert_eq!(map["Title"], "Fixtures {phase 2}");
        assert_eq!(map["Part_no"], "A\"}");
    }

    #[test]
    fn test_balanced_nested_object() {
        let spans: Vec<_> = balanced_spans(r#"x {"a": {"b": 1}} y"#).collect();
        assert_eq!(spans, vec![r#"{"a": {"b": 1}}"#, r#"{"b": 1}"#]);
    }

    #[test]
    fn test_only_objects_accepted() {
        assert!(parse_object("[1, 2]").is_none());
        assert!(parse_object("\"text\"").is_none());
        assert!(parse_object("{}").is_some());
    }
}
