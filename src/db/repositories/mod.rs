pub mod category;
pub mod channel;
pub mod epg;
pub mod favorite;
pub mod history;
pub mod movie;
pub mod series;
pub mod settings;

/// Encodes a string list for a TEXT column.
pub(crate) fn encode_string_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes a TEXT column back into a string list. Malformed or empty
/// text decodes to an empty list, never an error.
pub(crate) fn decode_string_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_list_round_trips() {
        let values = vec!["18".to_string(), "42".to_string()];
        assert_eq!(decode_string_list(&encode_string_list(&values)), values);
    }

    #[test]
    fn empty_list_encodes_to_json_array() {
        assert_eq!(encode_string_list(&[]), "[]");
        assert!(decode_string_list("[]").is_empty());
    }

    #[test]
    fn malformed_text_decodes_to_empty() {
        assert!(decode_string_list("").is_empty());
        assert!(decode_string_list("not json").is_empty());
        assert!(decode_string_list("{\"a\":1}").is_empty());
    }
}
