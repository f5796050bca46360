//! Locating and parsing the JSON object embedded in generated text.
//!
//! Vendors rarely return bare JSON; the object is usually wrapped in
//! prose or a code fence. We take the first balanced `{...}` substring
//! and parse that. There is no retry here: a parse failure surfaces to
//! the caller, who may regenerate with an edited prompt.

use knotable_core::{Error, Result};
use serde::de::DeserializeOwned;

/// Returns the first balanced `{...}` substring of `text`, if any.
///
/// Brace counting skips braces inside JSON string literals, including
/// escaped quotes.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parses the first embedded JSON object of `text` into `T`.
///
/// # Errors
/// Returns [`Error::MalformedResponse`] carrying the raw text when no
/// balanced object is present or it does not parse into `T`.
pub fn parse_embedded<T: DeserializeOwned>(text: &str) -> Result<T> {
    let Some(object) = extract_json_object(text) else {
        return Err(Error::MalformedResponse {
            raw: text.to_owned(),
        });
    };

    serde_json::from_str(object).map_err(|error| {
        tracing::debug!(%error, "embedded JSON object failed to parse");
        Error::MalformedResponse {
            raw: text.to_owned(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        milestones: Vec<String>,
    }

    #[test]
    fn test_extracts_object_from_prose() {
        let text = r#"Here is your result: {"milestones":["intro","basics"]} hope it helps"#;
        let object = extract_json_object(text);
        assert_eq!(object, Some(r#"{"milestones":["intro","basics"]}"#));
    }

    #[test]
    fn test_nested_objects_stay_balanced() {
        let text = r#"note {"outer": {"inner": 1}, "tail": 2} trailing"#;
        let object = extract_json_object(text);
        assert_eq!(object, Some(r#"{"outer": {"inner": 1}, "tail": 2}"#));
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let text = r#"{"text": "a } inside", "n": 1}"#;
        let object = extract_json_object(text);
        assert_eq!(object, Some(text));
    }

    #[test]
    fn test_escaped_quotes_inside_strings() {
        let text = r#"{"text": "quote \" then } brace", "n": 2} extra"#;
        let object = extract_json_object(text);
        assert_eq!(object, Some(r#"{"text": "quote \" then } brace", "n": 2}"#));
    }

    #[test]
    fn test_plain_prose_has_no_object() {
        assert!(extract_json_object("no json here at all").is_none());
    }

    #[test]
    fn test_parse_embedded_success() {
        let text = r#"Sure! {"milestones":["one","two"]}"#;
        let parsed: Payload = match parse_embedded(text) {
            Ok(value) => value,
            Err(error) => panic!("embedded object should parse: {error}"),
        };
        assert_eq!(parsed.milestones, vec!["one", "two"]);
    }

    #[test]
    fn test_parse_embedded_prose_is_malformed() {
        let result: Result<Payload> = parse_embedded("I could not produce JSON, sorry.");
        assert!(result.is_err());
        if let Err(error) = result {
            if let Error::MalformedResponse { raw } = error {
                assert!(raw.contains("could not produce"));
            } else {
                panic!("expected MalformedResponse, got: {error}");
            }
        }
    }

    #[test]
    fn test_parse_embedded_wrong_shape_is_malformed() {
        let result: Result<Payload> = parse_embedded(r#"{"unexpected": true}"#);
        assert!(result.is_err());
        if let Err(error) = result {
            assert!(matches!(error, Error::MalformedResponse { .. }));
        }
    }

    #[test]
    fn test_unterminated_object_is_none() {
        assert!(extract_json_object(r#"{"open": true"#).is_none());
    }
}
