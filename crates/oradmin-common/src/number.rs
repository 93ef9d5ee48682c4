//! Integer helpers for request payloads
//!
//! Form inputs on the dashboard post their raw text (`"50"`) once edited, while
//! untouched fields and API clients send JSON numbers. Both are accepted.

use serde::{Deserialize, Deserializer, de::Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

/// `deserialize_with` target for optional integers; blank strings read as absent.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid integer: {}", s))),
    }
}

/// Like [`deserialize_optional`], with absent or blank values read as zero.
pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "super::deserialize")]
        size: i64,
        #[serde(default, deserialize_with = "super::deserialize_optional")]
        limit: Option<i64>,
    }

    fn parse(json: &str) -> Result<Form, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_accepts_numbers_and_numeric_text() {
        let form = parse(r#"{"size":100,"limit":"50"}"#).unwrap();
        assert_eq!(form.size, 100);
        assert_eq!(form.limit, Some(50));

        let form = parse(r#"{"size":" 250 ","limit":7}"#).unwrap();
        assert_eq!(form.size, 250);
        assert_eq!(form.limit, Some(7));
    }

    #[test]
    fn test_blank_and_missing_values() {
        let form = parse(r#"{"size":"","limit":""}"#).unwrap();
        assert_eq!(form.size, 0);
        assert_eq!(form.limit, None);

        let form = parse(r#"{"limit":null}"#).unwrap();
        assert_eq!(form.size, 0);
        assert_eq!(form.limit, None);
    }

    #[test]
    fn test_rejects_non_numeric_text() {
        let err = parse(r#"{"limit":"cincuenta"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid integer: cincuenta"));
        assert!(parse(r#"{"size":true}"#).is_err());
    }
}
