//! Ingredients travel and are stored as a JSON-encoded array of strings.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Invalid ingredients format: {0}")]
pub struct IngredientsError(#[from] serde_json::Error);

/// Encode an ordered ingredient list, e.g. `["2 cups flour","1 egg"]`.
pub fn encode(ingredients: &[String]) -> String {
    serde_json::Value::from(ingredients.to_vec()).to_string()
}

/// Decode a JSON-encoded ingredient list. A blank string decodes to an empty list.
pub fn decode(raw: &str) -> Result<Vec<String>, IngredientsError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(raw)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    Encoded(String),
    List(Vec<String>),
}

/// Deserialize an ingredients field that may arrive either already encoded
/// (`"[\"flour\"]"`) or as a plain JSON array, normalizing to the encoded form.
pub fn deserialize_encoded<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::Encoded(s) => s,
        StringOrList::List(list) => encode(&list),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_preserves_order() {
        let decoded = decode(r#"["2 cups flour","1 tsp salt","3 eggs"]"#).unwrap();
        assert_eq!(decoded, vec!["2 cups flour", "1 tsp salt", "3 eggs"]);
    }

    #[test]
    fn test_decode_blank_is_empty() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("  ").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_non_array() {
        assert!(decode(r#"{"item":"flour"}"#).is_err());
        assert!(decode("flour, sugar").is_err());
    }

    #[test]
    fn test_encode_escapes_quotes() {
        let encoded = encode(&["1 \"large\" egg".to_string()]);
        assert_eq!(decode(&encoded).unwrap(), vec!["1 \"large\" egg"]);
    }

    #[test]
    fn test_deserialize_accepts_plain_array() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "deserialize_encoded")]
            ingredients: String,
        }

        let w: Wrapper = serde_json::from_str(r#"{"ingredients":["salt"]}"#).unwrap();
        assert_eq!(w.ingredients, r#"["salt"]"#);

        let w: Wrapper = serde_json::from_str(r#"{"ingredients":"[\"salt\"]"}"#).unwrap();
        assert_eq!(w.ingredients, r#"["salt"]"#);
    }
}
