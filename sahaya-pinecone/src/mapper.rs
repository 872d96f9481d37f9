use sahaya_core::RetrievedPassage;
use serde_json::Value;

use crate::error::PineconeStoreError;

/// Builds a passage from one query match. The passage text must be a string
/// stored under `text_key` in the match metadata.
pub fn match_to_passage(
    id: &str,
    score: f32,
    rank: usize,
    metadata: Option<&Value>,
    text_key: &str,
) -> Result<RetrievedPassage, PineconeStoreError> {
    let missing = || PineconeStoreError::MissingTextKey {
        text_key: text_key.to_string(),
    };
    let object = match metadata {
        Some(Value::Object(object)) => object,
        Some(_) => {
            return Err(PineconeStoreError::Malformed(
                "match metadata must be an object".to_string(),
            ))
        }
        None => return Err(missing()),
    };
    let text = object
        .get(text_key)
        .and_then(Value::as_str)
        .ok_or_else(missing)?
        .to_string();

    Ok(RetrievedPassage {
        id: id.to_string(),
        text,
        rank,
        score,
    })
}
