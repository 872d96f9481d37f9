use serde_json::json;

use sahaya_pinecone::mapper::match_to_passage;
use sahaya_pinecone::PineconeStoreError;

#[test]
fn match_to_passage_reads_text_key() {
    let metadata = json!({"text": "You need ID proof.", "source": "faq"});
    let passage = match_to_passage("id-1", 0.91, 0, Some(&metadata), "text").unwrap();
    assert_eq!(passage.id, "id-1");
    assert_eq!(passage.text, "You need ID proof.");
    assert_eq!(passage.rank, 0);
    assert_eq!(passage.score, 0.91);
}

#[test]
fn match_to_passage_honours_custom_text_key() {
    let metadata = json!({"chunk": "Fees are listed on the portal."});
    let passage = match_to_passage("id-2", 0.5, 2, Some(&metadata), "chunk").unwrap();
    assert_eq!(passage.text, "Fees are listed on the portal.");
    assert_eq!(passage.rank, 2);
}

#[test]
fn missing_or_non_string_text_is_an_error() {
    let err = match_to_passage("id", 0.1, 0, Some(&json!({"title": "x"})), "text").unwrap_err();
    assert!(matches!(err, PineconeStoreError::MissingTextKey { ref text_key } if text_key == "text"));

    let err = match_to_passage("id", 0.1, 0, Some(&json!({"text": 42})), "text").unwrap_err();
    assert!(matches!(err, PineconeStoreError::MissingTextKey { .. }));

    let err = match_to_passage("id", 0.1, 0, None, "text").unwrap_err();
    assert!(matches!(err, PineconeStoreError::MissingTextKey { .. }));

    let err = match_to_passage("id", 0.1, 0, Some(&json!(["text"])), "text").unwrap_err();
    assert!(matches!(err, PineconeStoreError::Malformed(_)));
}
