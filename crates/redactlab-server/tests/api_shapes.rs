//! Response shape tests: the JSON field names clients depend on.

use redactlab_core::{Entity, EntityCategory, RedactionMode};
use redactlab_eval::{align_tokens, ProcessingStats};
use redactlab_redact::apply_redaction;

/// Entities: { text, category, startIndex?, endIndex? }
#[test]
fn test_entity_shape() {
    let unresolved = serde_json::to_value(Entity::new("Ada", EntityCategory::Person)).unwrap();
    assert_eq!(unresolved["text"], "Ada");
    assert_eq!(unresolved["category"], "PERSON");
    assert!(unresolved.get("startIndex").is_none());

    let resolved =
        serde_json::to_value(Entity::new("Ada", EntityCategory::Person).resolved_at(4, 7)).unwrap();
    assert_eq!(resolved["startIndex"], 4);
    assert_eq!(resolved["endIndex"], 7);
}

/// Entities sent by clients may omit offsets.
#[test]
fn test_entity_accepts_missing_offsets() {
    let entity: Entity =
        serde_json::from_str(r#"{"text": "10.0.0.1", "category": "IP_ADDRESS"}"#).unwrap();
    assert_eq!(entity.category, EntityCategory::IpAddress);
    assert!(!entity.is_resolved());
}

/// RedactionOutcome: { redactedText, entities }
#[test]
fn test_redaction_outcome_shape() {
    let outcome = apply_redaction(
        "IP: 10.0.0.1 end",
        &[Entity::new("10.0.0.1", EntityCategory::IpAddress)],
        RedactionMode::Mask,
    );
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["redactedText"], "IP: [IP_ADDRESS] end");
    assert!(json["entities"].is_array());
    assert_eq!(json["entities"][0]["startIndex"], 4);
}

/// ProcessingStats: accuracyScore only when a reference was given.
#[test]
fn test_stats_shape() {
    let json =
        serde_json::to_value(ProcessingStats::compute("abc", "abd", 1, None)).unwrap();
    for key in [
        "originalLength",
        "redactedLength",
        "editDistance",
        "similarityScore",
        "entityCount",
    ] {
        assert!(json[key].is_number(), "missing {}", key);
    }
    assert!(json.get("accuracyScore").is_none());

    let json =
        serde_json::to_value(ProcessingStats::compute("abc", "abd", 1, Some("abd"))).unwrap();
    assert_eq!(json["accuracyScore"], 100.0);
}

/// Alignment: { actualChunks: [{value, kind}], expectedChunks: [...] }
#[test]
fn test_alignment_shape() {
    let json = serde_json::to_value(align_tokens("a b", "a c")).unwrap();
    let actual = json["actualChunks"].as_array().unwrap();
    let expected = json["expectedChunks"].as_array().unwrap();
    assert_eq!(actual[0]["value"], "a");
    assert_eq!(actual[0]["kind"], "MATCH");
    assert_eq!(actual[2]["kind"], "MISMATCH_ACTUAL");
    assert_eq!(expected[2]["kind"], "MISMATCH_EXPECTED");
}

/// Modes travel as lowercase strings.
#[test]
fn test_mode_shape() {
    assert_eq!(serde_json::to_value(RedactionMode::Mask).unwrap(), "mask");
    let mode: RedactionMode = serde_json::from_str(r#""remove""#).unwrap();
    assert_eq!(mode, RedactionMode::Remove);
}
