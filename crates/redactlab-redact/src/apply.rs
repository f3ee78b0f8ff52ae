//! Redaction application with position tracking.
//!
//! Two passes run side by side for each entity, longest text first:
//! - range resolution against the *original* text, where an occurrence is
//!   kept only if it does not overlap an already claimed span;
//! - literal substitution in the *running* buffer, so text consumed by a
//!   longer entity is no longer visible to shorter ones.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use redactlab_core::{Entity, RedactionMode, RedactionOutcome};

static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Disjoint half-open spans keyed by start offset.
#[derive(Default)]
struct SpanSet {
    spans: BTreeMap<usize, usize>,
}

impl SpanSet {
    /// Spans are disjoint, so the one starting last before `end` also ends
    /// last; it is the only candidate for an overlap.
    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.spans
            .range(..end)
            .next_back()
            .is_some_and(|(_, &other_end)| other_end > start)
    }

    fn insert(&mut self, start: usize, end: usize) {
        self.spans.insert(start, end);
    }
}

/// Redact `entities` from `text`.
///
/// Returns the cleaned text and the resolved occurrences sorted by start
/// offset. Offsets count characters of the original `text`; claimed spans
/// are tracked in bytes, which preserves every overlap relation. Entities whose text never occurs, or whose every occurrence is
/// already claimed, produce no resolved instance.
pub fn apply_redaction(text: &str, entities: &[Entity], mode: RedactionMode) -> RedactionOutcome {
    // Stable sort: equal lengths keep their input order.
    let mut ordered: Vec<&Entity> = entities.iter().filter(|e| !e.text.is_empty()).collect();
    ordered.sort_by(|a, b| b.len_chars().cmp(&a.len_chars()));

    let mut claimed = SpanSet::default();
    let mut resolved = Vec::new();
    let mut dropped = 0usize;
    let mut redacted = text.to_string();

    for entity in ordered {
        let needle = entity.text.as_str();
        let needle_chars = entity.len_chars();
        let mut from = 0;
        // Byte/char position pair, advanced as matches move right.
        let mut cursor = (0usize, 0usize);
        while let Some(pos) = text[from..].find(needle) {
            let start = from + pos;
            let end = start + needle.len();
            if claimed.overlaps(start, end) {
                dropped += 1;
            } else {
                claimed.insert(start, end);
                cursor = (start, cursor.1 + text[cursor.0..start].chars().count());
                resolved.push(entity.resolved_at(cursor.1, cursor.1 + needle_chars));
            }
            // Step one character so self-overlapping occurrences are seen.
            from = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }

        let replacement = match mode {
            RedactionMode::Mask => entity.placeholder(),
            RedactionMode::Remove => String::new(),
        };
        redacted = redacted.replace(needle, &replacement);
    }

    if dropped > 0 {
        debug!("Dropped {} overlapping occurrences", dropped);
    }

    resolved.sort_by_key(|e| e.start_index.unwrap_or(0));

    RedactionOutcome {
        redacted_text: SPACE_RUN_RE.replace_all(&redacted, " ").trim().to_string(),
        entities: resolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::detect_pattern_entities;
    use redactlab_core::EntityCategory;

    fn spans(outcome: &RedactionOutcome) -> Vec<(usize, usize)> {
        outcome
            .entities
            .iter()
            .map(|e| (e.start_index.unwrap(), e.end_index.unwrap()))
            .collect()
    }

    #[test]
    fn test_mask_detected_entities() {
        let text = "Contact john@example.com or call 212-555-0199.";
        let outcome = apply_redaction(text, &detect_pattern_entities(text), RedactionMode::Mask);

        assert_eq!(
            outcome.redacted_text,
            "Contact [EMAIL_ADDRESS] or call [PHONE_NUMBER]."
        );
        assert_eq!(spans(&outcome), vec![(8, 24), (33, 45)]);
        for entity in &outcome.entities {
            let (start, end) = (entity.start_index.unwrap(), entity.end_index.unwrap());
            assert_eq!(&text[start..end], entity.text);
        }
    }

    #[test]
    fn test_no_entities_returns_text() {
        let outcome = apply_redaction("aaa bbb", &[], RedactionMode::Mask);
        assert_eq!(outcome.redacted_text, "aaa bbb");
        assert!(outcome.entities.is_empty());
    }

    #[test]
    fn test_cleanup_only_collapses_spaces() {
        let outcome = apply_redaction("  a   b\t\tc\n\nd  ", &[], RedactionMode::Mask);
        assert_eq!(outcome.redacted_text, "a b\t\tc\n\nd");
    }

    #[test]
    fn test_remove_collapses_whitespace() {
        let entities = vec![Entity::new("10.0.0.1", EntityCategory::IpAddress)];
        let outcome = apply_redaction("IP: 10.0.0.1 end", &entities, RedactionMode::Remove);
        assert_eq!(outcome.redacted_text, "IP: end");
        assert_eq!(spans(&outcome), vec![(4, 12)]);
    }

    #[test]
    fn test_longest_entity_wins() {
        let text = "Contact John Smith and John.";
        let entities = vec![
            Entity::new("John", EntityCategory::Person),
            Entity::new("John Smith", EntityCategory::Person),
        ];
        let outcome = apply_redaction(text, &entities, RedactionMode::Mask);

        assert_eq!(outcome.redacted_text, "Contact [PERSON] and [PERSON].");
        assert_eq!(spans(&outcome), vec![(8, 18), (23, 27)]);
        assert_eq!(outcome.entities[0].text, "John Smith");
        assert_eq!(outcome.entities[1].text, "John");
    }

    #[test]
    fn test_overlapping_detector_noise_resolved() {
        let text = "Card 4111 1111 1111 1111 ok";
        let outcome = apply_redaction(text, &detect_pattern_entities(text), RedactionMode::Mask);

        assert_eq!(outcome.redacted_text, "Card [CREDIT_CARD] ok");
        assert_eq!(outcome.entities.len(), 1);
        assert_eq!(outcome.entities[0].category, EntityCategory::CreditCard);
    }

    #[test]
    fn test_entity_text_is_literal() {
        let entities = vec![Entity::new("a.b*c (x)", EntityCategory::Url)];
        let outcome =
            apply_redaction("see a.b*c (x) and aXb*c (x)", &entities, RedactionMode::Mask);
        assert_eq!(outcome.redacted_text, "see [URL] and aXb*c (x)");
        assert_eq!(outcome.entities.len(), 1);
    }

    #[test]
    fn test_missing_entity_is_skipped() {
        let entities = vec![
            Entity::new("nowhere@example.com", EntityCategory::EmailAddress),
            Entity::new("", EntityCategory::Person),
        ];
        let outcome = apply_redaction("nothing to see", &entities, RedactionMode::Mask);
        assert_eq!(outcome.redacted_text, "nothing to see");
        assert!(outcome.entities.is_empty());
    }

    #[test]
    fn test_repeated_mask_is_stable() {
        let text = "Mail a@b.io and a@b.io, host 10.1.1.1";
        let entities = detect_pattern_entities(text);
        let first = apply_redaction(text, &entities, RedactionMode::Mask);
        let second = apply_redaction(&first.redacted_text, &entities, RedactionMode::Mask);

        assert_eq!(first.redacted_text, "Mail [EMAIL_ADDRESS] and [EMAIL_ADDRESS], host [IP_ADDRESS]");
        assert_eq!(second.redacted_text, first.redacted_text);
        assert!(second.entities.is_empty());
    }

    #[test]
    fn test_occurrences_scanned_one_char_at_a_time() {
        let entities = vec![
            Entity::new("xa", EntityCategory::Person),
            Entity::new("aa", EntityCategory::Location),
        ];
        let outcome = apply_redaction("xaaa", &entities, RedactionMode::Mask);
        assert_eq!(spans(&outcome), vec![(0, 2), (2, 4)]);
        assert_eq!(outcome.redacted_text, "[PERSON][LOCATION]");
    }

    #[test]
    fn test_offsets_count_characters() {
        let text = "Café Zoë met Zoë";
        let entities = vec![Entity::new("Zoë", EntityCategory::Person)];
        let outcome = apply_redaction(text, &entities, RedactionMode::Mask);

        assert_eq!(outcome.redacted_text, "Café [PERSON] met [PERSON]");
        assert_eq!(spans(&outcome), vec![(5, 8), (13, 16)]);
        for entity in &outcome.entities {
            let (start, end) = entity.byte_span(text).unwrap();
            assert_eq!(&text[start..end], "Zoë");
        }
    }

    #[test]
    fn test_detected_offsets_after_non_ascii() {
        let text = "Café mail john@example.com";
        let outcome = apply_redaction(text, &detect_pattern_entities(text), RedactionMode::Mask);
        assert_eq!(outcome.redacted_text, "Café mail [EMAIL_ADDRESS]");
        assert_eq!(spans(&outcome), vec![(10, 26)]);
    }
}
