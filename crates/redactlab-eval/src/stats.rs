//! Processing statistics for one redaction run.

use serde::{Deserialize, Serialize};

use crate::distance::{levenshtein_distance, similarity};

/// Scores for a redacted text against its original and, optionally, a
/// reference redaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    #[serde(rename = "originalLength")]
    pub original_length: usize,
    #[serde(rename = "redactedLength")]
    pub redacted_length: usize,
    /// Edit distance between original and redacted text.
    #[serde(rename = "editDistance")]
    pub edit_distance: usize,
    /// Original vs. redacted, in `[0, 100]`.
    #[serde(rename = "similarityScore")]
    pub similarity_score: f64,
    #[serde(rename = "entityCount")]
    pub entity_count: usize,
    /// Redacted vs. reference, in `[0, 100]`. Only set when a reference is given.
    #[serde(rename = "accuracyScore", skip_serializing_if = "Option::is_none")]
    pub accuracy_score: Option<f64>,
}

impl ProcessingStats {
    /// Compute statistics. Lengths are in characters.
    pub fn compute(
        original: &str,
        redacted: &str,
        entity_count: usize,
        reference: Option<&str>,
    ) -> Self {
        let edit_distance = levenshtein_distance(original, redacted);
        let accuracy_score = reference.map(|reference| {
            similarity(redacted, reference, levenshtein_distance(redacted, reference))
        });

        Self {
            original_length: original.chars().count(),
            redacted_length: redacted.chars().count(),
            edit_distance,
            similarity_score: similarity(original, redacted, edit_distance),
            entity_count,
            accuracy_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_without_reference() {
        let stats = ProcessingStats::compute("IP: 10.0.0.1 end", "IP: end", 1, None);
        assert_eq!(stats.original_length, 16);
        assert_eq!(stats.redacted_length, 7);
        assert_eq!(stats.edit_distance, 9);
        assert!((stats.similarity_score - 7.0 / 16.0 * 100.0).abs() < 1e-9);
        assert_eq!(stats.entity_count, 1);
        assert!(stats.accuracy_score.is_none());

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("accuracyScore").is_none());
        assert_eq!(json["editDistance"], 9);
    }

    #[test]
    fn test_accuracy_against_reference() {
        let stats = ProcessingStats::compute(
            "Mail a@b.io now",
            "Mail [EMAIL_ADDRESS] now",
            1,
            Some("Mail [EMAIL_ADDRESS] now"),
        );
        assert_eq!(stats.accuracy_score, Some(100.0));
        assert!(stats.similarity_score < 100.0);
    }

    #[test]
    fn test_empty_texts() {
        let stats = ProcessingStats::compute("", "", 0, Some(""));
        assert_eq!(stats.similarity_score, 100.0);
        assert_eq!(stats.accuracy_score, Some(100.0));
    }
}
