//! Pattern-based entity detection for structured sensitive data.
//!
//! Each recognizer scans the whole text independently, so one span may be
//! reported under more than one category. That noise is resolved later by
//! the redaction applier's longest-first ordering.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use redactlab_core::{Entity, EntityCategory};

/// Phone matches shorter than this are bare digit runs, not phone numbers.
const PHONE_MIN_CHARS: usize = 10;
/// Date matches longer than this are more likely phone-like digit runs.
const DATE_MAX_CHARS: usize = 10;

// Compiled regex patterns (compiled once, reused).
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9_.%+-]+@(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,}").unwrap()
});
// Octets are not range-checked: 999.999.999.999 is a match.
static IPV4_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b").unwrap());
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"https?://(?:www\.)?[-A-Za-z0-9@:%._+~#=]{1,256}\.[A-Za-z0-9()]{1,6}\b[-A-Za-z0-9()@:%_+.~#?&/=]*",
    )
    .unwrap()
});
static CREDIT_CARD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:[0-9]{4}[ -]?){3}[0-9]{4}\b").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+[0-9]{1,3}[ -]?)?(?:\([0-9]{2,4}\)|\b[0-9]{2,4})[ -]?[0-9]{3,4}[ -]?[0-9]{3,4}\b")
        .unwrap()
});
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9]{1,4}[/-][0-9]{1,2}[/-][0-9]{2,4}\b").unwrap());
static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?(?: ?(?i:[ap]m))?\b").unwrap()
});

/// One structured-data recognizer.
struct Recognizer {
    category: EntityCategory,
    regex: &'static Regex,
    min_chars: usize,
    max_chars: usize,
}

impl Recognizer {
    fn new(category: EntityCategory, regex: &'static Regex) -> Self {
        Self {
            category,
            regex,
            min_chars: 0,
            max_chars: usize::MAX,
        }
    }

    fn min_chars(mut self, min: usize) -> Self {
        self.min_chars = min;
        self
    }

    fn max_chars(mut self, max: usize) -> Self {
        self.max_chars = max;
        self
    }

    fn accepts(&self, matched: &str) -> bool {
        let len = matched.chars().count();
        len >= self.min_chars && len <= self.max_chars
    }
}

/// Detector running the fixed recognizer set.
pub struct PatternDetector {
    recognizers: Vec<Recognizer>,
}

impl PatternDetector {
    /// Create a detector. Output is grouped by recognizer in this order.
    pub fn new() -> Self {
        Self {
            recognizers: vec![
                Recognizer::new(EntityCategory::EmailAddress, &EMAIL_RE),
                Recognizer::new(EntityCategory::IpAddress, &IPV4_RE),
                Recognizer::new(EntityCategory::Url, &URL_RE),
                Recognizer::new(EntityCategory::CreditCard, &CREDIT_CARD_RE),
                Recognizer::new(EntityCategory::PhoneNumber, &PHONE_RE).min_chars(PHONE_MIN_CHARS),
                Recognizer::new(EntityCategory::DateTime, &DATE_RE).max_chars(DATE_MAX_CHARS),
                Recognizer::new(EntityCategory::DateTime, &TIME_RE),
            ],
        }
    }

    /// Detect entities in text. Ranges are left unresolved.
    pub fn detect(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();

        for recognizer in &self.recognizers {
            for m in recognizer.regex.find_iter(text) {
                if recognizer.accepts(m.as_str()) {
                    entities.push(Entity::new(m.as_str(), recognizer.category));
                }
            }
        }

        debug!("Pattern detection found {} entities", entities.len());
        entities
    }
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect structured entities with the default recognizer set.
pub fn detect_pattern_entities(text: &str) -> Vec<Entity> {
    PatternDetector::new().detect(text)
}
