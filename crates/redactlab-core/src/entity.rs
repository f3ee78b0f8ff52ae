//! Entity model shared by detection, merging, redaction and scoring.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Categories of sensitive information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityCategory {
    Person,
    Location,
    EmailAddress,
    IpAddress,
    PhoneNumber,
    CreditCard,
    DateTime,
    Url,
}

impl EntityCategory {
    pub fn all() -> &'static [EntityCategory] {
        &[
            Self::Person,
            Self::Location,
            Self::EmailAddress,
            Self::IpAddress,
            Self::PhoneNumber,
            Self::CreditCard,
            Self::DateTime,
            Self::Url,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityCategory::Person => "PERSON",
            EntityCategory::Location => "LOCATION",
            EntityCategory::EmailAddress => "EMAIL_ADDRESS",
            EntityCategory::IpAddress => "IP_ADDRESS",
            EntityCategory::PhoneNumber => "PHONE_NUMBER",
            EntityCategory::CreditCard => "CREDIT_CARD",
            EntityCategory::DateTime => "DATE_TIME",
            EntityCategory::Url => "URL",
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityCategory {
    type Err = Error;

    /// Case-insensitive; `-` and spaces count as `_`. A few common short
    /// names used by NER tools are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        match normalized.as_str() {
            "PERSON" | "PER" => Ok(Self::Person),
            "LOCATION" | "LOC" | "GPE" => Ok(Self::Location),
            "EMAIL_ADDRESS" | "EMAIL" => Ok(Self::EmailAddress),
            "IP_ADDRESS" | "IP" => Ok(Self::IpAddress),
            "PHONE_NUMBER" | "PHONE" => Ok(Self::PhoneNumber),
            "CREDIT_CARD" | "CARD" => Ok(Self::CreditCard),
            "DATE_TIME" | "DATE" | "TIME" => Ok(Self::DateTime),
            "URL" => Ok(Self::Url),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

/// A detected span of sensitive text.
///
/// `start_index`/`end_index` are half-open character (code point) offsets
/// into the original text. They stay `None` until the redaction applier
/// resolves them. Use [`Entity::byte_span`] to slice the original `&str`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub category: EntityCategory,
    #[serde(
        default,
        rename = "startIndex",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_index: Option<usize>,
    #[serde(default, rename = "endIndex", skip_serializing_if = "Option::is_none")]
    pub end_index: Option<usize>,
}

impl Entity {
    /// Create an unresolved entity.
    pub fn new(text: impl Into<String>, category: EntityCategory) -> Self {
        Self {
            text: text.into(),
            category,
            start_index: None,
            end_index: None,
        }
    }

    /// Copy of this entity resolved to `start..end`.
    pub fn resolved_at(&self, start: usize, end: usize) -> Self {
        Self {
            text: self.text.clone(),
            category: self.category,
            start_index: Some(start),
            end_index: Some(end),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.start_index.is_some() && self.end_index.is_some()
    }

    /// Length of the literal text in characters.
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// Mask placeholder, e.g. `[EMAIL_ADDRESS]`.
    pub fn placeholder(&self) -> String {
        format!("[{}]", self.category.label())
    }

    /// Resolved span converted to byte offsets into `original`, so that
    /// `&original[start..end] == text`.
    ///
    /// Returns `None` for unresolved or inverted entities and spans past
    /// the end of `original`.
    pub fn byte_span(&self, original: &str) -> Option<(usize, usize)> {
        let (start, end) = (self.start_index?, self.end_index?);
        if end < start {
            return None;
        }
        let mut offsets = original
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(original.len()));
        let byte_start = offsets.nth(start)?;
        let byte_end = if end == start {
            byte_start
        } else {
            offsets.nth(end - start - 1)?
        };
        Some((byte_start, byte_end))
    }
}

/// How matched entities are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionMode {
    /// Replace with a `[CATEGORY]` tag.
    #[default]
    Mask,
    /// Delete the occurrence outright.
    Remove,
}

impl fmt::Display for RedactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedactionMode::Mask => write!(f, "mask"),
            RedactionMode::Remove => write!(f, "remove"),
        }
    }
}

impl FromStr for RedactionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mask" => Ok(Self::Mask),
            "remove" => Ok(Self::Remove),
            other => Err(Error::Config(format!("unknown redaction mode: {}", other))),
        }
    }
}

/// Redacted text plus the entities whose positions were resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionOutcome {
    #[serde(rename = "redactedText")]
    pub redacted_text: String,
    pub entities: Vec<Entity>,
}
