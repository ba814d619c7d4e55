//! Annotation records and property name normalization.

use serde::{Deserialize, Serialize};

/// Prefix every OpenGraph property name carries.
pub const OG_PREFIX: &str = "og:";

pub const OG_URL: &str = "og:url";
pub const OG_TYPE: &str = "og:type";
pub const OG_TITLE: &str = "og:title";
pub const OG_DESCRIPTION: &str = "og:description";
pub const OG_IMAGE: &str = "og:image";

/// One explicit OpenGraph annotation attached to a page.
///
/// The host owns these records; the resolver only reads a snapshot.
/// `property` is optional because hosts may hand over half-filled records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl PropertyRecord {
    pub fn new(property: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            property: Some(property.into()),
            content: content.into(),
        }
    }

    /// A record with no property name at all.
    pub fn unnamed(content: impl Into<String>) -> Self {
        Self {
            property: None,
            content: content.into(),
        }
    }
}

/// What happens to a single annotation record during a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Append `content` under the normalized `key`.
    Keep { key: String, content: String },
    /// Drop the record and carry on with the next one.
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingProperty,
    EmptyProperty,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingProperty => "no property name",
            Self::EmptyProperty => "empty property name",
        }
    }
}

/// Normalize a property name to its `og:`-prefixed form.
///
/// Returns `None` for an absent or empty name. Names already carrying the
/// prefix are kept as-is, so `title` and `og:title` land on the same key.
pub fn normalize_property(property: Option<&str>) -> Option<String> {
    match property {
        None | Some("") => None,
        Some(name) if name.starts_with(OG_PREFIX) => Some(name.to_owned()),
        Some(name) => Some(format!("{OG_PREFIX}{name}")),
    }
}

/// Classify a record: keep it under its normalized key or skip it.
pub fn classify(record: PropertyRecord) -> RecordOutcome {
    let reason = match record.property.as_deref() {
        None => SkipReason::MissingProperty,
        Some(name) => match normalize_property(Some(name)) {
            Some(key) => {
                return RecordOutcome::Keep {
                    key,
                    content: record.content,
                };
            }
            None => SkipReason::EmptyProperty,
        },
    };
    RecordOutcome::Skip(reason)
}
