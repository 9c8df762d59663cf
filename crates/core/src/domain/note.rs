use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Per-note configuration stored alongside the markdown body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", try_from = "RawNoteConfig")]
pub struct NoteConfig {
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// Wire form of [`NoteConfig`], checked before it becomes one
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNoteConfig {
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    pinned: bool,
    #[serde(default)]
    aliases: Vec<String>,
}

impl TryFrom<RawNoteConfig> for NoteConfig {
    type Error = CoreError;

    fn try_from(raw: RawNoteConfig) -> Result<Self, Self::Error> {
        if raw.modified_at < raw.created_at {
            return Err(CoreError::InvalidNoteConfig(format!(
                "modifiedAt {} precedes createdAt {}",
                raw.modified_at, raw.created_at
            )));
        }
        Ok(Self {
            created_at: raw.created_at,
            modified_at: raw.modified_at,
            tags: raw.tags,
            pinned: raw.pinned,
            aliases: raw.aliases,
        })
    }
}

impl NoteConfig {
    /// Create a config stamped with the current time
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            modified_at: now,
            tags: Vec::new(),
            pinned: false,
            aliases: Vec::new(),
        }
    }

    /// Mark the note as modified now
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Parse a config from its JSON form
    ///
    /// Fails if the JSON is malformed or `modifiedAt` is earlier than `createdAt`.
    /// Both rules apply to every deserialization, including configs embedded
    /// in other records.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self::new()
    }
}
