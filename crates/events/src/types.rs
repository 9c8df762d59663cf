//! Event types exchanged between note editor components

use std::fmt;
use std::str::FromStr;

use notes_core::NoteConfig;
use serde::{Deserialize, Serialize};

use crate::error::{EventError, Result};

/// Name of an event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum EventKind {
    ModifiedMarkdown,
    RefreshedNotes,
    DeletedNote,
    ChangedNoteFilePath,
    PerformedGitOperation,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::ModifiedMarkdown,
        EventKind::RefreshedNotes,
        EventKind::DeletedNote,
        EventKind::ChangedNoteFilePath,
        EventKind::PerformedGitOperation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModifiedMarkdown => "ModifiedMarkdown",
            Self::RefreshedNotes => "RefreshedNotes",
            Self::DeletedNote => "DeletedNote",
            Self::ChangedNoteFilePath => "ChangedNoteFilePath",
            Self::PerformedGitOperation => "PerformedGitOperation",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EventError::UnknownEventKind(s.to_string()))
    }
}

/// Markdown of an open note was edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ModifiedMarkdownEventData {
    pub tab_id: String,
    pub notebook_path: String,
    pub note_file_path: String,
    pub markdown: String,
    pub note_config: NoteConfig,
}

/// Notes of a notebook were reloaded from disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RefreshedNotesEventData {
    pub notebook_path: String,
}

/// A note was removed from its notebook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct DeletedNoteEventData {
    pub tab_id: String,
    pub notebook_path: String,
    pub note_file_path: String,
}

/// A note was renamed or moved within its notebook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ChangedNoteFilePathEventData {
    pub tab_id: String,
    pub notebook_path: String,
    pub old_note_file_path: String,
    pub new_note_file_path: String,
}

/// A git operation (pull, push, commit, checkout...) ran against a notebook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct PerformedGitOperationEventData {
    pub notebook_path: String,
}

/// All events that can be emitted, each tagged with its own payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "type", content = "data")]
pub enum Event {
    ModifiedMarkdown(ModifiedMarkdownEventData),
    RefreshedNotes(RefreshedNotesEventData),
    DeletedNote(DeletedNoteEventData),
    ChangedNoteFilePath(ChangedNoteFilePathEventData),
    PerformedGitOperation(PerformedGitOperationEventData),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ModifiedMarkdown(_) => EventKind::ModifiedMarkdown,
            Event::RefreshedNotes(_) => EventKind::RefreshedNotes,
            Event::DeletedNote(_) => EventKind::DeletedNote,
            Event::ChangedNoteFilePath(_) => EventKind::ChangedNoteFilePath,
            Event::PerformedGitOperation(_) => EventKind::PerformedGitOperation,
        }
    }

    /// Notebook the event belongs to
    pub fn notebook_path(&self) -> &str {
        match self {
            Event::ModifiedMarkdown(data) => &data.notebook_path,
            Event::RefreshedNotes(data) => &data.notebook_path,
            Event::DeletedNote(data) => &data.notebook_path,
            Event::ChangedNoteFilePath(data) => &data.notebook_path,
            Event::PerformedGitOperation(data) => &data.notebook_path,
        }
    }

    /// Editor tab that produced the event, if it is tab-scoped
    pub fn tab_id(&self) -> Option<&str> {
        match self {
            Event::ModifiedMarkdown(data) => Some(&data.tab_id),
            Event::DeletedNote(data) => Some(&data.tab_id),
            Event::ChangedNoteFilePath(data) => Some(&data.tab_id),
            Event::RefreshedNotes(_) | Event::PerformedGitOperation(_) => None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Payload record bound to exactly one [`EventKind`]
pub trait EventPayload: Sized + 'static {
    const KIND: EventKind;

    /// Borrow the payload out of an event of the matching kind
    fn from_event(event: &Event) -> Option<&Self>;
}

macro_rules! impl_event_payload {
    ($($variant:ident => $data:ty),+ $(,)?) => {
        $(
            impl EventPayload for $data {
                const KIND: EventKind = EventKind::$variant;

                fn from_event(event: &Event) -> Option<&Self> {
                    match event {
                        Event::$variant(data) => Some(data),
                        _ => None,
                    }
                }
            }

            impl From<$data> for Event {
                fn from(data: $data) -> Self {
                    Event::$variant(data)
                }
            }
        )+
    };
}

impl_event_payload! {
    ModifiedMarkdown => ModifiedMarkdownEventData,
    RefreshedNotes => RefreshedNotesEventData,
    DeletedNote => DeletedNoteEventData,
    ChangedNoteFilePath => ChangedNoteFilePathEventData,
    PerformedGitOperation => PerformedGitOperationEventData,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renamed_event() -> Event {
        Event::ChangedNoteFilePath(ChangedNoteFilePathEventData {
            tab_id: "tab-1".to_string(),
            notebook_path: "/tmp/nb".to_string(),
            old_note_file_path: "drafts/a.md".to_string(),
            new_note_file_path: "notes/a.md".to_string(),
        })
    }

    #[test]
    fn test_event_kind_parse_and_display() {
        for kind in EventKind::ALL {
            let parsed: EventKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_event_kind_parse_unknown() {
        let err = "SavedNote".parse::<EventKind>().unwrap_err();
        assert!(matches!(err, EventError::UnknownEventKind(ref name) if name == "SavedNote"));
    }

    #[test]
    fn test_event_kind_serializes_as_tag() {
        let json = serde_json::to_string(&EventKind::PerformedGitOperation).unwrap();
        assert_eq!(json, "\"PerformedGitOperation\"");
    }

    #[test]
    fn test_event_kind_matches_variant() {
        assert_eq!(renamed_event().kind(), EventKind::ChangedNoteFilePath);

        let event: Event = RefreshedNotesEventData {
            notebook_path: "/tmp/nb".to_string(),
        }
        .into();
        assert_eq!(event.kind(), EventKind::RefreshedNotes);
    }

    #[test]
    fn test_event_accessors() {
        let event = renamed_event();
        assert_eq!(event.notebook_path(), "/tmp/nb");
        assert_eq!(event.tab_id(), Some("tab-1"));

        let git = Event::PerformedGitOperation(PerformedGitOperationEventData {
            notebook_path: "/tmp/nb".to_string(),
        });
        assert_eq!(git.tab_id(), None);
    }

    #[test]
    fn test_event_serialization() {
        let json = renamed_event().to_json().unwrap();
        assert!(json.contains("\"type\":\"ChangedNoteFilePath\""));
        assert!(json.contains("\"data\""));
        assert!(json.contains("oldNoteFilePath"));
        assert!(json.contains("newNoteFilePath"));
        assert!(json.contains("tabId"));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"DeletedNote","data":{"tabId":"t1","notebookPath":"/nb","noteFilePath":"a.md"}}"#;
        let event = Event::from_json(json).unwrap();

        match event {
            Event::DeletedNote(data) => {
                assert_eq!(data.tab_id, "t1");
                assert_eq!(data.note_file_path, "a.md");
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn test_event_deserialization_rejects_mismatched_payload() {
        let json = r#"{"type":"ChangedNoteFilePath","data":{"notebookPath":"/nb"}}"#;
        assert!(matches!(
            Event::from_json(json),
            Err(EventError::Serialization(_))
        ));
    }

    #[test]
    fn test_event_deserialization_validates_note_config() {
        let json = r##"{"type":"ModifiedMarkdown","data":{"tabId":"t1","notebookPath":"/nb","noteFilePath":"a.md","markdown":"# A","noteConfig":{"createdAt":"2024-02-01T00:00:00Z","modifiedAt":"2024-01-01T00:00:00Z"}}}"##;
        let err = Event::from_json(json).unwrap_err();
        assert!(matches!(err, EventError::Serialization(_)));
        assert!(err.to_string().contains("precedes createdAt"));
    }

    #[test]
    fn test_payload_from_event() {
        let event = renamed_event();
        let data = ChangedNoteFilePathEventData::from_event(&event).unwrap();
        assert_eq!(data.new_note_file_path, "notes/a.md");
        assert!(DeletedNoteEventData::from_event(&event).is_none());
        assert_eq!(ChangedNoteFilePathEventData::KIND, event.kind());
    }

    #[test]
    fn test_modified_markdown_carries_note_config() {
        let config = NoteConfig::new();
        let event = Event::ModifiedMarkdown(ModifiedMarkdownEventData {
            tab_id: "tab-2".to_string(),
            notebook_path: "/tmp/nb".to_string(),
            note_file_path: "todo.md".to_string(),
            markdown: "# Todo".to_string(),
            note_config: config.clone(),
        });

        let roundtrip = Event::from_json(&event.to_json().unwrap()).unwrap();
        let data = ModifiedMarkdownEventData::from_event(&roundtrip).unwrap();
        assert_eq!(data.note_config, config);
        assert!(event.to_json().unwrap().contains("noteConfig"));
    }
}
