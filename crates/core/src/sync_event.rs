//! Change-notification events fanned out to workspace readers.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What happened to the entity an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncEventKind {
    Create,
    Update,
    Delete,
}

/// A single change notification.
///
/// `owner_typename`/`owner_id` identify the collaborative scope the event
/// belongs to (e.g. a user or a team); `object_typename`/`object_id`
/// identify the changed entity. Events are immutable once published and
/// expire with their minute bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncEvent {
    #[serde(rename = "type")]
    pub kind: SyncEventKind,
    pub owner_typename: String,
    pub owner_id: String,
    pub object_id: String,
    pub object_typename: String,
}

impl SyncEvent {
    pub fn new(
        kind: SyncEventKind,
        owner_typename: impl Into<String>,
        owner_id: impl Into<String>,
        object_typename: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            owner_typename: owner_typename.into(),
            owner_id: owner_id.into(),
            object_id: object_id.into(),
            object_typename: object_typename.into(),
        }
    }

    pub fn encode(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::Internal(e.to_string()))
    }

    pub fn decode(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw).map_err(|e| CoreError::MalformedRecord {
            record: "SyncEvent",
            detail: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_uses_wire_field_names() {
        let event = SyncEvent::new(SyncEventKind::Update, "User", "u1", "Collection", "c9");
        let json: serde_json::Value = serde_json::from_str(&event.encode().unwrap()).unwrap();

        assert_eq!(json["type"], "UPDATE");
        assert_eq!(json["ownerTypename"], "User");
        assert_eq!(json["ownerId"], "u1");
        assert_eq!(json["objectTypename"], "Collection");
        assert_eq!(json["objectId"], "c9");
    }

    #[test]
    fn event_round_trips() {
        let event = SyncEvent::new(SyncEventKind::Delete, "Team", "t1", "Project", "p2");
        let decoded = SyncEvent::decode(&event.encode().unwrap()).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn decode_rejects_unknown_kind() {
        let raw = r#"{"type":"RENAME","ownerTypename":"User","ownerId":"u1","objectId":"o","objectTypename":"T"}"#;
        assert!(matches!(
            SyncEvent::decode(raw),
            Err(CoreError::MalformedRecord {
                record: "SyncEvent",
                ..
            })
        ));
    }
}
