//! Chat and message models

use serde::{Deserialize, Serialize};

/// Minimal participant identity embedded in chats and messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatParticipant {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

/// A two-party conversation between one patient and one dermatologist.
///
/// Created lazily on first contact between a pair; never merged or split.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatData {
    pub id: String,
    pub user: ChatParticipant,
    pub dermatologist: ChatParticipant,
    #[serde(default)]
    pub messages: Vec<MessageData>,
}

impl ChatData {
    /// Display name of the other party, given the viewer's id.
    pub fn counterpart(&self, viewer_id: &str) -> &ChatParticipant {
        if self.user.id == viewer_id {
            &self.dermatologist
        } else {
            &self.user
        }
    }
}

/// A chat message. Immutable once created; no edit operation exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub content: String,
    pub created_at: String,
    pub read: bool,
    pub sender: Option<ChatParticipant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counterpart_picks_the_other_party() {
        let chat: ChatData = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "user": {"id": "u1", "name": "Pat", "image": null},
            "dermatologist": {"id": "d1", "name": "Dr. Kim", "image": null},
        }))
        .unwrap();

        assert_eq!(chat.counterpart("u1").id, "d1");
        assert_eq!(chat.counterpart("d1").id, "u1");
    }
}
