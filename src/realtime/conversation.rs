//! Conversation view state
//!
//! Owns the visible message list for one open conversation. Lifecycle is
//! `Closed -> Connecting -> Open -> Closed`; there is no reconnecting state.
//! Messages are appended in arrival order and never reordered.
//!
//! Sends are optimistic: the locally authored record is appended before the
//! transport confirms anything. When the server echoes the sender's own
//! message back over the receive channel, the echo is reconciled against the
//! oldest pending optimistic record with the same content and replaces it in
//! place, so the list never shows the same send twice. The wire contract
//! cannot carry a client correlation id, so sender + content is the match
//! key.

use serde_json::Value;

use crate::models::{ChatParticipant, MessageData, UserData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Closed,
    Connecting,
    Open,
}

/// What happened to an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Belongs to a different conversation; dropped.
    Ignored,
    /// Echo of our own optimistic send; replaced the pending record.
    Reconciled,
    /// New message appended to the visible list.
    Appended,
}

pub struct ConversationView {
    chat_id: String,
    viewer: UserData,
    state: ViewState,
    messages: Vec<MessageData>,
    /// Correlation ids of optimistic sends awaiting their server echo,
    /// oldest first.
    pending: Vec<String>,
}

impl ConversationView {
    pub fn new(chat_id: impl Into<String>, viewer: UserData) -> Self {
        Self {
            chat_id: chat_id.into(),
            viewer,
            state: ViewState::Closed,
            messages: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn messages(&self) -> &[MessageData] {
        &self.messages
    }

    pub fn begin_connect(&mut self) {
        self.state = ViewState::Connecting;
    }

    pub fn mark_open(&mut self) {
        self.state = ViewState::Open;
    }

    /// Unconditional teardown on view close.
    pub fn close(&mut self) {
        self.state = ViewState::Closed;
        self.pending.clear();
    }

    /// Replace the list with fetched history (once per conversation open).
    pub fn load_history(&mut self, messages: Vec<MessageData>) {
        self.messages = messages;
        self.pending.clear();
    }

    /// Synthesize and append the optimistic record for a send, returning the
    /// record and the `send_message` payload to emit.
    pub fn compose(&mut self, content: &str) -> (MessageData, Value) {
        let correlation_id = uuid::Uuid::new_v4().to_string();
        let message = MessageData {
            id: correlation_id.clone(),
            chat_id: self.chat_id.clone(),
            sender_id: self.viewer.id.clone(),
            content: content.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            read: false,
            sender: Some(ChatParticipant {
                id: self.viewer.id.clone(),
                name: self.viewer.name.clone(),
                image: self.viewer.image.clone(),
            }),
        };

        self.pending.push(correlation_id);
        self.messages.push(message.clone());

        let payload = serde_json::json!({
            "chatId": self.chat_id,
            "content": content,
        });
        (message, payload)
    }

    /// Apply an inbound `receive_message` event.
    pub fn on_receive(&mut self, message: MessageData) -> Delivery {
        if message.chat_id != self.chat_id {
            return Delivery::Ignored;
        }

        if message.sender_id == self.viewer.id {
            if let Some(slot) = self.take_pending(&message.content) {
                self.messages[slot] = message;
                return Delivery::Reconciled;
            }
        }

        self.messages.push(message);
        Delivery::Appended
    }

    /// Oldest pending optimistic record matching this content, removed from
    /// the pending set; returns its position in the message list.
    fn take_pending(&mut self, content: &str) -> Option<usize> {
        let (pending_idx, slot) = self.pending.iter().enumerate().find_map(|(i, id)| {
            self.messages
                .iter()
                .position(|m| m.id == *id && m.content == content)
                .map(|slot| (i, slot))
        })?;

        self.pending.remove(pending_idx);
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer() -> UserData {
        serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "pat@example.com",
            "name": "Pat",
            "role": "USER",
        }))
        .unwrap()
    }

    fn inbound(chat_id: &str, sender_id: &str, content: &str) -> MessageData {
        MessageData {
            id: format!("srv-{}", content),
            chat_id: chat_id.to_string(),
            sender_id: sender_id.to_string(),
            content: content.to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            read: false,
            sender: None,
        }
    }

    #[test]
    fn lifecycle_has_no_reconnecting_state() {
        let mut view = ConversationView::new("c1", viewer());
        assert_eq!(view.state(), ViewState::Closed);
        view.begin_connect();
        assert_eq!(view.state(), ViewState::Connecting);
        view.mark_open();
        assert_eq!(view.state(), ViewState::Open);
        view.close();
        assert_eq!(view.state(), ViewState::Closed);
    }

    #[test]
    fn compose_appends_optimistic_record() {
        let mut view = ConversationView::new("c1", viewer());
        let (message, payload) = view.compose("hello");

        assert_eq!(view.messages().len(), 1);
        assert_eq!(message.sender_id, "u1");
        assert!(!message.read);
        assert_eq!(payload, serde_json::json!({"chatId": "c1", "content": "hello"}));
    }

    #[test]
    fn own_echo_is_reconciled_not_duplicated() {
        let mut view = ConversationView::new("c1", viewer());
        view.compose("hello");

        let delivery = view.on_receive(inbound("c1", "u1", "hello"));
        assert_eq!(delivery, Delivery::Reconciled);

        // One visible entry, now carrying the server-assigned id.
        assert_eq!(view.messages().len(), 1);
        assert_eq!(view.messages()[0].id, "srv-hello");
    }

    #[test]
    fn repeated_echo_appends_after_reconcile() {
        let mut view = ConversationView::new("c1", viewer());
        view.compose("hello");

        assert_eq!(view.on_receive(inbound("c1", "u1", "hello")), Delivery::Reconciled);
        // No pending record left: a second identical echo is a new message.
        assert_eq!(view.on_receive(inbound("c1", "u1", "hello")), Delivery::Appended);
        assert_eq!(view.messages().len(), 2);
    }

    #[test]
    fn duplicate_sends_reconcile_oldest_first() {
        let mut view = ConversationView::new("c1", viewer());
        let (first, _) = view.compose("hi");
        let (second, _) = view.compose("hi");
        assert_ne!(first.id, second.id);

        view.on_receive(inbound("c1", "u1", "hi"));
        // The oldest optimistic record was replaced; the newer one remains.
        assert_eq!(view.messages()[0].id, "srv-hi");
        assert_eq!(view.messages()[1].id, second.id);
    }

    #[test]
    fn counterpart_message_appends() {
        let mut view = ConversationView::new("c1", viewer());
        view.compose("hello");

        let delivery = view.on_receive(inbound("c1", "d1", "hi there"));
        assert_eq!(delivery, Delivery::Appended);
        assert_eq!(view.messages().len(), 2);
    }

    #[test]
    fn foreign_chat_id_is_ignored() {
        let mut view = ConversationView::new("c1", viewer());
        let delivery = view.on_receive(inbound("c2", "d1", "wrong room"));
        assert_eq!(delivery, Delivery::Ignored);
        assert!(view.messages().is_empty());
    }

    #[test]
    fn history_load_replaces_list_in_order() {
        let mut view = ConversationView::new("c1", viewer());
        view.load_history(vec![
            inbound("c1", "d1", "first"),
            inbound("c1", "u1", "second"),
        ]);
        assert_eq!(view.messages().len(), 2);
        assert_eq!(view.messages()[0].content, "first");
        assert_eq!(view.messages()[1].content, "second");
    }
}
