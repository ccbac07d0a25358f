//! Chat REST endpoints (/api/chat)
//!
//! History retrieval and lazy conversation creation. Live delivery runs over
//! the realtime channel (see `crate::realtime`); these endpoints cover the
//! request/response half of the chat surface.

use anyhow::Result;
use serde::Deserialize;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{ChatData, MessageData};

#[derive(Debug, Deserialize)]
struct ChatsEnvelope {
    chats: Vec<ChatData>,
}

#[derive(Debug, Deserialize)]
struct ChatEnvelope {
    chat: ChatHistory,
}

#[derive(Debug, Deserialize)]
struct ChatHistory {
    #[serde(default)]
    messages: Vec<MessageData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateChatEnvelope {
    chat_id: String,
}

/// GET /api/chat: the current user's conversations.
pub async fn list_chats_data(client: &ApiClient) -> Result<Vec<ChatData>, ApiError> {
    let resp = client.get("/api/chat").await?;
    let body: ChatsEnvelope = client.decode(resp, "/api/chat").await?;
    Ok(body.chats)
}

/// GET /api/chat/:id/messages: full history, fetched once per conversation
/// open.
pub async fn chat_messages_data(
    client: &ApiClient,
    chat_id: &str,
) -> Result<Vec<MessageData>, ApiError> {
    let path = format!("/api/chat/{}/messages", chat_id);
    let resp = client.get(&path).await?;
    let body: ChatEnvelope = client.decode(resp, &path).await?;
    Ok(body.chat.messages)
}

/// POST /api/chat: returns the conversation with the given dermatologist,
/// creating it server-side if it does not already exist. Idempotent from the
/// caller's perspective; no client-side existence check.
pub async fn create_chat_data(
    client: &ApiClient,
    dermatologist_id: &str,
) -> Result<String, ApiError> {
    let body = serde_json::json!({ "dermatologistId": dermatologist_id });
    let resp = client.post_json("/api/chat", &body).await?;
    let body: CreateChatEnvelope = client.decode(resp, "/api/chat").await?;
    Ok(body.chat_id)
}

/// List conversations.
pub async fn list_chats(client: &ApiClient) -> Result<()> {
    let viewer_id = client
        .session()
        .lock()
        .unwrap()
        .user()
        .map(|u| u.id)
        .unwrap_or_default();
    let chats = list_chats_data(client).await?;

    if chats.is_empty() {
        println!("(no conversations yet)");
        return Ok(());
    }

    println!("\nConversations:");
    println!("{:-<60}", "");
    for chat in &chats {
        let counterpart = chat.counterpart(&viewer_id);
        println!("{}", counterpart.name);
        println!("  ID: {}", chat.id);
        if let Some(last) = chat.messages.last() {
            println!("  Last: [{}] {}", last.created_at, last.content);
        }
        println!();
    }
    Ok(())
}

/// Print a conversation's history.
pub async fn read_messages(client: &ApiClient, chat_id: &str) -> Result<()> {
    let viewer_id = client
        .session()
        .lock()
        .unwrap()
        .user()
        .map(|u| u.id)
        .unwrap_or_default();
    let messages = chat_messages_data(client, chat_id).await?;

    if messages.is_empty() {
        println!("(no messages)");
        return Ok(());
    }

    for msg in &messages {
        let sender = if msg.sender_id == viewer_id {
            "me".to_string()
        } else {
            msg.sender
                .as_ref()
                .map(|s| s.name.clone())
                .unwrap_or_else(|| msg.sender_id.clone())
        };
        let unread = if msg.read || msg.sender_id == viewer_id {
            " "
        } else {
            "*"
        };
        println!("{}[{}] {}: {}", unread, msg.created_at, sender, msg.content);
    }
    Ok(())
}

/// Open (or create) the conversation with a dermatologist and print its id.
pub async fn create_chat(client: &ApiClient, dermatologist_id: &str) -> Result<()> {
    let chat_id = create_chat_data(client, dermatologist_id).await?;
    println!("Conversation ID: {}", chat_id);
    println!("Run 'derm-cli open {}' to chat.", chat_id);
    Ok(())
}
