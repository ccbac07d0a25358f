//! Realtime chat channel
//!
//! One websocket per open conversation view, torn down unconditionally when
//! the view closes. No reconnection, no backlog replay, no delivery
//! acknowledgment: delivery is best-effort by design.

pub mod conversation;
pub mod frame;
pub mod socket;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::{chat, ApiClient};
use conversation::{ConversationView, Delivery};
use socket::ChatSocket;

/// Open a conversation: print history, then run the interactive loop
/// (stdin lines out, inbound events in) until EOF, Ctrl-C, or disconnect.
pub async fn open_conversation(client: &ApiClient, chat_id: &str) -> Result<()> {
    let (viewer, token) = {
        let session = client.session().lock().unwrap();
        let viewer = session.user().context("Not logged in")?;
        let token = session.token().context("Not logged in")?;
        (viewer, token)
    };

    let mut view = ConversationView::new(chat_id, viewer);

    // History is fetched once per conversation open.
    let history = chat::chat_messages_data(client, chat_id).await?;
    view.load_history(history);
    for msg in view.messages() {
        print_message(msg);
    }

    view.begin_connect();
    let mut ws = ChatSocket::connect(client.base_url(), &token).await?;
    view.mark_open();

    println!("Connected. Type a message and press Enter. (Ctrl-C to leave)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = ws.next_event() => {
                match event {
                    Ok(Some((name, payload))) => {
                        if name != "receive_message" {
                            tracing::debug!("Event (ignored): {}", name);
                            continue;
                        }
                        let message: crate::models::MessageData =
                            match serde_json::from_value(payload) {
                                Ok(message) => message,
                                Err(e) => {
                                    tracing::warn!("Unparseable receive_message payload: {:#}", e);
                                    continue;
                                }
                            };
                        if view.on_receive(message) == Delivery::Appended {
                            if let Some(last) = view.messages().last() {
                                print_message(last);
                            }
                        }
                    }
                    Ok(None) => {
                        println!("Disconnected from chat.");
                        break;
                    }
                    Err(e) => {
                        println!("Disconnected from chat: {:#}", e);
                        break;
                    }
                }
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let content = line.trim();
                        if content.is_empty() {
                            continue;
                        }
                        // Optimistic: the record is visible before the frame
                        // is even written; a lost send is not detected.
                        let (_message, payload) = view.compose(content);
                        if let Err(e) = ws.emit("send_message", &payload).await {
                            println!("Disconnected from chat: {:#}", e);
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("stdin error: {:#}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    view.close();
    println!("Chat closed.");
    Ok(())
}

fn print_message(msg: &crate::models::MessageData) {
    let sender = msg
        .sender
        .as_ref()
        .map(|s| s.name.as_str())
        .unwrap_or(msg.sender_id.as_str());
    println!("[{}] {}: {}", msg.created_at, sender, msg.content);
}
