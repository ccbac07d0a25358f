//! Socket.IO v4 text framing over Engine.IO v4
//!
//! The chat service speaks Socket.IO: an Engine.IO packet-type digit,
//! optionally a Socket.IO packet-type digit, then a JSON payload.
//! Relevant frames:
//!   `0{...}`  engine open (handshake JSON: sid, ping intervals)
//!   `2` / `3` ping / pong (server pings, client must pong)
//!   `40{...}` namespace connect (client sends auth payload; server acks)
//!   `41`      namespace disconnect
//!   `42["event",{...}]` event, optionally with an ack id: `42<id>[...]`
//!   `44{...}` connect error

use serde_json::Value;

/// Client pong answering a server ping.
pub const PONG: &str = "3";

/// A parsed inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Engine.IO handshake with session parameters.
    Open(Value),
    Ping,
    Pong,
    /// Namespace connect acknowledged.
    Connected(Value),
    /// Namespace connect refused (bad auth).
    ConnectError(Value),
    Disconnect,
    /// An application event: name plus first argument.
    Event { name: String, data: Value },
    /// Anything we don't handle (acks, binary placeholders, upgrades).
    Other(String),
}

/// Parse one websocket text frame.
pub fn parse(frame: &str) -> Packet {
    let mut chars = frame.chars();
    match chars.next() {
        Some('0') => Packet::Open(json_or_null(&frame[1..])),
        Some('2') => Packet::Ping,
        Some('3') => Packet::Pong,
        Some('4') => parse_socketio(&frame[1..]),
        _ => Packet::Other(frame.to_string()),
    }
}

fn parse_socketio(rest: &str) -> Packet {
    let mut chars = rest.chars();
    match chars.next() {
        Some('0') => Packet::Connected(json_or_null(&rest[1..])),
        Some('1') => Packet::Disconnect,
        Some('2') => parse_event(&rest[1..]),
        Some('4') => Packet::ConnectError(json_or_null(&rest[1..])),
        _ => Packet::Other(format!("4{}", rest)),
    }
}

/// Parse an event body: optional ack id digits, then a JSON array whose first
/// element is the event name.
fn parse_event(body: &str) -> Packet {
    let json_start = body.find('[');
    let Some(start) = json_start else {
        return Packet::Other(format!("42{}", body));
    };
    // Anything before the array must be an ack id.
    if !body[..start].chars().all(|c| c.is_ascii_digit()) {
        return Packet::Other(format!("42{}", body));
    }

    let Ok(Value::Array(mut args)) = serde_json::from_str::<Value>(&body[start..]) else {
        return Packet::Other(format!("42{}", body));
    };
    if args.is_empty() {
        return Packet::Other(format!("42{}", body));
    }

    let Value::String(name) = args.remove(0) else {
        return Packet::Other(format!("42{}", body));
    };
    let data = if args.is_empty() {
        Value::Null
    } else {
        args.remove(0)
    };

    Packet::Event { name, data }
}

fn json_or_null(s: &str) -> Value {
    if s.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(s).unwrap_or(Value::Null)
    }
}

/// Namespace connect frame carrying the auth payload.
pub fn encode_connect(auth: Option<&Value>) -> String {
    match auth {
        Some(auth) => format!("40{}", auth),
        None => "40".to_string(),
    }
}

/// Event frame: `42["name",data]`.
pub fn encode_event(name: &str, data: &Value) -> String {
    format!(
        "42{}",
        Value::Array(vec![Value::String(name.to_string()), data.clone()])
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_open_handshake() {
        let packet = parse(r#"0{"sid":"abc","pingInterval":25000,"pingTimeout":20000}"#);
        let Packet::Open(v) = packet else {
            panic!("expected open");
        };
        assert_eq!(v["sid"], "abc");
    }

    #[test]
    fn parses_ping_and_pong() {
        assert_eq!(parse("2"), Packet::Ping);
        assert_eq!(parse("3"), Packet::Pong);
    }

    #[test]
    fn parses_connect_ack_and_error() {
        assert_eq!(
            parse(r#"40{"sid":"xyz"}"#),
            Packet::Connected(serde_json::json!({"sid": "xyz"}))
        );
        let Packet::ConnectError(v) = parse(r#"44{"message":"unauthorized"}"#) else {
            panic!("expected connect error");
        };
        assert_eq!(v["message"], "unauthorized");
        assert_eq!(parse("41"), Packet::Disconnect);
    }

    #[test]
    fn parses_event() {
        let packet = parse(r#"42["receive_message",{"chatId":"c1","content":"hi"}]"#);
        let Packet::Event { name, data } = packet else {
            panic!("expected event");
        };
        assert_eq!(name, "receive_message");
        assert_eq!(data["chatId"], "c1");
        assert_eq!(data["content"], "hi");
    }

    #[test]
    fn parses_event_with_ack_id() {
        let packet = parse(r#"4213["receive_message",{"chatId":"c1"}]"#);
        let Packet::Event { name, .. } = packet else {
            panic!("expected event");
        };
        assert_eq!(name, "receive_message");
    }

    #[test]
    fn event_without_array_is_other() {
        assert!(matches!(parse("42garbage"), Packet::Other(_)));
        assert!(matches!(parse("42[]"), Packet::Other(_)));
    }

    #[test]
    fn encode_event_round_trips() {
        let payload = serde_json::json!({"chatId": "c1", "content": "hello"});
        let frame = encode_event("send_message", &payload);
        let Packet::Event { name, data } = parse(&frame) else {
            panic!("expected event");
        };
        assert_eq!(name, "send_message");
        assert_eq!(data, payload);
    }

    #[test]
    fn encode_connect_carries_auth() {
        let auth = serde_json::json!({"token": "t1"});
        let frame = encode_connect(Some(&auth));
        assert!(frame.starts_with("40{"));
        let Packet::Connected(v) = parse(&frame) else {
            panic!("expected connect");
        };
        assert_eq!(v["token"], "t1");
    }
}
