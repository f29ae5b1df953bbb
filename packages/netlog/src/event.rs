use core::fmt;

use serde::Serialize;

use crate::{clock::Timestamp, EVENT_RECORD_MAX, MESSAGE_MAX};

pub type Message = heapless::String<MESSAGE_MAX>;

/// One connectivity observation. Built, encoded and then discarded; only the
/// encoded [`EventRecord`] is kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub timestamp: Timestamp,
    pub link_up: bool,
    pub reachable: Option<bool>,
    pub message: Message,
}

// Collector field names live here and nowhere else.
#[derive(Serialize)]
struct WireEvent<'a> {
    #[serde(rename = "eventTime")]
    event_time: &'a str,
    #[serde(rename = "isConnected")]
    is_connected: bool,
    #[serde(rename = "isReachable", skip_serializing_if = "Option::is_none")]
    is_reachable: Option<bool>,
    message: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeError {
    RecordTooLarge,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecordTooLarge => f.write_str("event record exceeds buffer"),
        }
    }
}

impl Event {
    pub fn new(
        timestamp: Timestamp,
        link_up: bool,
        reachable: Option<bool>,
        message: &str,
    ) -> Self {
        Self {
            timestamp,
            link_up,
            reachable,
            message: truncated_message(message),
        }
    }

    pub fn encode(&self) -> Result<EventRecord, EncodeError> {
        let wire = WireEvent {
            event_time: self.timestamp.as_str(),
            is_connected: self.link_up,
            is_reachable: self.reachable,
            message: self.message.as_str(),
        };
        let mut buf = [0u8; EVENT_RECORD_MAX];
        let len =
            serde_json_core::to_slice(&wire, &mut buf).map_err(|_| EncodeError::RecordTooLarge)?;
        let text = core::str::from_utf8(&buf[..len]).map_err(|_| EncodeError::RecordTooLarge)?;
        let mut json = heapless::String::new();
        json.push_str(text).map_err(|_| EncodeError::RecordTooLarge)?;
        Ok(EventRecord(json))
    }
}

/// A serialized JSON event object, immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRecord(heapless::String<EVENT_RECORD_MAX>);

impl EventRecord {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn truncated_message(message: &str) -> Message {
    let mut end = message.len().min(MESSAGE_MAX);
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = Message::new();
    let _ = out.push_str(&message[..end]);
    out
}
