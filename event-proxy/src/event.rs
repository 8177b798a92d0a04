//! Conference lifecycle events and their relayed shape.
//!
//! The conference server posts its full event document; downstream only
//! needs the event name plus who or what it is about:
//!
//! ```text
//! POST /events/occupant/joined  {"room_name": "...", "occupant": {"name": "ada", ...}}
//!   → {"event": "occupant joined", "username": "ada"}
//!
//! POST /events/room/created     {"room_name": "standup", ...}
//!   → {"event": "room created", "room": "standup"}
//! ```

use serde_json::{Map, Value};
use sidecar_core::{ServiceError, ServiceResult};
use std::fmt;

/// The four relayed event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A participant entered a room.
    OccupantJoined,
    /// A participant left a room.
    OccupantLeft,
    /// A room was opened.
    RoomCreated,
    /// A room was closed.
    RoomDestroyed,
}

impl EventKind {
    /// Every kind, in path order.
    pub const ALL: [Self; 4] = [
        Self::OccupantJoined,
        Self::OccupantLeft,
        Self::RoomCreated,
        Self::RoomDestroyed,
    ];

    /// Match an inbound request path exactly.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }

    /// Inbound path for this kind.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::OccupantJoined => "/events/occupant/joined",
            Self::OccupantLeft => "/events/occupant/left",
            Self::RoomCreated => "/events/room/created",
            Self::RoomDestroyed => "/events/room/destroyed",
        }
    }

    /// Value of the `event` field sent downstream.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OccupantJoined => "occupant joined",
            Self::OccupantLeft => "occupant left",
            Self::RoomCreated => "room created",
            Self::RoomDestroyed => "room destroyed",
        }
    }

    const fn subject_key(self) -> &'static str {
        match self {
            Self::OccupantJoined | Self::OccupantLeft => "username",
            Self::RoomCreated | Self::RoomDestroyed => "room",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An event ready to forward.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayEvent {
    /// What happened.
    pub kind: EventKind,
    /// Occupant name or room name, as sent. `None` when the inbound document
    /// did not carry it.
    pub subject: Option<Value>,
}

impl RelayEvent {
    /// Parse an inbound body and pick out the subject.
    ///
    /// # Errors
    ///
    /// `BadRequest` when the body is not JSON, is `null`, or an occupant
    /// event has no `occupant`.
    pub fn from_body(kind: EventKind, body: &[u8]) -> ServiceResult<Self> {
        let document: Value = serde_json::from_slice(body)
            .map_err(|e| ServiceError::bad_request(format!("unparsable {kind} event: {e}")))?;

        if document.is_null() {
            return Err(ServiceError::bad_request(format!("empty {kind} event")));
        }

        let subject = match kind {
            EventKind::OccupantJoined | EventKind::OccupantLeft => {
                match document.get("occupant") {
                    None | Some(Value::Null) => {
                        return Err(ServiceError::bad_request(format!(
                            "{kind} event without occupant"
                        )));
                    }
                    Some(occupant) => occupant.get("name").cloned(),
                }
            }
            EventKind::RoomCreated | EventKind::RoomDestroyed => document.get("room_name").cloned(),
        };

        Ok(Self { kind, subject })
    }

    /// The JSON document sent downstream.
    #[must_use]
    pub fn payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("event".to_string(), Value::from(self.kind.label()));
        if let Some(subject) = &self.subject {
            payload.insert(self.kind.subject_key().to_string(), subject.clone());
        }
        Value::Object(payload)
    }
}
