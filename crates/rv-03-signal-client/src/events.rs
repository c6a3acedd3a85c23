//! Decoding of relay-to-client envelopes into typed events.

use crate::error::ClientError;
use rv_01_session_registry::SessionId;
use serde_json::{Map, Value};

/// Payload field carrying the session description of an offer
pub const OFFER_FIELD: &str = "offer";
/// Payload field carrying the session description of an answer
pub const ANSWER_FIELD: &str = "answer";
/// Payload field carrying an ICE candidate
pub const ICE_FIELD: &str = "iceCandidate";

/// Contents of the relay's first message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Welcome {
    /// Identity the relay assigned to this client
    pub id: SessionId,
    /// Sessions that were already connected
    pub peers: Vec<SessionId>,
}

/// Something the relay told this client.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerEvent {
    Welcome(Welcome),
    PeerAdded(SessionId),
    PeerRemoved(SessionId),
    Offer {
        src: SessionId,
        offer: Value,
    },
    Answer {
        src: SessionId,
        answer: Value,
    },
    Ice {
        src: SessionId,
        candidate: Value,
    },
    /// Any other forwarded type, fields untouched
    Other {
        kind: String,
        src: Option<SessionId>,
        fields: Map<String, Value>,
    },
}

impl PeerEvent {
    pub fn kind(&self) -> &str {
        match self {
            PeerEvent::Welcome(_) => "welcome",
            PeerEvent::PeerAdded(_) => "addPeer",
            PeerEvent::PeerRemoved(_) => "removePeer",
            PeerEvent::Offer { .. } => "offer",
            PeerEvent::Answer { .. } => "answer",
            PeerEvent::Ice { .. } => "ice",
            PeerEvent::Other { kind, .. } => kind,
        }
    }

    /// Decode one text frame from the relay.
    pub fn decode(text: &str) -> Result<Self, ClientError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(mut fields) = value else {
            return Err(ClientError::Malformed("envelope is not an object".into()));
        };

        let kind = match fields.remove("type") {
            Some(Value::String(kind)) => kind,
            _ => return Err(ClientError::Malformed("envelope has no string `type`".into())),
        };

        let event = match kind.as_str() {
            "welcome" => {
                let id = serde_json::from_value(fields.remove("id").unwrap_or(Value::Null))?;
                let peers = match fields.remove("peers") {
                    Some(peers) => serde_json::from_value(peers)?,
                    None => Vec::new(),
                };
                PeerEvent::Welcome(Welcome { id, peers })
            }
            "addPeer" => PeerEvent::PeerAdded(take_src(&mut fields, &kind)?),
            "removePeer" => PeerEvent::PeerRemoved(take_src(&mut fields, &kind)?),
            "offer" => PeerEvent::Offer {
                src: take_src(&mut fields, &kind)?,
                offer: fields.remove(OFFER_FIELD).unwrap_or(Value::Null),
            },
            "answer" => PeerEvent::Answer {
                src: take_src(&mut fields, &kind)?,
                answer: fields.remove(ANSWER_FIELD).unwrap_or(Value::Null),
            },
            "ice" => PeerEvent::Ice {
                src: take_src(&mut fields, &kind)?,
                candidate: fields.remove(ICE_FIELD).unwrap_or(Value::Null),
            },
            _ => {
                let src = match fields.remove("src") {
                    Some(Value::String(src)) => Some(SessionId::new(src)),
                    _ => None,
                };
                PeerEvent::Other { kind, src, fields }
            }
        };

        Ok(event)
    }
}

fn take_src(fields: &mut Map<String, Value>, kind: &str) -> Result<SessionId, ClientError> {
    match fields.remove("src") {
        Some(Value::String(src)) => Ok(SessionId::new(src)),
        _ => Err(ClientError::MissingSource(kind.to_string())),
    }
}
