//! Routing envelopes.
//!
//! Outbound traffic is either one of the three control messages the relay
//! originates, or an opaque negotiation message forwarded on behalf of a
//! client. The relay only ever looks at `type`, `target` and `src`; every
//! other field passes through untouched.
//!
//! ```text
//! welcome:    { "type": "welcome",    "id": <id>, "peers": [<id>, ...] }
//! addPeer:    { "type": "addPeer",    "src": <id> }
//! removePeer: { "type": "removePeer", "src": <id> }
//! forwarded:  { "type": <original>,   "src": <id>, ...opaque fields }
//! ```

use rv_01_session_registry::SessionId;
use serde_json::{Map, Value};

pub const TYPE_FIELD: &str = "type";
pub const TARGET_FIELD: &str = "target";
pub const SRC_FIELD: &str = "src";

/// Message sent from the relay to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// First message on every connection
    Welcome {
        id: SessionId,
        peers: Vec<SessionId>,
    },
    /// Another session joined
    AddPeer { src: SessionId },
    /// Another session left
    RemovePeer { src: SessionId },
    /// Negotiation message relayed from `src`
    Forward(ForwardedEnvelope),
}

impl Envelope {
    pub fn kind(&self) -> &str {
        match self {
            Envelope::Welcome { .. } => "welcome",
            Envelope::AddPeer { .. } => "addPeer",
            Envelope::RemovePeer { .. } => "removePeer",
            Envelope::Forward(forwarded) => &forwarded.kind,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Envelope::Welcome { id, peers } => serde_json::json!({
                "type": "welcome",
                "id": id,
                "peers": peers,
            }),
            Envelope::AddPeer { src } => serde_json::json!({
                "type": "addPeer",
                "src": src,
            }),
            Envelope::RemovePeer { src } => serde_json::json!({
                "type": "removePeer",
                "src": src,
            }),
            Envelope::Forward(forwarded) => forwarded.to_value(),
        }
    }

    /// Serialize to the JSON text frame sent on the wire
    pub fn encode(&self) -> String {
        self.to_value().to_string()
    }
}

/// Negotiation message as delivered to its target.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardedEnvelope {
    pub kind: String,
    pub src: SessionId,
    /// Opaque payload fields (never contains `type`, `src` or `target`)
    pub fields: Map<String, Value>,
}

impl ForwardedEnvelope {
    fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert(TYPE_FIELD.to_string(), Value::String(self.kind.clone()));
        object.insert(
            SRC_FIELD.to_string(),
            Value::String(self.src.as_str().to_string()),
        );
        Value::Object(object)
    }
}

/// Inbound envelope from a session, decoded just far enough to route it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEnvelope {
    pub target: SessionId,
    pub kind: String,
    /// Remaining fields. Any client-supplied `src` has already been dropped.
    pub fields: Map<String, Value>,
}

impl RoutedEnvelope {
    /// Decode an inbound text frame.
    pub fn parse(text: &str) -> Result<Self, EnvelopeError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(mut fields) = value else {
            return Err(EnvelopeError::NotAnObject);
        };

        let target = take_string(&mut fields, TARGET_FIELD)?;
        let kind = take_string(&mut fields, TYPE_FIELD)?;
        fields.remove(SRC_FIELD);

        Ok(Self {
            target: SessionId::new(target),
            kind,
            fields,
        })
    }

    /// Stamp the sender identity and build the envelope for the target.
    pub fn into_forward(self, src: SessionId) -> Envelope {
        Envelope::Forward(ForwardedEnvelope {
            kind: self.kind,
            src,
            fields: self.fields,
        })
    }
}

fn take_string(
    fields: &mut Map<String, Value>,
    key: &'static str,
) -> Result<String, EnvelopeError> {
    match fields.remove(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(EnvelopeError::InvalidField(key)),
        None => Err(EnvelopeError::MissingField(key)),
    }
}

/// Reasons an inbound frame cannot be routed.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("undecodable envelope: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("envelope is not a JSON object")]
    NotAnObject,
    #[error("envelope missing `{0}` field")]
    MissingField(&'static str),
    #[error("envelope field `{0}` must be a string")]
    InvalidField(&'static str),
}
