//! Bus messages.
//!
//! Everything delivered to a handler is a [`Notice`]: the key it was
//! published under plus one of three payload shapes. Module-raised data
//! rides as [`serde_json::Value`]; interaction delegates and the runtime's
//! error containment publish their own typed records.

use crate::{EventKey, InteractionNotice};
use serde_json::Value;
use trellis_types::Fault;

/// Payload of a notice.
#[derive(Debug, Clone, PartialEq)]
pub enum NoticePayload {
    /// Arbitrary structured data raised through a module context.
    Data(Value),
    /// A low-level interaction re-emitted by an interaction delegate.
    Interaction(InteractionNotice),
    /// A failure contained by the runtime's error policy.
    Fault(Fault),
}

impl NoticePayload {
    /// Returns the data value, if this is a data notice.
    #[must_use]
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the interaction record, if this is an interaction notice.
    #[must_use]
    pub fn as_interaction(&self) -> Option<&InteractionNotice> {
        match self {
            Self::Interaction(interaction) => Some(interaction),
            _ => None,
        }
    }

    /// Returns the fault record, if this is a fault notice.
    #[must_use]
    pub fn as_fault(&self) -> Option<&Fault> {
        match self {
            Self::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<Value> for NoticePayload {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

/// One delivered bus message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Key the notice was published under.
    pub key: EventKey,
    /// The payload.
    pub payload: NoticePayload,
}

impl Notice {
    /// Creates a notice.
    #[must_use]
    pub fn new(key: EventKey, payload: NoticePayload) -> Self {
        Self { key, payload }
    }
}
