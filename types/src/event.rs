use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Event tags written by the gateway itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    GateRelease,
    FuzzPhase,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::GateRelease => "gate_release",
            EventKind::FuzzPhase => "fuzz_phase",
        }
    }
}

/// One ledger entry. Immutable once appended.
///
/// Stored entries are kept exactly as loaded: `type` and `payload` may be
/// absent, and any other fields ride along in `extra` so a save writes them
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    kind: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

static NO_PAYLOAD: Value = Value::Null;

/// A key that is present maps to `Some`, even when its value is `null`.
fn present<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(de).map(Some)
}

impl Event {
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: Some(Value::String(kind.into())),
            payload: Some(payload),
            extra: Map::new(),
        }
    }

    /// The event tag, or `""` for a stored entry without a string tag.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.kind.as_ref().and_then(Value::as_str).unwrap_or_default()
    }

    /// The payload, or `null` for a stored entry without one.
    #[must_use]
    pub fn payload(&self) -> &Value {
        self.payload.as_ref().unwrap_or(&NO_PAYLOAD)
    }

    /// Fields other than `type` and `payload`.
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    #[must_use]
    pub fn is(&self, kind: EventKind) -> bool {
        self.kind() == kind.as_str()
    }
}
