//! The message record relayed over the event channel.
//!
//! Records are owned by the persistence layer and travel as an opaque JSON
//! object. The only change made at ingestion is to `sender`/`receiver`: a
//! bare identity string becomes `{"_id": <identity>}`. Every other field,
//! including its type and formatting, is forwarded untouched.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};

use super::id::UserId;

const PARTICIPANT_FIELDS: [&str; 2] = ["sender", "receiver"];

/// A persisted chat message, as returned by the REST layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MessageRecord {
    fields: Map<String, Value>,
}

impl<'de> Deserialize<'de> for MessageRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self::from_fields)
    }
}

impl MessageRecord {
    /// Wrap a raw record, normalising its participants.
    pub fn from_fields(mut fields: Map<String, Value>) -> Self {
        for key in PARTICIPANT_FIELDS {
            if let Some(slot) = fields.get_mut(key)
                && slot.is_string()
            {
                let id = slot.take();
                *slot = json!({ "_id": id });
            }
        }
        Self { fields }
    }

    /// Build a plain text record between two identities, stamped now.
    pub fn text(
        sender: impl Into<UserId>,
        receiver: impl Into<UserId>,
        content: impl Into<String>,
    ) -> Self {
        let mut fields = Map::new();
        fields.insert("sender".into(), Value::String(sender.into().into_inner()));
        fields.insert("receiver".into(), Value::String(receiver.into().into_inner()));
        fields.insert("content".into(), Value::String(content.into()));
        fields.insert(
            "createdAt".into(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        Self::from_fields(fields)
    }

    /// Raw field lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Routing identity: `receiver._id`, when it is a string.
    pub fn receiver_id(&self) -> Option<UserId> {
        self.fields
            .get("receiver")?
            .get("_id")?
            .as_str()
            .map(UserId::from)
    }
}
