//! Raid message schema and publish/subscribe addressing.
//!
//! DESIGN
//! ======
//! Every `boss:*` request shares one flat payload schema. `RaidMessage` is
//! a typed read of a frame's `data`; the raw `data` map is what gets
//! republished, so fields this server does not know about still reach
//! subscribers.

use serde::Deserialize;

use crate::frame::Data;
use crate::model::HYDRA;

// =============================================================================
// MESSAGE KIND
// =============================================================================

/// Data key carrying the outbound message kind.
pub const MESSAGE_TYPE: &str = "type";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    ChannelList,
    StateChange,
    StateSync,
}

impl MessageType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChannelList => "CHANNEL_LIST",
            Self::StateChange => "STATE_CHANGE",
            Self::StateSync => "STATE_SYNC",
        }
    }
}

impl From<MessageType> for serde_json::Value {
    fn from(kind: MessageType) -> Self {
        serde_json::Value::String(kind.as_str().to_string())
    }
}

// =============================================================================
// INBOUND PAYLOAD
// =============================================================================

/// Card index as sent by clients: usually a number, sometimes a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CardIndex {
    Number(i64),
    Text(String),
}

impl CardIndex {
    /// Store key for this index.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidMessage {
    pub channel_id: Option<String>,
    pub boss_type: Option<String>,
    pub card_index: Option<CardIndex>,
    pub checked: Option<bool>,
    pub color: Option<String>,
    pub memo: Option<String>,
    pub status: Option<String>,
    pub dragon_type: Option<String>,
    pub hydra_type: Option<String>,
    pub caught_time: Option<String>,
    pub spawn_time: Option<i64>,
    /// Signed so an out-of-range value reaches the handler, which rejects it.
    pub spawn_minutes: Option<i64>,
}

impl RaidMessage {
    /// Typed view of a frame payload. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns the serde error when a known key has the wrong JSON type.
    pub fn from_data(data: &Data) -> Result<Self, serde_json::Error> {
        let object: serde_json::Map<String, serde_json::Value> =
            data.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        serde_json::from_value(serde_json::Value::Object(object))
    }
}

// =============================================================================
// TOPICS
// =============================================================================

/// Roster changes.
pub const CHANNELS_TOPIC: &str = "boss-raid/channels";

/// Card operations for one (boss, channel).
#[must_use]
pub fn card_topic(boss_type: &str, channel_id: &str) -> String {
    format!("boss-raid/{boss_type}/{channel_id}")
}

/// Channel-level operations for one boss.
#[must_use]
pub fn channel_state_topic(boss_type: &str) -> String {
    format!("boss-raid/channel-state/{boss_type}")
}

/// Spawn settings always publish under the hydra boss.
#[must_use]
pub fn spawn_settings_topic() -> String {
    channel_state_topic(HYDRA)
}

// =============================================================================
// PUBLICATION
// =============================================================================

/// A payload addressed to a topic.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub topic: String,
    pub data: Data,
}

impl Publication {
    /// Republish an inbound payload as a state change.
    #[must_use]
    pub fn state_change(topic: String, payload: &Data) -> Self {
        let mut data = payload.clone();
        data.insert(MESSAGE_TYPE.into(), MessageType::StateChange.into());
        Self { topic, data }
    }
}

#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
