//! Snapshot service: full-state sync for joining or resyncing clients.
//!
//! The snapshot is unfiltered: every client receives every boss and channel
//! regardless of what it is viewing. It is delivered to the requester only.

use serde::Serialize;

use crate::frame::Data;
use crate::message::{MESSAGE_TYPE, MessageType};
use crate::store::{BossChannels, FullState, RaidStore};

/// Deep-copied point-in-time view of the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub full_state: FullState,
    pub boss_channels: BossChannels,
}

#[must_use]
pub fn capture(store: &RaidStore) -> Snapshot {
    Snapshot { full_state: store.full_state(), boss_channels: store.boss_channels() }
}

/// STATE_SYNC payload for a sync reply.
#[must_use]
pub fn sync_payload(store: &RaidStore) -> Data {
    let snapshot = capture(store);
    let mut data = Data::new();
    data.insert(MESSAGE_TYPE.into(), MessageType::StateSync.into());
    data.insert("fullState".into(), serde_json::json!(snapshot.full_state));
    data.insert("bossChannels".into(), serde_json::json!(snapshot.boss_channels));
    data
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
