//! Channel service: create, delete, and list channels across all bosses.
//!
//! DESIGN
//! ======
//! A channel is one roster entry shared by every boss type. Create and
//! delete are the only operations that span boss types, and they are not
//! atomic across maps: readers may briefly see a rostered channel with some
//! per-boss entries still missing. Snapshot reads fill those with zero
//! values, so the relaxed ordering is tolerated rather than locked away.
//!
//! Create is non-destructive. Re-creating an existing channel keeps its
//! state, and hydra spawn durations are seeded from any saved settings.
//! State written before the channel existed gains the missing defaults.

use tracing::info;

use crate::frame::Data;
use crate::message::{MESSAGE_TYPE, MessageType};
use crate::model::{BOSS_TYPES, ChannelState, HYDRA_TYPES};
use crate::store::RaidStore;

/// Add a channel to the roster and materialize its state under every boss.
pub fn create_channel(store: &RaidStore, channel_id: &str) {
    let added = store.enroll(channel_id);
    for hydra_type in HYDRA_TYPES {
        store.seed_spawn_minutes(channel_id, hydra_type);
    }
    for boss_type in BOSS_TYPES {
        let initial = ChannelState::initial(boss_type, |hydra_type| store.spawn_minutes(channel_id, hydra_type));
        store.materialize(boss_type, channel_id, initial);
    }
    info!(%channel_id, added, "channel created");
}

/// Remove a channel from the roster and purge its state and cards.
///
/// Spawn settings survive unless `purge_spawn_settings` is set, so a channel
/// re-created under the same id gets its saved durations back.
pub fn delete_channel(store: &RaidStore, channel_id: &str, purge_spawn_settings: bool) {
    let removed = store.unenroll(channel_id);
    store.purge(channel_id);
    if purge_spawn_settings {
        store.purge_spawn_settings(channel_id);
    }
    info!(%channel_id, removed, purge_spawn_settings, "channel deleted");
}

/// CHANNEL_LIST payload: the roster under each boss token.
#[must_use]
pub fn channel_list(store: &RaidStore) -> Data {
    let mut data = Data::new();
    data.insert(MESSAGE_TYPE.into(), MessageType::ChannelList.into());
    data.insert("bossChannels".into(), serde_json::json!(store.boss_channels()));
    data
}

#[cfg(test)]
#[path = "channel_test.rs"]
mod tests;
