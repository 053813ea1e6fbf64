//! Update service: apply one raid mutation and address its republication.
//!
//! DESIGN
//! ======
//! One handler per field group. Each handler reads the payload, checks the
//! correlating keys it needs, mutates the store, and returns the inbound
//! payload tagged `STATE_CHANGE` together with the topic it belongs on.
//! A handler never sends anything itself; the websocket dispatch layer owns
//! publishing.
//!
//! Two addressing granularities coexist:
//! - card operations (check, color, memo) go to `boss-raid/{boss}/{channel}`;
//! - channel-wide operations go to `boss-raid/channel-state/{boss}`.
//!
//! A payload missing a required key is dropped: no mutation, no
//! publication, and nothing reported to the sender.

use std::collections::HashMap;

use tracing::debug;

use crate::frame::Data;
use crate::message::{Publication, RaidMessage, card_topic, channel_state_topic, spawn_settings_topic};
use crate::model::normalize_unset;
use crate::services::spawn;
use crate::store::RaidStore;

// =============================================================================
// CARD OPERATIONS
// =============================================================================

pub fn check_state(store: &RaidStore, payload: &Data) -> Option<Publication> {
    let msg = parse(payload, "check")?;
    let (Some(boss_type), Some(channel_id), Some(card), Some(checked)) =
        (&msg.boss_type, &msg.channel_id, &msg.card_index, msg.checked)
    else {
        return dropped("check");
    };

    store.card_mutate(boss_type, channel_id, &card.key(), |c| c.checked = checked);
    Some(Publication::state_change(card_topic(boss_type, channel_id), payload))
}

pub fn card_color(store: &RaidStore, payload: &Data) -> Option<Publication> {
    let msg = parse(payload, "color")?;
    let (Some(boss_type), Some(channel_id), Some(card)) = (&msg.boss_type, &msg.channel_id, &msg.card_index) else {
        return dropped("color");
    };

    let color = normalize_unset(msg.color.as_deref());
    store.card_mutate(boss_type, channel_id, &card.key(), |c| c.color = color);
    Some(Publication::state_change(card_topic(boss_type, channel_id), payload))
}

pub fn card_memo(store: &RaidStore, payload: &Data) -> Option<Publication> {
    let msg = parse(payload, "memo")?;
    let (Some(boss_type), Some(channel_id), Some(card)) = (&msg.boss_type, &msg.channel_id, &msg.card_index) else {
        return dropped("memo");
    };

    let memo = msg.memo.clone();
    store.card_mutate(boss_type, channel_id, &card.key(), |c| c.memo = memo);
    Some(Publication::state_change(card_topic(boss_type, channel_id), payload))
}

// =============================================================================
// CHANNEL OPERATIONS
// =============================================================================

pub fn channel_status(store: &RaidStore, payload: &Data) -> Option<Publication> {
    let msg = parse(payload, "channel.status")?;
    let (Some(boss_type), Some(channel_id)) = (&msg.boss_type, &msg.channel_id) else {
        return dropped("channel.status");
    };

    let status = normalize_unset(msg.status.as_deref());
    store.mutate(boss_type, channel_id, |s| s.status = status);
    Some(Publication::state_change(channel_state_topic(boss_type), payload))
}

pub fn channel_memo(store: &RaidStore, payload: &Data) -> Option<Publication> {
    let msg = parse(payload, "channel.memo")?;
    let (Some(boss_type), Some(channel_id)) = (&msg.boss_type, &msg.channel_id) else {
        return dropped("channel.memo");
    };

    let memo = msg.memo.clone();
    store.mutate(boss_type, channel_id, |s| s.memo = memo);
    Some(Publication::state_change(channel_state_topic(boss_type), payload))
}

pub fn dragon_color(store: &RaidStore, payload: &Data) -> Option<Publication> {
    let msg = parse(payload, "dragon.color")?;
    let (Some(boss_type), Some(channel_id), Some(dragon_type)) = (&msg.boss_type, &msg.channel_id, &msg.dragon_type)
    else {
        return dropped("dragon.color");
    };

    let color = normalize_unset(msg.color.as_deref());
    store.mutate(boss_type, channel_id, |s| {
        s.dragon_colors
            .get_or_insert_with(HashMap::new)
            .insert(dragon_type.clone(), color);
    });
    Some(Publication::state_change(channel_state_topic(boss_type), payload))
}

// =============================================================================
// HYDRA OPERATIONS
// =============================================================================

/// A catch carries both times; a reset carries neither. Anything in between
/// is dropped.
pub fn hydra_time(store: &RaidStore, payload: &Data) -> Option<Publication> {
    let msg = parse(payload, "hydra.time")?;
    let (Some(boss_type), Some(channel_id), Some(hydra_type)) = (&msg.boss_type, &msg.channel_id, &msg.hydra_type)
    else {
        return dropped("hydra.time");
    };
    if msg.caught_time.is_some() != msg.spawn_time.is_some() {
        return dropped("hydra.time");
    }

    spawn::record_catch(store, boss_type, channel_id, hydra_type, msg.caught_time.clone(), msg.spawn_time);
    Some(Publication::state_change(channel_state_topic(boss_type), payload))
}

/// Spawn settings are keyed by (channel, subtype) only; `bossType` is not
/// required and the publication always goes to the hydra channel-state topic.
pub fn hydra_spawn_settings(store: &RaidStore, payload: &Data) -> Option<Publication> {
    let msg = parse(payload, "hydra.spawn-settings")?;
    let (Some(channel_id), Some(hydra_type), Some(minutes)) = (&msg.channel_id, &msg.hydra_type, msg.spawn_minutes)
    else {
        return dropped("hydra.spawn-settings");
    };
    let Ok(minutes) = u32::try_from(minutes) else {
        debug!(minutes, "update dropped: spawn minutes out of range");
        return None;
    };

    spawn::apply_spawn_setting(store, channel_id, hydra_type, minutes);
    Some(Publication::state_change(spawn_settings_topic(), payload))
}

// =============================================================================
// HELPERS
// =============================================================================

fn parse(payload: &Data, op: &str) -> Option<RaidMessage> {
    match RaidMessage::from_data(payload) {
        Ok(msg) => Some(msg),
        Err(e) => {
            debug!(op, error = %e, "update dropped: malformed payload");
            None
        }
    }
}

fn dropped(op: &str) -> Option<Publication> {
    debug!(op, "update dropped: missing required key");
    None
}

#[cfg(test)]
#[path = "update_test.rs"]
mod tests;
