//! Raid state store: canonical in-memory state for every channel.
//!
//! DESIGN
//! ======
//! Layout is `boss -> channel -> state` for channel state and
//! `boss -> channel -> card -> state` for cards, plus a flat roster set and
//! per-(channel, hydra subtype) spawn settings. Each level is a `DashMap`,
//! so writers on different keys only contend when they hash to the same
//! shard, and same-key writers are serialized last-write-wins.
//!
//! Missing intermediate levels are created through `vivify`, which relies
//! on `DashMap::entry` so two first-writers can never install duplicate
//! siblings.
//!
//! LOCK ORDER
//! ==========
//! A thread holds at most one outer-level `Ref` at a time and only ever
//! acquires inner locks underneath it. Updater closures must not call back
//! into the store.
//!
//! CONSISTENCY
//! ===========
//! Channel create/delete touch several maps without a cross-map lock. A
//! concurrent snapshot may see a channel in the roster whose per-boss
//! entries are not there yet (or already gone); snapshot reads fill such
//! holes with zero values. A state written before its channel was created
//! (or racing with create) is merged with the create defaults, never
//! replaced by them.

use std::collections::{BTreeSet, HashMap};

use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::Ref;
use dashmap::{DashMap, DashSet};

use crate::model::{BOSS_TYPES, BossCardState, ChannelState, SpawnDefaults};

/// Deep-copied `boss -> channel -> state` view.
pub type FullState = HashMap<String, HashMap<String, ChannelState>>;

/// Roster rendered under each boss token.
pub type BossChannels = HashMap<String, BTreeSet<String>>;

type Level<V> = DashMap<String, DashMap<String, V>>;

pub struct RaidStore {
    roster: DashSet<String>,
    channel_states: Level<ChannelState>,
    card_states: Level<HashMap<String, BossCardState>>,
    /// (`channel_id`, `hydra_type`) -> minutes.
    spawn_settings: DashMap<(String, String), u32>,
    defaults: SpawnDefaults,
}

impl RaidStore {
    #[must_use]
    pub fn new(defaults: SpawnDefaults) -> Self {
        Self {
            roster: DashSet::new(),
            channel_states: DashMap::new(),
            card_states: DashMap::new(),
            spawn_settings: DashMap::new(),
            defaults,
        }
    }

    // =========================================================================
    // CHANNEL STATE
    // =========================================================================

    /// Upsert read: returns a copy of the state, materializing a zero value
    /// if the pair was never written.
    pub fn channel_state(&self, boss_type: &str, channel_id: &str) -> ChannelState {
        let level = vivify(&self.channel_states, boss_type);
        level.entry(channel_id.to_string()).or_default().clone()
    }

    /// Apply one update to a channel state atomically, creating any missing
    /// level first.
    pub fn mutate<R>(&self, boss_type: &str, channel_id: &str, update: impl FnOnce(&mut ChannelState) -> R) -> R {
        let level = vivify(&self.channel_states, boss_type);
        let mut entry = level.entry(channel_id.to_string()).or_default();
        update(&mut entry)
    }

    /// Card-state analogue of [`RaidStore::mutate`]. Card keys are not
    /// range-checked.
    pub fn card_mutate<R>(
        &self,
        boss_type: &str,
        channel_id: &str,
        card_index: &str,
        update: impl FnOnce(&mut BossCardState) -> R,
    ) -> R {
        let level = vivify(&self.card_states, boss_type);
        let mut cards = level.entry(channel_id.to_string()).or_default();
        update(cards.entry(card_index.to_string()).or_default())
    }

    // =========================================================================
    // SNAPSHOT READS
    // =========================================================================

    /// Copy of every card under (boss, channel). Does not materialize.
    #[must_use]
    pub fn card_states(&self, boss_type: &str, channel_id: &str) -> HashMap<String, BossCardState> {
        let Some(level) = self.card_states.get(boss_type) else {
            return HashMap::new();
        };
        level
            .get(channel_id)
            .map(|cards| cards.value().clone())
            .unwrap_or_default()
    }

    /// Copy of every rostered channel's state under one boss. Channels with
    /// no entry read as zero values.
    #[must_use]
    pub fn boss_channel_states(&self, boss_type: &str) -> HashMap<String, ChannelState> {
        let roster = self.channels();
        let Some(level) = self.channel_states.get(boss_type) else {
            return roster
                .into_iter()
                .map(|id| (id, ChannelState::default()))
                .collect();
        };
        roster
            .into_iter()
            .map(|id| {
                let state = level
                    .get(&id)
                    .map(|s| s.value().clone())
                    .unwrap_or_default();
                (id, state)
            })
            .collect()
    }

    /// Copy of all fixed boss types across the full roster.
    #[must_use]
    pub fn full_state(&self) -> FullState {
        BOSS_TYPES
            .iter()
            .map(|boss| ((*boss).to_string(), self.boss_channel_states(boss)))
            .collect()
    }

    /// Copy of the roster, sorted.
    #[must_use]
    pub fn channels(&self) -> BTreeSet<String> {
        self.roster.iter().map(|id| id.key().clone()).collect()
    }

    /// The roster repeated under each fixed boss token.
    #[must_use]
    pub fn boss_channels(&self) -> BossChannels {
        let channels = self.channels();
        BOSS_TYPES
            .iter()
            .map(|boss| ((*boss).to_string(), channels.clone()))
            .collect()
    }

    // =========================================================================
    // SPAWN SETTINGS
    // =========================================================================

    /// Configured minutes for (channel, subtype), or the subtype default.
    #[must_use]
    pub fn spawn_minutes(&self, channel_id: &str, hydra_type: &str) -> u32 {
        self.spawn_settings
            .get(&(channel_id.to_string(), hydra_type.to_string()))
            .map_or_else(|| self.defaults.minutes_for(hydra_type), |m| *m)
    }

    pub fn set_spawn_minutes(&self, channel_id: &str, hydra_type: &str, minutes: u32) {
        self.spawn_settings
            .insert((channel_id.to_string(), hydra_type.to_string()), minutes);
    }

    /// Seed the default for (channel, subtype) unless a setting exists.
    /// Returns the effective minutes.
    pub fn seed_spawn_minutes(&self, channel_id: &str, hydra_type: &str) -> u32 {
        let default = self.defaults.minutes_for(hydra_type);
        *self
            .spawn_settings
            .entry((channel_id.to_string(), hydra_type.to_string()))
            .or_insert(default)
    }

    // =========================================================================
    // LIFECYCLE PRIMITIVES
    // =========================================================================

    /// Add to the roster. Returns `false` if already present.
    pub(crate) fn enroll(&self, channel_id: &str) -> bool {
        self.roster.insert(channel_id.to_string())
    }

    /// Remove from the roster. Returns `false` if absent.
    pub(crate) fn unenroll(&self, channel_id: &str) -> bool {
        self.roster.remove(channel_id).is_some()
    }

    /// Install `initial` and an empty card map for (boss, channel). An
    /// existing state, e.g. one written before the channel was rostered,
    /// keeps its values and only gains the defaults it is missing.
    pub(crate) fn materialize(&self, boss_type: &str, channel_id: &str, initial: ChannelState) {
        match vivify(&self.channel_states, boss_type).entry(channel_id.to_string()) {
            Entry::Occupied(mut entry) => entry.get_mut().seed_missing(initial),
            Entry::Vacant(entry) => {
                entry.insert(initial);
            }
        }
        vivify(&self.card_states, boss_type)
            .entry(channel_id.to_string())
            .or_default();
    }

    /// Remove a channel's state and cards under every boss level, including
    /// boss tokens outside the fixed set.
    pub(crate) fn purge(&self, channel_id: &str) {
        for level in &self.channel_states {
            level.remove(channel_id);
        }
        for level in &self.card_states {
            level.remove(channel_id);
        }
    }

    /// Whether (boss, channel) has a state entry and a card entry.
    #[cfg(test)]
    pub(crate) fn has_entries(&self, boss_type: &str, channel_id: &str) -> (bool, bool) {
        let state = self
            .channel_states
            .get(boss_type)
            .is_some_and(|level| level.contains_key(channel_id));
        let cards = self
            .card_states
            .get(boss_type)
            .is_some_and(|level| level.contains_key(channel_id));
        (state, cards)
    }

    /// Drop every spawn setting for a channel.
    pub(crate) fn purge_spawn_settings(&self, channel_id: &str) {
        self.spawn_settings.retain(|(id, _), _| id != channel_id);
    }
}

impl Default for RaidStore {
    fn default() -> Self {
        Self::new(SpawnDefaults::default())
    }
}

/// Get-or-create the per-boss level. Boss levels are never removed, so the
/// re-read after creating always succeeds.
fn vivify<'a, V>(map: &'a Level<V>, boss_type: &str) -> Ref<'a, String, DashMap<String, V>> {
    loop {
        if let Some(level) = map.get(boss_type) {
            return level;
        }
        map.entry(boss_type.to_string()).or_default();
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
