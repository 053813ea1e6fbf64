//! Raid tracking data model.
//!
//! DESIGN
//! ======
//! Every record is plain owned data (`String`, `Option`, `HashMap`), so
//! `Clone` is a deep copy. Snapshot reads hand out clones and can never
//! alias the live store.
//!
//! Nothing here validates its vocabulary. Boss tokens, subtypes, colors and
//! card keys are free strings; the constants below only name the values
//! the server itself seeds.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// VOCABULARY
// =============================================================================

pub const DRAGON: &str = "dragon";
pub const SKELETON_KING: &str = "skeleton-king";
pub const HYDRA: &str = "hydra";

/// The fixed boss set. Channel create/delete and snapshots iterate this.
pub const BOSS_TYPES: [&str; 3] = [DRAGON, SKELETON_KING, HYDRA];

pub const HYDRA_WATER: &str = "water";
pub const HYDRA_FIRE: &str = "fire";

/// Hydra subtypes seeded on every new channel.
pub const HYDRA_TYPES: [&str; 2] = [HYDRA_WATER, HYDRA_FIRE];

pub const DEFAULT_WATER_SPAWN_MINUTES: u32 = 35;
pub const DEFAULT_FIRE_SPAWN_MINUTES: u32 = 37;

// =============================================================================
// SPAWN DEFAULTS
// =============================================================================

/// Default spawn durations per hydra subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnDefaults {
    pub water: u32,
    pub fire: u32,
}

impl SpawnDefaults {
    /// Default minutes for a subtype. Unrecognised subtypes fall back to the
    /// water duration.
    #[must_use]
    pub fn minutes_for(&self, hydra_type: &str) -> u32 {
        match hydra_type {
            HYDRA_FIRE => self.fire,
            _ => self.water,
        }
    }
}

impl Default for SpawnDefaults {
    fn default() -> Self {
        Self { water: DEFAULT_WATER_SPAWN_MINUTES, fire: DEFAULT_FIRE_SPAWN_MINUTES }
    }
}

// =============================================================================
// CHANNEL STATE
// =============================================================================

/// Per-(boss, channel) state. The zero value is what an unknown pair reads as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelState {
    pub status: Option<String>,
    pub memo: Option<String>,
    /// Dragon subtype -> color. `None` values are explicit resets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dragon_colors: Option<HashMap<String, Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydra_states: Option<HashMap<String, HydraState>>,
}

impl ChannelState {
    /// Initial state for a freshly created channel under `boss_type`.
    ///
    /// `minutes_for` supplies each seeded hydra subtype's spawn duration.
    pub fn initial(boss_type: &str, minutes_for: impl Fn(&str) -> u32) -> Self {
        match boss_type {
            DRAGON => Self { dragon_colors: Some(HashMap::new()), ..Self::default() },
            HYDRA => {
                let hydra_states = HYDRA_TYPES
                    .iter()
                    .map(|t| ((*t).to_string(), HydraState::new(minutes_for(t))))
                    .collect();
                Self { hydra_states: Some(hydra_states), ..Self::default() }
            }
            _ => Self::default(),
        }
    }

    /// Fill in whatever `initial` seeds and `self` lacks. Present values,
    /// including explicit resets, are kept.
    pub fn seed_missing(&mut self, initial: ChannelState) {
        if let Some(colors) = initial.dragon_colors {
            let existing = self.dragon_colors.get_or_insert_with(HashMap::new);
            for (dragon_type, color) in colors {
                existing.entry(dragon_type).or_insert(color);
            }
        }
        if let Some(hydras) = initial.hydra_states {
            let existing = self.hydra_states.get_or_insert_with(HashMap::new);
            for (hydra_type, hydra) in hydras {
                existing.entry(hydra_type).or_insert(hydra);
            }
        }
    }

    /// Hydra state for a subtype, created with `spawn_minutes` if missing.
    pub fn hydra_entry(&mut self, hydra_type: &str, spawn_minutes: u32) -> &mut HydraState {
        self.hydra_states
            .get_or_insert_with(HashMap::new)
            .entry(hydra_type.to_string())
            .or_insert_with(|| HydraState::new(spawn_minutes))
    }
}

// =============================================================================
// HYDRA STATE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HydraState {
    /// Timestamp string exactly as the catching client sent it.
    pub caught_time: Option<String>,
    /// Predicted spawn instant, epoch milliseconds.
    pub spawn_time: Option<i64>,
    pub spawn_minutes: u32,
}

impl HydraState {
    #[must_use]
    pub fn new(spawn_minutes: u32) -> Self {
        Self { caught_time: None, spawn_time: None, spawn_minutes }
    }
}

// =============================================================================
// CARD STATE
// =============================================================================

/// One checklist slot, keyed by card index under (boss, channel).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossCardState {
    pub checked: bool,
    pub color: Option<String>,
    pub memo: Option<String>,
}

/// Empty strings mean "unset" for status and color fields.
#[must_use]
pub fn normalize_unset(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
