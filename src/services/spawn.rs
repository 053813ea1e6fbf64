//! Spawn-time service: hydra catches and derived spawn instants.
//!
//! DESIGN
//! ======
//! Three events touch a hydra subtype's timing:
//! - a catch stores the client's caught-time and spawn instant verbatim;
//! - a reset clears both (same update path, not special-cased);
//! - a spawn-duration change records the setting, copies the minutes into
//!   the hydra state, and re-derives `spawn_time = caught_time + minutes`
//!   when the subtype has been caught.
//!
//! ERROR HANDLING
//! ==============
//! A stored caught-time that fails to parse leaves the previous spawn time
//! in place. The failure is logged and never reaches the caller.

use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};
use tracing::debug;

use crate::model::HYDRA;
use crate::store::RaidStore;

const MS_PER_MINUTE: i64 = 60_000;

#[derive(Debug, thiserror::Error)]
pub enum CaughtTimeError {
    #[error("unparseable caught time {0:?}")]
    Unparseable(String),
    #[error("spawn time out of range")]
    OutOfRange,
}

// =============================================================================
// EVENTS
// =============================================================================

/// Store a catch (both values present) or a reset (both absent) verbatim.
pub fn record_catch(
    store: &RaidStore,
    boss_type: &str,
    channel_id: &str,
    hydra_type: &str,
    caught_time: Option<String>,
    spawn_time: Option<i64>,
) {
    let minutes = store.spawn_minutes(channel_id, hydra_type);
    store.mutate(boss_type, channel_id, |state| {
        let hydra = state.hydra_entry(hydra_type, minutes);
        hydra.caught_time = caught_time;
        hydra.spawn_time = spawn_time;
    });
}

/// Record a new spawn duration for (channel, subtype) and re-derive the
/// spawn instant of an already-caught hydra.
pub fn apply_spawn_setting(store: &RaidStore, channel_id: &str, hydra_type: &str, minutes: u32) {
    store.set_spawn_minutes(channel_id, hydra_type, minutes);
    store.mutate(HYDRA, channel_id, |state| {
        let hydra = state.hydra_entry(hydra_type, minutes);
        hydra.spawn_minutes = minutes;
        let Some(caught) = hydra.caught_time.as_deref() else {
            return;
        };
        match derive_spawn_time(caught, minutes) {
            Ok(spawn_time) => hydra.spawn_time = Some(spawn_time),
            Err(e) => debug!(%channel_id, %hydra_type, error = %e, "spawn time kept after recompute failure"),
        }
    });
}

// =============================================================================
// DERIVATION
// =============================================================================

/// `caught_time + minutes`, as epoch milliseconds.
///
/// # Errors
///
/// Returns `CaughtTimeError` if `caught_time` does not parse.
pub fn derive_spawn_time(caught_time: &str, minutes: u32) -> Result<i64, CaughtTimeError> {
    let caught_ms = parse_caught_time(caught_time)?;
    caught_ms
        .checked_add(i64::from(minutes) * MS_PER_MINUTE)
        .ok_or(CaughtTimeError::OutOfRange)
}

/// Parse an RFC 3339 timestamp, or an offset-less ISO 8601 date-time taken
/// as UTC, into epoch milliseconds.
///
/// # Errors
///
/// Returns `CaughtTimeError::Unparseable` if neither form matches.
pub fn parse_caught_time(raw: &str) -> Result<i64, CaughtTimeError> {
    let raw = raw.trim();
    let instant = OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).map(PrimitiveDateTime::assume_utc))
        .map_err(|_| CaughtTimeError::Unparseable(raw.to_string()))?;
    i64::try_from(instant.unix_timestamp_nanos() / 1_000_000).map_err(|_| CaughtTimeError::OutOfRange)
}

#[cfg(test)]
#[path = "spawn_test.rs"]
mod tests;
