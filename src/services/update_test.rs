use super::*;
use crate::model::{DRAGON, HYDRA, HYDRA_FIRE, HYDRA_WATER, SKELETON_KING};
use crate::services::{channel, spawn};
use serde_json::{Value, json};

const CAUGHT: &str = "2025-03-01T12:00:00.000Z";
const CAUGHT_MS: i64 = 1_740_830_400_000;

fn data(value: Value) -> Data {
    serde_json::from_value(value).expect("test payload should be an object")
}

fn seeded() -> RaidStore {
    let store = RaidStore::default();
    channel::create_channel(&store, "C1");
    store
}

// =============================================================================
// CARD OPERATIONS
// =============================================================================

#[test]
fn check_state_sets_card_and_addresses_card_topic() {
    let store = seeded();
    let payload = data(json!({"bossType": "dragon", "channelId": "C1", "cardIndex": 4, "checked": true}));

    let publication = check_state(&store, &payload).expect("publication");

    assert!(store.card_states(DRAGON, "C1")["4"].checked);
    assert_eq!(publication.topic, "boss-raid/dragon/C1");
    assert_eq!(publication.data["type"], json!("STATE_CHANGE"));
    assert_eq!(publication.data["cardIndex"], json!(4));
    assert_eq!(publication.data["checked"], json!(true));
}

#[test]
fn check_state_missing_channel_is_dropped() {
    let store = seeded();
    let before = store.full_state();
    let payload = data(json!({"bossType": "dragon", "cardIndex": 0, "checked": true}));

    assert!(check_state(&store, &payload).is_none());
    assert_eq!(store.full_state(), before);
    assert!(store.card_states(DRAGON, "C1").is_empty());
}

#[test]
fn check_state_missing_checked_is_dropped() {
    let store = seeded();
    let payload = data(json!({"bossType": "dragon", "channelId": "C1", "cardIndex": 0}));

    assert!(check_state(&store, &payload).is_none());
    assert!(store.card_states(DRAGON, "C1").is_empty());
}

#[test]
fn wrongly_typed_key_is_dropped() {
    let store = seeded();
    let payload = data(json!({"bossType": "dragon", "channelId": "C1", "cardIndex": 0, "checked": "yes"}));

    assert!(check_state(&store, &payload).is_none());
    assert!(store.card_states(DRAGON, "C1").is_empty());
}

#[test]
fn card_color_touches_only_its_card() {
    let store = seeded();
    card_color(&store, &data(json!({"bossType": "skeleton-king", "channelId": "C1", "cardIndex": 3, "color": "green"})));

    let payload = data(json!({"bossType": "skeleton-king", "channelId": "C1", "cardIndex": 2, "color": "red"}));
    let publication = card_color(&store, &payload).expect("publication");

    let cards = store.card_states(SKELETON_KING, "C1");
    assert_eq!(cards["2"].color.as_deref(), Some("red"));
    assert_eq!(cards["3"].color.as_deref(), Some("green"));
    assert_eq!(publication.topic, "boss-raid/skeleton-king/C1");
}

#[test]
fn card_color_empty_string_resets() {
    let store = seeded();
    card_color(&store, &data(json!({"bossType": "dragon", "channelId": "C1", "cardIndex": 1, "color": "red"})));

    let payload = data(json!({"bossType": "dragon", "channelId": "C1", "cardIndex": 1, "color": ""}));
    let publication = card_color(&store, &payload).expect("publication");

    assert!(store.card_states(DRAGON, "C1")["1"].color.is_none());
    assert_eq!(publication.data["color"], json!(""));
}

#[test]
fn card_memo_accepts_string_index() {
    let store = seeded();
    let payload = data(json!({"bossType": "hydra", "channelId": "C1", "cardIndex": "7", "memo": "tank"}));

    let publication = card_memo(&store, &payload).expect("publication");

    assert_eq!(store.card_states(HYDRA, "C1")["7"].memo.as_deref(), Some("tank"));
    assert_eq!(publication.topic, "boss-raid/hydra/C1");
}

#[test]
fn card_memo_missing_index_is_dropped() {
    let store = seeded();
    let payload = data(json!({"bossType": "hydra", "channelId": "C1", "memo": "tank"}));
    assert!(card_memo(&store, &payload).is_none());
    assert!(store.card_states(HYDRA, "C1").is_empty());
}

// =============================================================================
// CHANNEL OPERATIONS
// =============================================================================

#[test]
fn channel_status_addresses_boss_topic() {
    let store = seeded();
    let payload = data(json!({"bossType": "dragon", "channelId": "C1", "status": "orange"}));

    let publication = channel_status(&store, &payload).expect("publication");

    assert_eq!(store.channel_state(DRAGON, "C1").status.as_deref(), Some("orange"));
    assert_eq!(publication.topic, "boss-raid/channel-state/dragon");
}

#[test]
fn channel_status_empty_string_resets() {
    let store = seeded();
    channel_status(&store, &data(json!({"bossType": "dragon", "channelId": "C1", "status": "red"})));
    channel_status(&store, &data(json!({"bossType": "dragon", "channelId": "C1", "status": ""})));

    assert!(store.channel_state(DRAGON, "C1").status.is_none());
}

#[test]
fn channel_memo_sets_and_clears() {
    let store = seeded();
    channel_memo(&store, &data(json!({"bossType": "skeleton-king", "channelId": "C1", "memo": "2nd floor"})));
    assert_eq!(store.channel_state(SKELETON_KING, "C1").memo.as_deref(), Some("2nd floor"));

    channel_memo(&store, &data(json!({"bossType": "skeleton-king", "channelId": "C1"})));
    assert!(store.channel_state(SKELETON_KING, "C1").memo.is_none());
}

#[test]
fn channel_memo_missing_boss_is_dropped() {
    let store = seeded();
    assert!(channel_memo(&store, &data(json!({"channelId": "C1", "memo": "x"}))).is_none());
}

#[test]
fn dragon_color_sets_and_resets_subtype() {
    let store = seeded();
    let payload = data(json!({"bossType": "dragon", "channelId": "C1", "dragonType": "black", "color": "yellow"}));

    let publication = dragon_color(&store, &payload).expect("publication");
    assert_eq!(publication.topic, "boss-raid/channel-state/dragon");

    let colors = store.channel_state(DRAGON, "C1").dragon_colors.unwrap();
    assert_eq!(colors["black"].as_deref(), Some("yellow"));

    dragon_color(&store, &data(json!({"bossType": "dragon", "channelId": "C1", "dragonType": "black", "color": ""})));
    let colors = store.channel_state(DRAGON, "C1").dragon_colors.unwrap();
    assert_eq!(colors.get("black"), Some(&None));
}

#[test]
fn dragon_color_missing_subtype_is_dropped() {
    let store = seeded();
    let payload = data(json!({"bossType": "dragon", "channelId": "C1", "color": "yellow"}));
    assert!(dragon_color(&store, &payload).is_none());
    assert_eq!(store.channel_state(DRAGON, "C1").dragon_colors.map(|c| c.len()), Some(0));
}

#[test]
fn update_for_unrostered_channel_vivifies() {
    let store = RaidStore::default();
    let payload = data(json!({"bossType": "dragon", "channelId": "ghost", "status": "red"}));

    assert!(channel_status(&store, &payload).is_some());
    assert_eq!(store.channel_state(DRAGON, "ghost").status.as_deref(), Some("red"));
    assert!(!store.channels().contains("ghost"));
}

// =============================================================================
// HYDRA OPERATIONS
// =============================================================================

#[test]
fn hydra_time_stores_catch_verbatim() {
    let store = seeded();
    let payload = data(json!({
        "bossType": "hydra", "channelId": "C1", "hydraType": "water",
        "caughtTime": CAUGHT, "spawnTime": 42
    }));

    let publication = hydra_time(&store, &payload).expect("publication");

    let water = &store.channel_state(HYDRA, "C1").hydra_states.unwrap()[HYDRA_WATER];
    assert_eq!(water.caught_time.as_deref(), Some(CAUGHT));
    assert_eq!(water.spawn_time, Some(42));
    assert_eq!(publication.topic, "boss-raid/channel-state/hydra");
}

#[test]
fn hydra_time_without_both_times_resets() {
    let store = seeded();
    spawn::record_catch(&store, HYDRA, "C1", HYDRA_FIRE, Some(CAUGHT.into()), Some(CAUGHT_MS));

    let payload = data(json!({"bossType": "hydra", "channelId": "C1", "hydraType": "fire"}));
    assert!(hydra_time(&store, &payload).is_some());

    let fire = &store.channel_state(HYDRA, "C1").hydra_states.unwrap()[HYDRA_FIRE];
    assert!(fire.caught_time.is_none());
    assert!(fire.spawn_time.is_none());
    assert_eq!(fire.spawn_minutes, 37);
}

#[test]
fn hydra_time_with_one_time_is_dropped() {
    let store = seeded();
    let before = store.channel_state(HYDRA, "C1");

    let only_caught = data(json!({"bossType": "hydra", "channelId": "C1", "hydraType": "water", "caughtTime": CAUGHT}));
    let only_spawn = data(json!({"bossType": "hydra", "channelId": "C1", "hydraType": "water", "spawnTime": 1}));

    assert!(hydra_time(&store, &only_caught).is_none());
    assert!(hydra_time(&store, &only_spawn).is_none());
    assert_eq!(store.channel_state(HYDRA, "C1"), before);
}

#[test]
fn spawn_settings_without_boss_type_recomputes_and_publishes_on_hydra_topic() {
    let store = seeded();
    hydra_time(
        &store,
        &data(json!({
            "bossType": "hydra", "channelId": "C1", "hydraType": "water",
            "caughtTime": CAUGHT, "spawnTime": CAUGHT_MS + 35 * 60_000
        })),
    );

    let payload = data(json!({"channelId": "C1", "hydraType": "water", "spawnMinutes": 50}));
    let publication = hydra_spawn_settings(&store, &payload).expect("publication");

    let water = &store.channel_state(HYDRA, "C1").hydra_states.unwrap()[HYDRA_WATER];
    assert_eq!(water.spawn_minutes, 50);
    assert_eq!(water.spawn_time, Some(CAUGHT_MS + 50 * 60_000));
    assert_eq!(store.spawn_minutes("C1", HYDRA_WATER), 50);
    assert_eq!(publication.topic, "boss-raid/channel-state/hydra");
    assert_eq!(publication.data["spawnMinutes"], json!(50));
}

#[test]
fn spawn_settings_missing_minutes_is_dropped() {
    let store = seeded();
    let payload = data(json!({"channelId": "C1", "hydraType": "water"}));
    assert!(hydra_spawn_settings(&store, &payload).is_none());
    assert_eq!(store.spawn_minutes("C1", HYDRA_WATER), 35);
}

#[test]
fn spawn_settings_out_of_range_minutes_are_dropped() {
    let store = seeded();
    let before = store.channel_state(HYDRA, "C1");

    for minutes in [json!(-1), json!(i64::from(u32::MAX) + 1)] {
        let payload = data(json!({"channelId": "C1", "hydraType": "water", "spawnMinutes": minutes}));
        assert!(hydra_spawn_settings(&store, &payload).is_none());
    }

    assert_eq!(store.spawn_minutes("C1", HYDRA_WATER), 35);
    assert_eq!(store.channel_state(HYDRA, "C1"), before);
}

#[test]
fn status_before_create_still_gets_seeded_hydras() {
    let store = RaidStore::default();
    channel_status(&store, &data(json!({"bossType": "hydra", "channelId": "C1", "status": "red"})));

    channel::create_channel(&store, "C1");

    let state = store.channel_state(HYDRA, "C1");
    assert_eq!(state.status.as_deref(), Some("red"));
    let hydras = state.hydra_states.expect("hydra states seeded");
    assert_eq!(hydras[HYDRA_WATER].spawn_minutes, 35);
    assert_eq!(hydras[HYDRA_FIRE].spawn_minutes, 37);
}

#[test]
fn publication_keeps_unknown_payload_keys() {
    let store = seeded();
    let payload = data(json!({"bossType": "dragon", "channelId": "C1", "status": "red", "sender": "ui-7"}));

    let publication = channel_status(&store, &payload).expect("publication");
    assert_eq!(publication.data["sender"], json!("ui-7"));
    assert_eq!(publication.data.len(), payload.len() + 1);
}
