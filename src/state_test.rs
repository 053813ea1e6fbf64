use super::*;
use crate::model::{HYDRA, HYDRA_FIRE, HYDRA_WATER, SpawnDefaults};
use crate::services::channel;

#[test]
fn new_state_starts_empty() {
    let state = test_helpers::test_app_state();
    assert!(state.store.channels().is_empty());
    assert_eq!(state.config.ws_client_buffer, 256);
}

#[test]
fn store_uses_configured_spawn_defaults() {
    let config = Config { spawn_defaults: SpawnDefaults { water: 20, fire: 25 }, ..Config::default() };
    let state = AppState::new(config);
    channel::create_channel(&state.store, "C1");

    let hydras = state.store.channel_state(HYDRA, "C1").hydra_states.unwrap();
    assert_eq!(hydras[HYDRA_WATER].spawn_minutes, 20);
    assert_eq!(hydras[HYDRA_FIRE].spawn_minutes, 25);
}

#[test]
fn clones_share_store() {
    let state = test_helpers::test_app_state();
    let other = state.clone();
    channel::create_channel(&other.store, "C1");
    assert!(state.store.channels().contains("C1"));
}

#[tokio::test]
async fn clones_share_broker() {
    let state = test_helpers::test_app_state();
    let (_client_id, _rx) = test_helpers::subscribe_client(&state, "boss-raid/channels").await;
    assert_eq!(state.clone().broker.subscriber_count("boss-raid/channels").await, 1);
}
