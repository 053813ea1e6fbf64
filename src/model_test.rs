use super::*;

#[test]
fn spawn_defaults_per_subtype() {
    let defaults = SpawnDefaults::default();
    assert_eq!(defaults.minutes_for(HYDRA_WATER), 35);
    assert_eq!(defaults.minutes_for(HYDRA_FIRE), 37);
    assert_eq!(defaults.minutes_for("unheard-of"), 35);
}

#[test]
fn initial_hydra_state_seeds_both_subtypes() {
    let state = ChannelState::initial(HYDRA, |t| SpawnDefaults::default().minutes_for(t));
    let hydras = state.hydra_states.expect("hydra states seeded");
    assert_eq!(hydras.len(), 2);
    assert_eq!(hydras[HYDRA_WATER].spawn_minutes, 35);
    assert_eq!(hydras[HYDRA_FIRE].spawn_minutes, 37);
    assert!(hydras[HYDRA_WATER].caught_time.is_none());
    assert!(state.dragon_colors.is_none());
}

#[test]
fn initial_dragon_state_has_empty_color_map() {
    let state = ChannelState::initial(DRAGON, |_| 0);
    assert_eq!(state.dragon_colors, Some(HashMap::new()));
    assert!(state.hydra_states.is_none());
}

#[test]
fn initial_skeleton_king_state_is_zero_value() {
    assert_eq!(ChannelState::initial(SKELETON_KING, |_| 0), ChannelState::default());
}

#[test]
fn hydra_entry_creates_once() {
    let mut state = ChannelState::default();
    state.hydra_entry(HYDRA_FIRE, 40).caught_time = Some("t".into());
    let again = state.hydra_entry(HYDRA_FIRE, 99);
    assert_eq!(again.spawn_minutes, 40);
    assert_eq!(again.caught_time.as_deref(), Some("t"));
}

#[test]
fn seed_missing_adds_defaults_and_keeps_written_values() {
    let mut state = ChannelState { status: Some("red".into()), ..ChannelState::default() };
    state.hydra_entry(HYDRA_FIRE, 50).caught_time = Some("t".into());

    state.seed_missing(ChannelState::initial(HYDRA, |t| SpawnDefaults::default().minutes_for(t)));

    let hydras = state.hydra_states.as_ref().expect("hydra states seeded");
    assert_eq!(hydras[HYDRA_WATER].spawn_minutes, 35);
    assert_eq!(hydras[HYDRA_FIRE].spawn_minutes, 50);
    assert_eq!(hydras[HYDRA_FIRE].caught_time.as_deref(), Some("t"));
    assert_eq!(state.status.as_deref(), Some("red"));
}

#[test]
fn seed_missing_keeps_dragon_resets() {
    let mut state = ChannelState::default();
    state.dragon_colors = Some(HashMap::from([("black".to_string(), None)]));

    state.seed_missing(ChannelState::initial(DRAGON, |_| 0));

    assert_eq!(state.dragon_colors, Some(HashMap::from([("black".to_string(), None)])));

    let mut bare = ChannelState::default();
    bare.seed_missing(ChannelState::initial(DRAGON, |_| 0));
    assert_eq!(bare.dragon_colors, Some(HashMap::new()));
}

#[test]
fn channel_state_serializes_camel_case_and_skips_absent_maps() {
    let state = ChannelState { status: Some("red".into()), ..ChannelState::default() };
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json, serde_json::json!({"status": "red", "memo": null}));

    let hydra = ChannelState::initial(HYDRA, |_| 35);
    let json = serde_json::to_value(&hydra).unwrap();
    assert_eq!(json["hydraStates"]["water"]["spawnMinutes"], 35);
    assert!(json["hydraStates"]["water"]["caughtTime"].is_null());
}

#[test]
fn normalize_unset_maps_empty_to_none() {
    assert_eq!(normalize_unset(Some("")), None);
    assert_eq!(normalize_unset(None), None);
    assert_eq!(normalize_unset(Some("green")), Some("green".to_string()));
}
