use super::*;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::frame::Frame;

/// Create a test `AppState` with default config.
#[must_use]
pub fn test_app_state() -> AppState {
    AppState::new(Config::default())
}

/// Create a test `AppState` whose deletes also purge spawn settings.
#[must_use]
pub fn test_app_state_purging() -> AppState {
    AppState::new(Config { purge_spawn_settings_on_delete: true, ..Config::default() })
}

/// Register a fresh client queue on a topic and return its id and receiver.
pub async fn subscribe_client(state: &AppState, topic: &str) -> (Uuid, mpsc::Receiver<Frame>) {
    let client_id = Uuid::new_v4();
    let (tx, rx) = mpsc::channel(16);
    state.broker.subscribe(topic, client_id, tx).await;
    (client_id, rx)
}
