//! Pub/sub service: topic subscriptions and fire-and-forget fanout.
//!
//! DESIGN
//! ======
//! Each websocket connection owns one bounded `mpsc` queue. Subscribing
//! registers a clone of that sender under a topic; publishing walks the
//! topic's subscribers and `try_send`s a copy of the frame. A full or
//! closed queue just misses the frame. Nothing is retried and the
//! publisher never learns about it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::debug;
use uuid::Uuid;

use crate::frame::Frame;

type Subscribers = HashMap<Uuid, mpsc::Sender<Frame>>;

#[derive(Clone, Default)]
pub struct Broker {
    topics: Arc<RwLock<HashMap<String, Subscribers>>>,
}

impl Broker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client's queue under a topic. Re-subscribing replaces the
    /// previous sender.
    pub async fn subscribe(&self, topic: &str, client_id: Uuid, tx: mpsc::Sender<Frame>) {
        let mut topics = self.topics.write().await;
        topics.entry(topic.to_string()).or_default().insert(client_id, tx);
        debug!(%client_id, %topic, "pubsub: subscribed");
    }

    /// Returns `true` if the client was subscribed.
    pub async fn unsubscribe(&self, topic: &str, client_id: Uuid) -> bool {
        let mut topics = self.topics.write().await;
        let Some(subscribers) = topics.get_mut(topic) else {
            return false;
        };
        let removed = subscribers.remove(&client_id).is_some();
        if subscribers.is_empty() {
            topics.remove(topic);
        }
        removed
    }

    /// Drop every subscription held by a client. Returns how many.
    pub async fn unsubscribe_all(&self, client_id: Uuid) -> usize {
        let mut topics = self.topics.write().await;
        let mut removed = 0;
        topics.retain(|_, subscribers| {
            if subscribers.remove(&client_id).is_some() {
                removed += 1;
            }
            !subscribers.is_empty()
        });
        removed
    }

    /// Send a frame to every subscriber of a topic. Returns how many queues
    /// accepted it.
    pub async fn publish(&self, topic: &str, frame: &Frame) -> usize {
        let topics = self.topics.read().await;
        let Some(subscribers) = topics.get(topic) else {
            return 0;
        };

        let mut delivered = 0;
        for (client_id, tx) in subscribers {
            // Best-effort: a full or closed queue misses this frame.
            if tx.try_send(frame.clone()).is_ok() {
                delivered += 1;
            } else {
                debug!(%client_id, %topic, "pubsub: subscriber queue unavailable");
            }
        }
        delivered
    }

    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.read().await.get(topic).map_or(0, HashMap::len)
    }
}

#[cfg(test)]
#[path = "pubsub_test.rs"]
mod tests;
