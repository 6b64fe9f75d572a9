//! Snapshot fan-out between the control surface and any number of displays.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use dashmap::DashMap;
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{dto::sse::StateEnvelope, state::game::GameState};

/// Name shared by every surface of one deployment.
pub const SNAPSHOT_CHANNEL: &str = "quiz-scoreboard-sync";

type Registry = Arc<DashMap<Uuid, JoinHandle<()>>>;

/// Set of named broadcast channels; surfaces open handles on it.
pub struct BroadcastBus {
    capacity: usize,
    channels: DashMap<String, broadcast::Sender<String>>,
}

impl BroadcastBus {
    /// Construct an empty bus whose channels buffer up to `capacity` messages per subscriber.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            channels: DashMap::new(),
        }
    }

    /// Open a handle on the named channel, creating the channel on first use.
    pub fn open(&self, name: &str) -> SnapshotChannel {
        let sender = self
            .channels
            .entry(name.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone();
        SnapshotChannel {
            name: name.to_string(),
            sender,
            closed: AtomicBool::new(false),
            subscriptions: Arc::new(DashMap::new()),
        }
    }
}

/// One surface's handle on a named channel.
pub struct SnapshotChannel {
    name: String,
    sender: broadcast::Sender<String>,
    closed: AtomicBool,
    subscriptions: Registry,
}

impl SnapshotChannel {
    /// Name of the underlying channel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether [`SnapshotChannel::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Send the whole snapshot to current listeners. Fire and forget.
    pub fn publish(&self, state: &GameState) {
        if self.is_closed() {
            debug!(channel = %self.name, "publish on closed channel ignored");
            return;
        }

        let envelope = StateEnvelope::State {
            state: state.clone(),
        };
        match envelope.to_json() {
            Ok(payload) => {
                // No listeners is not an error: late displays pick up the next snapshot.
                let _ = self.sender.send(payload);
            }
            Err(err) => warn!(channel = %self.name, error = %err, "failed to serialize snapshot"),
        }
    }

    /// Invoke `callback` for every snapshot received from now on, in receipt order.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(GameState) + Send + 'static,
    {
        if self.is_closed() {
            return Subscription::inert();
        }

        let mut receiver = self.sender.subscribe();
        let id = Uuid::new_v4();
        let channel = self.name.clone();
        let registry = self.subscriptions.clone();

        let task = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(payload) => match StateEnvelope::from_json_str(&payload) {
                        Ok(envelope) => callback(envelope.into_state()),
                        Err(err) => {
                            debug!(channel = %channel, error = %err, "ignoring non-snapshot message")
                        }
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        // Missed snapshots are superseded by the next one.
                        warn!(channel = %channel, skipped, "subscriber lagged behind");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        registry.insert(id, task);

        Subscription {
            id,
            registry: Some(registry),
        }
    }

    /// Raw receiver of encoded envelopes, used to forward snapshots over SSE.
    pub fn receiver(&self) -> Option<broadcast::Receiver<String>> {
        if self.is_closed() {
            None
        } else {
            Some(self.sender.subscribe())
        }
    }

    /// Release the handle: every subscription made through it stops receiving.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let ids: Vec<Uuid> = self.subscriptions.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            if let Some((_, task)) = self.subscriptions.remove(&id) {
                task.abort();
            }
        }
        debug!(channel = %self.name, "snapshot channel closed");
    }
}

impl Drop for SnapshotChannel {
    fn drop(&mut self) {
        self.close();
    }
}

/// Deregistration handle returned by [`SnapshotChannel::subscribe`].
///
/// Dropping it stops delivery the same way [`Subscription::unsubscribe`] does.
#[must_use = "dropping the subscription stops delivery"]
pub struct Subscription {
    id: Uuid,
    registry: Option<Registry>,
}

impl Subscription {
    fn inert() -> Self {
        Self {
            id: Uuid::nil(),
            registry: None,
        }
    }

    /// Whether the subscription is registered on an open channel.
    pub fn is_active(&self) -> bool {
        self.registry
            .as_ref()
            .is_some_and(|registry| registry.contains_key(&self.id))
    }

    /// Stop delivering snapshots to the callback.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(registry) = self.registry.take() {
            if let Some((_, task)) = registry.remove(&self.id) {
                task.abort();
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
