//! Read-only mirror: keeps the last received snapshot and nothing else.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::watch;

use crate::{
    dto::display::DisplayView,
    state::{
        broadcast::{SnapshotChannel, Subscription},
        game::GameState,
    },
};

/// Display surface attached to a snapshot channel.
pub struct DisplaySurface {
    channel: SnapshotChannel,
    latest: Arc<watch::Sender<Option<GameState>>>,
    subscription: StdMutex<Option<Subscription>>,
}

impl DisplaySurface {
    /// Start listening on `channel`; every received snapshot replaces the previous one.
    pub fn attach(channel: SnapshotChannel) -> Self {
        let latest = Arc::new(watch::Sender::new(None));
        let sink = latest.clone();
        let subscription = channel.subscribe(move |snapshot| {
            sink.send_replace(Some(snapshot));
        });

        Self {
            channel,
            latest,
            subscription: StdMutex::new(Some(subscription)),
        }
    }

    /// Last received snapshot, if any arrived yet.
    pub fn snapshot(&self) -> Option<GameState> {
        self.latest.borrow().clone()
    }

    /// Presentation derived from the last snapshot (an empty game before the first one).
    pub fn view(&self) -> DisplayView {
        match &*self.latest.borrow() {
            Some(state) => DisplayView::from(state),
            None => DisplayView::from(&GameState::default()),
        }
    }

    /// Receiver notified whenever a new snapshot lands.
    pub fn watch(&self) -> watch::Receiver<Option<GameState>> {
        self.latest.subscribe()
    }

    /// Stop listening and release the channel handle.
    pub fn close(&self) {
        let subscription = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        self.channel.close();
    }
}
