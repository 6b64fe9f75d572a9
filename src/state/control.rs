//! Authoritative surface: owns the game state and publishes every transition.

use std::{
    sync::{Arc, Mutex as StdMutex, PoisonError, Weak},
    time::Duration,
};

use tokio::{sync::Mutex, task::JoinHandle, time::sleep};
use tracing::debug;

use crate::state::{
    broadcast::SnapshotChannel,
    game::GameState,
    state_machine::{self, Command, Transition},
};

/// Delay before an armed flash is cleared when no configuration overrides it.
pub const DEFAULT_FLASH_CLEAR_DELAY: Duration = Duration::from_millis(1_500);

/// Owner of the single authoritative [`GameState`].
pub struct ControlSurface {
    state: Mutex<GameState>,
    channel: SnapshotChannel,
    flash_timer: StdMutex<Option<JoinHandle<()>>>,
    flash_clear_delay: Duration,
    this: Weak<ControlSurface>,
}

impl ControlSurface {
    /// Take ownership of `initial` and publish through `channel`.
    pub fn new(
        initial: GameState,
        channel: SnapshotChannel,
        flash_clear_delay: Duration,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            state: Mutex::new(initial),
            channel,
            flash_timer: StdMutex::new(None),
            flash_clear_delay,
            this: this.clone(),
        })
    }

    /// Copy of the current authoritative state.
    pub async fn snapshot(&self) -> GameState {
        self.state.lock().await.clone()
    }

    /// Whether the transport handle has been released.
    pub fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }

    /// Apply one command, publish the result, and return it.
    ///
    /// Commands are applied strictly one at a time; each produces exactly one snapshot.
    pub async fn dispatch(&self, command: Command) -> GameState {
        let mut guard = self.state.lock().await;
        debug!(command = ?command, "dispatching command");

        let Transition { state, flash_armed } = state_machine::transition(&guard, command);
        *guard = state.clone();
        if flash_armed {
            self.schedule_flash_clear();
        }
        self.channel.publish(&state);

        state
    }

    /// Cancel any pending flash clear and release the transport handle.
    pub fn close(&self) {
        self.cancel_flash_clear();
        self.channel.close();
    }

    fn schedule_flash_clear(&self) {
        let mut slot = self
            .flash_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        let this = self.this.clone();
        let delay = self.flash_clear_delay;
        *slot = Some(tokio::spawn(async move {
            sleep(delay).await;
            if let Some(control) = this.upgrade() {
                control.dispatch(Command::SetFlash { flash: None }).await;
            }
        }));
    }

    fn cancel_flash_clear(&self) {
        let mut slot = self
            .flash_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = slot.take() {
            timer.abort();
        }
    }
}
