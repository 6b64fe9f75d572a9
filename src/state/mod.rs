/// Snapshot broadcast bus.
pub mod broadcast;
/// Authoritative control surface.
pub mod control;
/// Read-only display surface.
pub mod display;
/// Game state model.
pub mod game;
/// Pure command transitions.
pub mod state_machine;

#[cfg(test)]
mod tests_props_engine;

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;

use self::{
    broadcast::{BroadcastBus, SNAPSHOT_CHANNEL, SnapshotChannel},
    control::ControlSurface,
    display::DisplaySurface,
};

/// Application state shared with every handler.
pub type SharedState = Arc<AppState>;

/// Central application state: the snapshot bus plus the two surfaces attached to it.
pub struct AppState {
    bus: BroadcastBus,
    control: Arc<ControlSurface>,
    display: DisplaySurface,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The display is attached before the control surface publishes anything, so the
    /// in-process mirror never misses a snapshot.
    pub fn new(config: AppConfig) -> SharedState {
        let bus = BroadcastBus::new(config.channel_capacity());
        let display = DisplaySurface::attach(bus.open(SNAPSHOT_CHANNEL));
        let control = ControlSurface::new(
            config.initial_state(),
            bus.open(SNAPSHOT_CHANNEL),
            config.flash_clear_delay(),
        );

        Arc::new(Self {
            bus,
            control,
            display,
        })
    }

    /// Authoritative surface.
    pub fn control(&self) -> &Arc<ControlSurface> {
        &self.control
    }

    /// In-process read-only mirror.
    pub fn display(&self) -> &DisplaySurface {
        &self.display
    }

    /// Fresh handle on the snapshot channel, e.g. for one SSE connection.
    pub fn open_channel(&self) -> SnapshotChannel {
        self.bus.open(SNAPSHOT_CHANNEL)
    }

    /// Whether the control surface still publishes.
    pub fn is_degraded(&self) -> bool {
        self.control.is_closed()
    }

    /// Tear both surfaces down: pending flash clear cancelled, subscriptions removed.
    pub fn shutdown(&self) {
        self.control.close();
        self.display.close();
        info!("surfaces closed");
    }
}
