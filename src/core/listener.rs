//! Outbound notifications from the controller.
//!
//! Listeners are called synchronously, inside the controller call that caused
//! the transition, so they run on the same logical thread as the host loop.

use std::sync::mpsc::Sender;

use super::session::Session;

/// Receives the controller's lifecycle notifications.
#[cfg_attr(test, mockall::automock)]
pub trait SessionListener {
    /// A tick was applied; `seconds_remaining` is the new countdown value.
    fn on_tick(&mut self, interval_index: u32, seconds_remaining: u32);

    /// The interval at `completed_index` finished.
    fn on_interval_complete(&mut self, completed_index: u32);

    /// The last interval finished; `session` is already finalized.
    fn on_session_complete(&mut self, session: &Session);
}

/// A notification as a value, for hosts that drain events from a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// See [`SessionListener::on_tick`].
    Tick {
        /// Index of the interval in progress.
        interval_index: u32,
        /// Countdown after the tick.
        seconds_remaining: u32,
    },
    /// See [`SessionListener::on_interval_complete`].
    IntervalComplete {
        /// Index of the interval that finished.
        completed_index: u32,
    },
    /// See [`SessionListener::on_session_complete`].
    SessionComplete {
        /// The finalized session.
        session: Session,
    },
}

impl SessionEvent {
    /// Whether this is a tick.
    #[must_use]
    pub const fn is_tick(&self) -> bool {
        matches!(self, Self::Tick { .. })
    }
}

// A dropped receiver means the host has shut down; events are discarded.
impl SessionListener for Sender<SessionEvent> {
    fn on_tick(&mut self, interval_index: u32, seconds_remaining: u32) {
        self.send(SessionEvent::Tick {
            interval_index,
            seconds_remaining,
        })
        .ok();
    }

    fn on_interval_complete(&mut self, completed_index: u32) {
        self.send(SessionEvent::IntervalComplete { completed_index })
            .ok();
    }

    fn on_session_complete(&mut self, session: &Session) {
        self.send(SessionEvent::SessionComplete {
            session: session.clone(),
        })
        .ok();
    }
}
