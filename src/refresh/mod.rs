//! Status refresh controller
//!
//! Build and link actions run detached, so nothing tells the tool when they
//! finish. Instead, after starting one, link state is polled every
//! [`POLL_INTERVAL`] until it flips or [`POLL_MAX_DURATION`] elapses.
//!
//! The decision logic is a plain state machine ([`RefreshController`]) that
//! takes the current time as an argument, so it is tested without sleeping.
//! The timer side ([`RefreshTicker`]) owns at most one tokio interval;
//! starting a new polling window replaces the old interval rather than
//! adding a second one.

use std::time::{Duration, Instant};
use tokio::time::{Interval, MissedTickBehavior};

use crate::constants::{POLL_INTERVAL, POLL_MAX_DURATION};

/// Where the controller is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// No action in flight
    Idle,
    /// Waiting for the link state to move away from `initial_linked`
    Polling {
        /// When the window opened
        started_at: Instant,
        /// Link state when the window opened
        initial_linked: bool,
    },
}

/// Result of feeding one observation to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Not polling; the observation was ignored
    Idle,
    /// Still waiting
    Continue,
    /// Link state differs from the start of the window; back to idle
    Changed {
        /// The new link state
        linked: bool,
    },
    /// Window exceeded the maximum duration; back to idle
    TimedOut,
}

impl PollOutcome {
    /// True for outcomes that end the window
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Changed { .. } | Self::TimedOut)
    }
}

/// Two-state polling machine
#[derive(Debug, Clone)]
pub struct RefreshController {
    state: PollState,
    max_duration: Duration,
}

impl Default for RefreshController {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshController {
    /// Controller with the standard three minute window
    #[must_use]
    pub const fn new() -> Self {
        Self::with_max_duration(POLL_MAX_DURATION)
    }

    /// Controller with a custom window length
    #[must_use]
    pub const fn with_max_duration(max_duration: Duration) -> Self {
        Self {
            state: PollState::Idle,
            max_duration,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> PollState {
        self.state
    }

    /// Whether a window is open
    #[must_use]
    pub const fn is_polling(&self) -> bool {
        matches!(self.state, PollState::Polling { .. })
    }

    /// Open a window, replacing any window already open
    pub fn start(&mut self, initial_linked: bool, now: Instant) {
        if self.is_polling() {
            tracing::debug!(target: "refresh", "Restarting polling window");
        }
        self.state = PollState::Polling {
            started_at: now,
            initial_linked,
        };
    }

    /// Close the window without an outcome
    pub fn stop(&mut self) {
        self.state = PollState::Idle;
    }

    /// Feed one link-state observation taken at `now`
    ///
    /// The timeout is checked before the observation, so a window that has
    /// run too long ends even if the state flipped on the very last tick.
    pub fn observe(&mut self, linked: bool, now: Instant) -> PollOutcome {
        let PollState::Polling {
            started_at,
            initial_linked,
        } = self.state
        else {
            return PollOutcome::Idle;
        };

        if now.saturating_duration_since(started_at) > self.max_duration {
            tracing::debug!(target: "refresh", "Polling window timed out");
            self.state = PollState::Idle;
            return PollOutcome::TimedOut;
        }

        if linked != initial_linked {
            tracing::debug!(target: "refresh", "Link state changed to {}", linked);
            self.state = PollState::Idle;
            return PollOutcome::Changed {
                linked,
            };
        }

        PollOutcome::Continue
    }
}

/// Owner of the single polling interval
#[derive(Debug, Default)]
pub struct RefreshTicker {
    interval: Option<Interval>,
}

impl RefreshTicker {
    /// No interval running
    #[must_use]
    pub const fn new() -> Self {
        Self {
            interval: None,
        }
    }

    /// Start ticking every `period`, first tick one period from now
    ///
    /// Any running interval is dropped first.
    pub fn start(&mut self, period: Duration) {
        self.interval = None;
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    /// Drop the interval
    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// Whether an interval is running
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Wait for the next tick
    ///
    /// Never resolves while stopped, which makes it safe as a `select!` arm.
    pub async fn tick(&mut self) -> Instant {
        match self.interval.as_mut() {
            Some(interval) => interval.tick().await.into_std(),
            None => std::future::pending().await,
        }
    }
}

/// Poll `probe` every `period` until the controller settles
///
/// Used by the `--watch` flag. `on_tick` sees every observation, settled or
/// not.
pub async fn poll_until_settled<P, F>(
    controller: &mut RefreshController,
    initial_linked: bool,
    period: Duration,
    mut probe: P,
    mut on_tick: F,
) -> PollOutcome
where
    P: FnMut() -> bool,
    F: FnMut(bool),
{
    let mut ticker = RefreshTicker::new();
    controller.start(initial_linked, Instant::now());
    ticker.start(period);

    loop {
        let now = ticker.tick().await;
        let linked = probe();
        on_tick(linked);
        let outcome = controller.observe(linked, now);
        if outcome.is_settled() || outcome == PollOutcome::Idle {
            ticker.stop();
            return outcome;
        }
    }
}

/// [`poll_until_settled`] with the standard period
pub async fn poll_link_state<P, F>(initial_linked: bool, probe: P, on_tick: F) -> PollOutcome
where
    P: FnMut() -> bool,
    F: FnMut(bool),
{
    let mut controller = RefreshController::new();
    poll_until_settled(&mut controller, initial_linked, POLL_INTERVAL, probe, on_tick).await
}
