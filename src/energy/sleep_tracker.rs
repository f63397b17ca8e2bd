//! Sleep-interval tracking across radio mode transitions.
//!
//! Detects entry into and exit from the Sleep mode and accumulates the total
//! sleep dwell time and episode count over a run. One accumulator serves
//! exactly one radio and is owned by that radio's monitor task.

use embassy_time::Duration;

use super::types::{RadioMode, SimTime};

/// Sleep-state transition detected by [`SleepAccumulator::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepEvent {
    /// The radio just entered Sleep mode.
    Started,
    /// The radio just left Sleep mode; carries the running total including
    /// the episode that ended.
    Ended { total_so_far: Duration },
}

/// Mutable sleep bookkeeping for a single radio.
///
/// `previous_mode` is the only history the monitoring pipeline keeps between
/// events; it must be consumed before the power model sees the new state.
#[derive(Debug, Clone)]
pub struct SleepAccumulator {
    previous_mode: RadioMode,
    sleep_started_at: Option<SimTime>,
    total_sleep: Duration,
    sleep_episodes: u64,
}

impl SleepAccumulator {
    /// Seeds the accumulator from the radio's mode at observation start. A
    /// radio already asleep is treated as having entered Sleep at time zero.
    pub fn new(initial_mode: RadioMode) -> Self {
        let sleep_started_at = if initial_mode == RadioMode::Sleep {
            Some(Duration::from_ticks(0))
        } else {
            None
        };
        Self {
            previous_mode: initial_mode,
            sleep_started_at,
            total_sleep: Duration::from_ticks(0),
            sleep_episodes: 0,
        }
    }

    /// Feeds one mode observation into the tracker.
    ///
    /// Emits [`SleepEvent::Started`] on a not-Sleep→Sleep transition and
    /// [`SleepEvent::Ended`] on Sleep→not-Sleep, in which case the episode
    /// duration is added to the running total first. The previous-mode
    /// register is updated last so the duration always uses the old state.
    pub fn observe(&mut self, new_mode: RadioMode, now: SimTime) -> Option<SleepEvent> {
        let event = if new_mode == RadioMode::Sleep && self.previous_mode != RadioMode::Sleep {
            self.sleep_started_at = Some(now);
            Some(SleepEvent::Started)
        } else if self.previous_mode == RadioMode::Sleep && new_mode != RadioMode::Sleep {
            if let Some(started) = self.sleep_started_at.take() {
                self.total_sleep += now - started;
                self.sleep_episodes += 1;
                Some(SleepEvent::Ended { total_so_far: self.total_sleep })
            } else {
                None
            }
        } else {
            None
        };
        self.previous_mode = new_mode;
        event
    }

    /// Cumulative time spent asleep over completed episodes.
    pub fn total_sleep(&self) -> Duration {
        self.total_sleep
    }

    /// Number of completed sleep episodes.
    pub fn sleep_episodes(&self) -> u64 {
        self.sleep_episodes
    }
}
