//! Per-radio asynchronous monitor task.
//!
//! Each monitored radio runs an independent task that:
//! - Owns the radio's state snapshot, sleep accumulator, and power profile
//! - Consumes state-change events from the replay task
//! - Publishes a telemetry sample per event and a summary on flush

use embassy_futures::select::{Either, select};
use log::debug;

use super::power_model::{self, PowerBreakdown, PowerProfile};
use super::sleep_tracker::{SleepAccumulator, SleepEvent};
use super::types::{
    MAX_RADIO_COUNT, MonitorCommand, MonitorControlQueueReceiver, MonitorEventQueueReceiver,
    RadioMode, RadioStateChange, RadioStateSnapshot, RadioSummary, SimTime, TelemetryMessage,
    TelemetryQueueSender, TelemetrySample,
};

/// Context for monitoring a single radio's power and sleep state.
pub struct MonitorContext {
    radio_id: u32,
    profile: PowerProfile,
    snapshot: RadioStateSnapshot,
    accumulator: SleepAccumulator,
    events_processed: u64,
    last_breakdown: PowerBreakdown,
}

impl MonitorContext {
    pub fn new(radio_id: u32, profile: PowerProfile, initial_mode: RadioMode) -> Self {
        let snapshot = RadioStateSnapshot::initial(initial_mode);
        let last_breakdown = power_model::compute_for_snapshot(&profile, &snapshot);
        Self {
            radio_id,
            profile,
            snapshot,
            accumulator: SleepAccumulator::new(initial_mode),
            events_processed: 0,
            last_breakdown,
        }
    }

    /// Processes one state-change event into a telemetry sample.
    ///
    /// The sleep tracker consumes the mode before the power model evaluates
    /// the new state; the tracker owns the only between-event history.
    pub fn handle_state_change(&mut self, at: SimTime, change: RadioStateChange) -> TelemetrySample {
        self.snapshot.apply(change);
        let sleep_event = self.accumulator.observe(self.snapshot.mode, at);
        let breakdown = power_model::compute_for_snapshot(&self.profile, &self.snapshot);
        self.last_breakdown = breakdown;
        self.events_processed += 1;
        TelemetrySample {
            radio_id: self.radio_id,
            at,
            breakdown,
            sleep_event,
        }
    }

    /// End-of-run scalars for this radio.
    pub fn summary(&self) -> RadioSummary {
        RadioSummary {
            radio_id: self.radio_id,
            events_processed: self.events_processed,
            total_sleep: self.accumulator.total_sleep(),
            sleep_episodes: self.accumulator.sleep_episodes(),
            final_breakdown: self.last_breakdown,
        }
    }
}

/// Per-radio task consuming state-change events and publishing telemetry.
///
/// Events and control commands arrive on separate channels. The replay task
/// enqueues every event before it sends Flush, and `select` polls the event
/// channel first, so no event is lost to an early flush.
#[embassy_executor::task(pool_size = MAX_RADIO_COUNT)]
pub async fn monitor_task(
    radio_id: u32,
    profile: PowerProfile,
    initial_mode: RadioMode,
    event_rx: MonitorEventQueueReceiver,
    control_rx: MonitorControlQueueReceiver,
    telemetry_tx: TelemetryQueueSender,
) {
    let mut context = MonitorContext::new(radio_id, profile, initial_mode);
    debug!("radio {}: monitor started in mode {:?}", radio_id, initial_mode);

    loop {
        match select(event_rx.receive(), control_rx.receive()).await {
            Either::First(event) => {
                let sample = context.handle_state_change(event.at, event.change);
                match sample.sleep_event {
                    Some(SleepEvent::Started) => {
                        debug!("radio {}: entered sleep at {} ms", radio_id, event.at.as_millis());
                    }
                    Some(SleepEvent::Ended { total_so_far }) => {
                        debug!(
                            "radio {}: left sleep at {} ms, total asleep {} ms",
                            radio_id,
                            event.at.as_millis(),
                            total_so_far.as_millis()
                        );
                    }
                    None => {}
                }
                telemetry_tx.send(TelemetryMessage::Sample(sample)).await;
            }
            Either::Second(MonitorCommand::Flush) => {
                telemetry_tx.send(TelemetryMessage::Summary(context.summary())).await;
                debug!("radio {}: monitor flushed", radio_id);
                break;
            }
        }
    }
}
