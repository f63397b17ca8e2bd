//! Type definitions for the energy monitor.
//!
//! Contains the data structures shared across the monitoring pipeline:
//! - Radio operating state enums (mode, reception/transmission sub-states,
//!   signal parts)
//! - State-change events delivered by the replay task
//! - Telemetry envelopes flowing back to the recorder
//! - Communication channels and queues

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Duration;
use serde::Deserialize;

use super::power_model::PowerBreakdown;
use super::sleep_tracker::SleepEvent;

/// Virtual timestamp: offset from the start of the replayed run.
pub type SimTime = Duration;

/// Upper bound on radios in a single scenario; sizes the monitor task pool.
pub const MAX_RADIO_COUNT: usize = 64;

/// Depth of the per-radio event channel (replay→monitor). Small to keep
/// backpressure on the replay loop instead of buffering a whole timeline.
pub const MONITOR_EVENT_QUEUE_SIZE: usize = 16;
/// Bounded channel used to deliver state-change events to a monitor.
pub type MonitorEventQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, MonitorEvent, MONITOR_EVENT_QUEUE_SIZE>;
/// Receiver side of the monitor event channel.
pub type MonitorEventQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, MonitorEvent, MONITOR_EVENT_QUEUE_SIZE>;
/// Sender side of the monitor event channel.
pub type MonitorEventQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, MonitorEvent, MONITOR_EVENT_QUEUE_SIZE>;

/// Depth of the per-radio control channel (replay→monitor commands).
pub const MONITOR_CONTROL_QUEUE_SIZE: usize = 4;
/// Bounded channel used to send control commands to a monitor.
pub type MonitorControlQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, MonitorCommand, MONITOR_CONTROL_QUEUE_SIZE>;
/// Receiver side of the monitor control channel.
pub type MonitorControlQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, MonitorCommand, MONITOR_CONTROL_QUEUE_SIZE>;
/// Sender side of the monitor control channel.
pub type MonitorControlQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, MonitorCommand, MONITOR_CONTROL_QUEUE_SIZE>;

/// Depth of the global telemetry channel (monitors→recorder).
pub const TELEMETRY_CHANNEL_SIZE: usize = 100;
/// Bounded channel used by monitor tasks to publish telemetry.
pub type TelemetryQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, TelemetryMessage, TELEMETRY_CHANNEL_SIZE>;
/// Receiver side of the telemetry channel.
pub type TelemetryQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, TelemetryMessage, TELEMETRY_CHANNEL_SIZE>;
/// Sender side of the telemetry channel.
pub type TelemetryQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, TelemetryMessage, TELEMETRY_CHANNEL_SIZE>;

/// Operating mode of a radio transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RadioMode {
    Off,
    Sleep,
    Switching,
    Receiver,
    Transmitter,
    Transceiver,
}

/// Reception sub-state; meaningful only in Receiver/Transceiver mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReceptionState {
    /// Listening on a clear channel.
    Idle,
    /// Channel occupied but no decodable frame locked.
    Busy,
    /// Actively decoding a frame.
    Receiving,
    Undefined,
}

/// Transmission sub-state; meaningful only in Transmitter/Transceiver mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransmissionState {
    Idle,
    Transmitting,
    Undefined,
}

/// Sub-segment of an over-the-air frame currently being received or
/// transmitted. Each part may carry a distinct power cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalPart {
    None,
    Whole,
    Preamble,
    Header,
    Data,
}

/// One radio-state-change notification, mirroring the five change kinds a
/// radio reports: mode, the two sub-states, and the two signal parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum RadioStateChange {
    Mode(RadioMode),
    ReceptionState(ReceptionState),
    TransmissionState(TransmissionState),
    ReceivedSignalPart(SignalPart),
    TransmittedSignalPart(SignalPart),
}

/// Point-in-time snapshot of a radio's complete operating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioStateSnapshot {
    pub mode: RadioMode,
    pub reception: ReceptionState,
    pub transmission: TransmissionState,
    pub received_part: SignalPart,
    pub transmitted_part: SignalPart,
}

impl RadioStateSnapshot {
    /// Snapshot at observation start: sub-states are unknown until the radio
    /// reports them, so they begin Undefined with no signal part in flight.
    pub fn initial(mode: RadioMode) -> Self {
        Self {
            mode,
            reception: ReceptionState::Undefined,
            transmission: TransmissionState::Undefined,
            received_part: SignalPart::None,
            transmitted_part: SignalPart::None,
        }
    }

    /// Folds one state-change notification into the snapshot.
    pub fn apply(&mut self, change: RadioStateChange) {
        match change {
            RadioStateChange::Mode(mode) => self.mode = mode,
            RadioStateChange::ReceptionState(state) => self.reception = state,
            RadioStateChange::TransmissionState(state) => self.transmission = state,
            RadioStateChange::ReceivedSignalPart(part) => self.received_part = part,
            RadioStateChange::TransmittedSignalPart(part) => self.transmitted_part = part,
        }
    }
}

/// Envelope for state-change events delivered to a monitor task.
#[derive(Debug, Clone, Copy)]
pub struct MonitorEvent {
    /// Virtual timestamp of the change.
    pub at: SimTime,
    pub change: RadioStateChange,
}

/// Control commands for a monitor task.
#[derive(Debug, Clone, Copy)]
pub enum MonitorCommand {
    /// Terminal flush: emit the radio's summary and stop monitoring.
    Flush,
}

/// Per-event telemetry record produced by a monitor.
#[derive(Debug, Clone, Copy)]
pub struct TelemetrySample {
    pub radio_id: u32,
    /// Virtual timestamp of the event that produced this sample.
    pub at: SimTime,
    /// Power draw after the state change was applied.
    pub breakdown: PowerBreakdown,
    /// Sleep-state transition triggered by this event, if any.
    pub sleep_event: Option<SleepEvent>,
}

/// End-of-run summary for one radio (the scalars reported once per run).
#[derive(Debug, Clone, Copy)]
pub struct RadioSummary {
    pub radio_id: u32,
    /// Number of state-change events processed.
    pub events_processed: u64,
    /// Cumulative time spent in Sleep mode.
    pub total_sleep: Duration,
    /// Number of completed sleep episodes.
    pub sleep_episodes: u64,
    /// Power draw at the last observed state.
    pub final_breakdown: PowerBreakdown,
}

/// Envelope for messages published on the telemetry channel.
#[derive(Debug, Clone, Copy)]
pub enum TelemetryMessage {
    Sample(TelemetrySample),
    Summary(RadioSummary),
}
