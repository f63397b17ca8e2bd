//! Scenario replay task.
//!
//! Dispatches the validated, time-ordered event timeline to the per-radio
//! monitor tasks, then flushes every monitor so summaries get emitted.

use log::{info, warn};

use super::types::{MonitorCommand, MonitorControlQueueSender, MonitorEvent, MonitorEventQueueSender, RadioStateChange, SimTime};

/// Routing entry binding a radio id to its monitor's channels.
pub struct ReplayRoute {
    pub radio_id: u32,
    pub event_tx: MonitorEventQueueSender,
    pub control_tx: MonitorControlQueueSender,
}

/// One timeline entry, produced from the scenario after validation.
pub struct TimedEvent {
    pub at: SimTime,
    pub radio_id: u32,
    pub change: RadioStateChange,
}

/// Replays the timeline in order and flushes all monitors afterwards.
///
/// Sends apply backpressure through the bounded event channels, so the replay
/// never outruns a slow monitor. Events for radios without a route were
/// rejected at scenario validation; hitting one here is a bug.
#[embassy_executor::task]
pub async fn replay_task(events: Vec<TimedEvent>, routes: Vec<ReplayRoute>) {
    info!("replaying {} events to {} radios", events.len(), routes.len());

    for event in events {
        let Some(route) = routes.iter().find(|r| r.radio_id == event.radio_id) else {
            warn!("no monitor for radio {}, dropping event", event.radio_id);
            continue;
        };
        route
            .event_tx
            .send(MonitorEvent {
                at: event.at,
                change: event.change,
            })
            .await;
    }

    info!("timeline exhausted, flushing monitors");
    for route in &routes {
        route.control_tx.send(MonitorCommand::Flush).await;
    }
}
