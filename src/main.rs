//! Radio energy monitor: replays a radio state-change scenario and reports
//! per-radio power draw (total/RX/TX) and sleep statistics.

use anyhow::Context;
use embassy_executor::{Executor, Spawner};
use env_logger::Builder;
use futures::executor::block_on;
use log::{LevelFilter, debug, info};
use std::path::Path;
use std::thread;

use crate::energy::PowerProfile;
use crate::energy::replay::{ReplayRoute, TimedEvent};
use crate::energy::types::{
    MonitorControlQueue, MonitorControlQueueReceiver, MonitorEventQueue, MonitorEventQueueReceiver,
    RadioMode, TelemetryMessage, TelemetryQueue, TelemetryQueueReceiver, TelemetryQueueSender,
};
use crate::profiles::ProfileLibrary;
use crate::scenario::Scenario;
use crate::telemetry::TelemetryRecorder;

mod energy;
mod profiles;
mod scenario;
mod telemetry;

/// Everything needed to spawn one radio's monitor task.
struct MonitorSpec {
    radio_id: u32,
    profile: PowerProfile,
    initial_mode: RadioMode,
}

fn embassy_init(
    spawner: Spawner,
    monitors: Vec<(MonitorSpec, MonitorEventQueueReceiver, MonitorControlQueueReceiver)>,
    timeline: Vec<TimedEvent>,
    routes: Vec<ReplayRoute>,
    telemetry_tx: TelemetryQueueSender,
) {
    for (spec, event_rx, control_rx) in monitors {
        let _ = spawner.spawn(energy::monitor_task(
            spec.radio_id,
            spec.profile,
            spec.initial_mode,
            event_rx,
            control_rx,
            telemetry_tx,
        ));
    }
    let _ = spawner.spawn(energy::replay_task(timeline, routes));
}

fn main() -> anyhow::Result<()> {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("radio_energy_monitor"), LevelFilter::Debug)
        .init();

    info!("Starting up");

    let mut args = std::env::args().skip(1);
    let scenario_path = args.next().context("usage: radio-energy-monitor <scenario.json> [profiles.toml]")?;
    let profiles_path = args.next();

    let library = match &profiles_path {
        Some(path) => ProfileLibrary::load(Path::new(path))
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("loading power profiles from {}", path))?,
        None => ProfileLibrary::builtin(),
    };

    let scenario = Scenario::load(Path::new(&scenario_path)).with_context(|| format!("loading scenario from {}", scenario_path))?;
    info!("loaded scenario: {} radios, {} events", scenario.radios.len(), scenario.events.len());

    let telemetry_queue: &'static TelemetryQueue = Box::leak(Box::new(TelemetryQueue::new()));
    let telemetry_tx = telemetry_queue.sender();
    let telemetry_rx: TelemetryQueueReceiver = telemetry_queue.receiver();

    // Per-radio queues are leaked to satisfy the 'static lifetimes the
    // Embassy channels require; they live for the whole process anyway.
    let mut monitors = Vec::new();
    let mut routes = Vec::new();
    for radio in &scenario.radios {
        let profile = library
            .resolve(radio.profile.as_deref())
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("radio {}", radio.radio_id))?;

        let event_queue: &'static MonitorEventQueue = Box::leak(Box::new(MonitorEventQueue::new()));
        let control_queue: &'static MonitorControlQueue = Box::leak(Box::new(MonitorControlQueue::new()));
        routes.push(ReplayRoute {
            radio_id: radio.radio_id,
            event_tx: event_queue.sender(),
            control_tx: control_queue.sender(),
        });
        monitors.push((
            MonitorSpec {
                radio_id: radio.radio_id,
                profile: *profile,
                initial_mode: radio.initial_mode,
            },
            event_queue.receiver(),
            control_queue.receiver(),
        ));
    }

    let timeline = scenario.timeline();
    let open_monitors = monitors.len();

    // Spawn Embassy executor on a dedicated background thread
    let _embassy_handle = thread::Builder::new()
        .stack_size(32 * 1024 * 1024)
        .name("embassy-executor".to_string())
        .spawn(move || {
            // Leak the executor to satisfy the 'static lifetime required by run()
            let executor: &'static mut Executor = Box::leak(Box::new(Executor::new()));
            executor.run(move |spawner| embassy_init(spawner, monitors, timeline, routes, telemetry_tx));
        })
        .expect("failed to spawn embassy thread");

    // Drain telemetry on the main thread until every monitor has flushed.
    let mut recorder = TelemetryRecorder::new();
    let mut remaining = open_monitors;
    while remaining > 0 {
        match block_on(telemetry_rx.receive()) {
            TelemetryMessage::Sample(sample) => {
                debug!(
                    "t={} ms | radio={} | total={:.3} mW | rx={:.3} mW | tx={:.3} mW",
                    sample.at.as_millis(),
                    sample.radio_id,
                    sample.breakdown.total * 1000.0,
                    sample.breakdown.rx * 1000.0,
                    sample.breakdown.tx * 1000.0,
                );
                recorder.record_sample(sample);
            }
            TelemetryMessage::Summary(summary) => {
                recorder.record_summary(summary);
                remaining -= 1;
            }
        }
    }

    recorder.log_report();
    Ok(())
}
