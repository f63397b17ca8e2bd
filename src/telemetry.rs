//! Telemetry recording and end-of-run reporting.
//!
//! Collects the samples and summaries published by the monitor tasks. Sample
//! history is kept per radio in a bounded ring buffer; running counters are
//! unaffected by history eviction.

use log::info;
use std::collections::{BTreeMap, VecDeque};

use crate::energy::SleepEvent;
use crate::energy::types::{RadioSummary, TelemetrySample};

/// Maximum sample history per radio (ring buffer). Bounded to keep memory
/// predictable over long replays.
pub const SAMPLE_HISTORY_CAPACITY: usize = 1000;

/// Accumulates telemetry for all radios over one replay run.
pub struct TelemetryRecorder {
    histories: BTreeMap<u32, VecDeque<TelemetrySample>>,
    summaries: Vec<RadioSummary>,
    samples_recorded: u64,
    sleep_events_seen: u64,
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self {
            histories: BTreeMap::new(),
            summaries: Vec::new(),
            samples_recorded: 0,
            sleep_events_seen: 0,
        }
    }

    /// Push a sample into the owning radio's bounded history, popping the
    /// oldest if at capacity.
    pub fn record_sample(&mut self, sample: TelemetrySample) {
        self.samples_recorded += 1;
        if sample.sleep_event.is_some() {
            self.sleep_events_seen += 1;
        }
        if let Some(SleepEvent::Ended { total_so_far }) = sample.sleep_event {
            info!(
                "radio {}: sleep episode ended at {} ms, cumulative sleep {} ms",
                sample.radio_id,
                sample.at.as_millis(),
                total_so_far.as_millis()
            );
        }

        let history = self.histories.entry(sample.radio_id).or_default();
        if history.len() >= SAMPLE_HISTORY_CAPACITY {
            history.pop_front();
        }
        history.push_back(sample);
    }

    pub fn record_summary(&mut self, summary: RadioSummary) {
        self.summaries.push(summary);
    }

    /// Renders the end-of-run report through the log.
    pub fn log_report(&self) {
        let mut summaries: Vec<&RadioSummary> = self.summaries.iter().collect();
        summaries.sort_by_key(|s| s.radio_id);

        info!(
            "run complete: {} samples, {} sleep transitions, {} radios",
            self.samples_recorded,
            self.sleep_events_seen,
            summaries.len()
        );
        for summary in summaries {
            info!(
                "radio {} | events={} | total-sleep={:.3} s | sleep-episodes={} | final-power={:.3} mW (rx={:.3} mW, tx={:.3} mW)",
                summary.radio_id,
                summary.events_processed,
                summary.total_sleep.as_millis() as f64 / 1000.0,
                summary.sleep_episodes,
                summary.final_breakdown.total * 1000.0,
                summary.final_breakdown.rx * 1000.0,
                summary.final_breakdown.tx * 1000.0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::PowerBreakdown;
    use embassy_time::Duration;

    fn sample(radio_id: u32, at_ms: u64) -> TelemetrySample {
        TelemetrySample {
            radio_id,
            at: Duration::from_millis(at_ms),
            breakdown: PowerBreakdown::fixed(0.001),
            sleep_event: None,
        }
    }

    #[test]
    fn history_is_bounded_but_counters_keep_running() {
        let mut recorder = TelemetryRecorder::new();
        let extra = 25;
        for i in 0..(SAMPLE_HISTORY_CAPACITY + extra) {
            recorder.record_sample(sample(1, i as u64));
        }
        assert_eq!(recorder.histories[&1].len(), SAMPLE_HISTORY_CAPACITY);
        assert_eq!(recorder.samples_recorded, (SAMPLE_HISTORY_CAPACITY + extra) as u64);
    }

    #[test]
    fn histories_are_kept_per_radio() {
        let mut recorder = TelemetryRecorder::new();
        recorder.record_sample(sample(1, 0));
        recorder.record_sample(sample(2, 0));
        recorder.record_sample(sample(2, 1));
        assert_eq!(recorder.histories[&1].len(), 1);
        assert_eq!(recorder.histories[&2].len(), 2);
        assert!(!recorder.histories.contains_key(&3));
    }

    #[test]
    fn summaries_accumulate() {
        let mut recorder = TelemetryRecorder::new();
        recorder.record_summary(RadioSummary {
            radio_id: 5,
            events_processed: 10,
            total_sleep: Duration::from_secs(2),
            sleep_episodes: 1,
            final_breakdown: PowerBreakdown::fixed(0.0),
        });
        assert_eq!(recorder.summaries.len(), 1);
        assert_eq!(recorder.summaries[0].radio_id, 5);
    }
}
