//! Radio energy monitoring core.
//!
//! This module provides the power-accounting pipeline for replayed radio
//! state traces. It integrates:
//! - Radio state snapshots and state-change events
//! - A pure power model mapping a snapshot to a total/RX/TX breakdown
//! - A sleep tracker accumulating sleep dwell time and episode counts
//! - Per-radio monitor tasks and the replay task driving them
//!
//! ## Module Organization
//!
//! - `types`: Core data structures (state enums, events, channels)
//! - `power_model`: Power profiles and the breakdown computation
//! - `sleep_tracker`: Sleep entry/exit detection and accumulation
//! - `monitor`: Per-radio task combining tracker and model
//! - `replay`: Timeline dispatch task
//!
//! ## Public API
//!
//! The entry points are `monitor_task` and `replay_task`, spawned on the
//! Embassy executor. Telemetry flows back on the channel defined in `types`.

pub mod monitor;
pub mod power_model;
pub mod replay;
pub mod sleep_tracker;
pub mod types;

// Re-export the tasks for convenience
pub use monitor::monitor_task;
pub use replay::replay_task;

// Re-export commonly used types
pub use power_model::{PowerBreakdown, PowerProfile};
pub use sleep_tracker::SleepEvent;
