//! # FocusBeam Core Library
//!
//! This library provides the core logic for the FocusBeam interval timer:
//! three session types (focus, short break, long break) with bounded
//! durations, a countdown, and a daily tally of completed focus sessions.
//! Hosts (the terminal UI in `focusbeam-cli`) only render snapshots and
//! forward user intents.
//!
//! ## Architecture
//!
//! - **Session Timer**: A one-second state machine that requires the caller
//!   to invoke `tick()` once per elapsed second while running
//! - **Driver**: A tokio task that owns the timer, ticks it, and publishes
//!   snapshots and events
//! - **Storage**: TOML configuration seeding the initial durations
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: Core timer state machine
//! - [`TimerDriver`]: Cancellable one-second ticker around the timer
//! - [`Config`]: Application configuration management

pub mod timer;
pub mod storage;
pub mod events;
pub mod error;

pub use timer::{
    format_clock, DailyStats, DurationConfig, Intent, Phase, SessionTimer, SessionType, Snapshot,
    Step, TimerDriver, TimerHandle,
};
pub use storage::Config;
pub use events::Event;
pub use error::{ConfigError, CoreError};
