mod driver;
mod engine;
mod session;
mod stats;

pub use driver::{Intent, TimerDriver, TimerHandle};
pub use engine::{Phase, SessionTimer, Snapshot, Step};
pub use session::{format_clock, DurationConfig, SessionType, DURATION_STEP_MINUTES};
pub use stats::DailyStats;
