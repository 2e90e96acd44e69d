//! Session timer implementation.
//!
//! The session timer is a one-second-granularity state machine. It does not
//! use internal threads - the caller (usually [`super::TimerDriver`]) is
//! responsible for calling `tick()` once per elapsed second while running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Finished -> Running ...
//!   ^        |                     |
//!   +--------+---- reset / select -+
//! ```
//!
//! ## Usage
//!
//! ```
//! use focusbeam_core::{SessionTimer, SessionType};
//!
//! let mut timer = SessionTimer::default();
//! timer.adjust_duration(SessionType::Focus, -40);
//! timer.start();
//! for _ in 0..5 * 60 {
//!     timer.tick();
//! }
//! assert!(timer.just_finished());
//! assert_eq!(timer.stats().completed_focus_blocks, 1);
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::session::{DurationConfig, SessionType, DURATION_STEP_MINUTES};
use super::stats::DailyStats;
use crate::events::Event;

/// Coarse phase derived from the running and just-finished flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    /// Countdown reached zero and nothing has been started since.
    Finished,
}

/// Direction for a single duration control press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

/// Read-only view handed to hosts for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_type: SessionType,
    pub seconds_left: u64,
    pub total_seconds: u64,
    pub is_running: bool,
    pub just_finished: bool,
    pub phase: Phase,
    /// 0.0 .. 1.0 elapsed fraction of the current session.
    pub progress: f64,
    pub durations: DurationConfig,
    pub stats: DailyStats,
}

/// Core session timer.
///
/// Owns the duration configuration, countdown state and the daily tally.
/// No operation fails: out-of-range durations are clamped, and calls that
/// make no sense in the current state are ignored and return `None`.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    durations: DurationConfig,
    current_type: SessionType,
    seconds_left: u64,
    is_running: bool,
    just_finished: bool,
    stats: DailyStats,
}

impl SessionTimer {
    /// Create an idle timer on `initial` with a full countdown loaded.
    pub fn new(durations: DurationConfig, initial: SessionType) -> Self {
        Self {
            durations,
            current_type: initial,
            seconds_left: durations.seconds(initial),
            is_running: false,
            just_finished: false,
            stats: DailyStats::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_type(&self) -> SessionType {
        self.current_type
    }

    pub fn seconds_left(&self) -> u64 {
        self.seconds_left
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn just_finished(&self) -> bool {
        self.just_finished
    }

    pub fn durations(&self) -> &DurationConfig {
        &self.durations
    }

    pub fn stats(&self) -> DailyStats {
        self.stats
    }

    /// Full length of the current session in seconds.
    pub fn total_seconds(&self) -> u64 {
        self.durations.seconds(self.current_type)
    }

    pub fn phase(&self) -> Phase {
        if self.is_running {
            Phase::Running
        } else if self.just_finished {
            Phase::Finished
        } else {
            Phase::Idle
        }
    }

    /// 0.0 .. 1.0 progress within the current session.
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds();
        if total == 0 {
            return 0.0;
        }
        (1.0 - (self.seconds_left as f64 / total as f64)).clamp(0.0, 1.0)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_type: self.current_type,
            seconds_left: self.seconds_left,
            total_seconds: self.total_seconds(),
            is_running: self.is_running,
            just_finished: self.just_finished,
            phase: self.phase(),
            progress: self.progress(),
            durations: self.durations,
            stats: self.stats,
        }
    }

    /// Wrap the current snapshot in an event.
    pub fn snapshot_event(&self) -> Event {
        Event::StateSnapshot {
            snapshot: self.snapshot(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch session type.
    ///
    /// Switching to another type always stops the countdown and loads the
    /// new type's full duration. Re-selecting the active type reloads it
    /// when idle or finished and is ignored while running.
    pub fn select_type(&mut self, session: SessionType) -> Option<Event> {
        let from = self.current_type;
        if session == from && self.is_running {
            return None;
        }
        let interrupted = self.is_running;
        self.current_type = session;
        self.is_running = false;
        self.reload();
        if interrupted {
            tracing::debug!(from = from.as_str(), to = session.as_str(), "switch stopped running session");
        }
        Some(Event::SessionSelected {
            from,
            to: session,
            interrupted,
            at: Utc::now(),
        })
    }

    /// Add `delta_minutes` to the configured duration of `session`, clamped
    /// into its bounds.
    ///
    /// Ignored while the timer is running. Changing the active type's
    /// duration reloads the countdown.
    pub fn adjust_duration(&mut self, session: SessionType, delta_minutes: i64) -> Option<Event> {
        if self.is_running {
            return None;
        }
        let before = self.durations.minutes(session);
        let after = self.durations.adjust(session, delta_minutes);
        if after == before {
            return None;
        }
        if session == self.current_type {
            self.reload();
        }
        Some(Event::DurationChanged {
            session_type: session,
            minutes: after,
            at: Utc::now(),
        })
    }

    /// One press of a duration control: ±5 minutes.
    pub fn step_duration(&mut self, session: SessionType, step: Step) -> Option<Event> {
        let delta = match step {
            Step::Up => DURATION_STEP_MINUTES,
            Step::Down => -DURATION_STEP_MINUTES,
        };
        self.adjust_duration(session, delta)
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.is_running {
            return None; // Already running.
        }
        let total = self.total_seconds();
        let fresh = self.seconds_left == 0 || self.seconds_left == total;
        if self.seconds_left == 0 {
            self.reload();
        }
        self.just_finished = false;
        self.is_running = true;
        if fresh {
            Some(Event::TimerStarted {
                session_type: self.current_type,
                duration_secs: total,
                at: Utc::now(),
            })
        } else {
            Some(Event::TimerResumed {
                session_type: self.current_type,
                seconds_left: self.seconds_left,
                at: Utc::now(),
            })
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.is_running = false;
        Some(Event::TimerPaused {
            session_type: self.current_type,
            seconds_left: self.seconds_left,
            at: Utc::now(),
        })
    }

    /// Pause when running, start otherwise.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.is_running = false;
        self.reload();
        Some(Event::TimerReset {
            session_type: self.current_type,
            seconds_left: self.seconds_left,
            at: Utc::now(),
        })
    }

    /// Apply one elapsed second. Returns `Some(Event::TimerCompleted)` when
    /// the session finishes.
    ///
    /// Ticks that arrive while not running are discarded.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left > 0 {
            return None;
        }

        self.is_running = false;
        self.just_finished = true;
        let duration_min = self.durations.minutes(self.current_type);
        if self.current_type == SessionType::Focus {
            self.stats.record_focus(duration_min);
        }
        tracing::info!(
            session = self.current_type.as_str(),
            minutes = duration_min,
            completed_focus_blocks = self.stats.completed_focus_blocks,
            "session completed"
        );
        Some(Event::TimerCompleted {
            session_type: self.current_type,
            duration_min,
            stats: self.stats,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reload(&mut self) {
        self.seconds_left = self.total_seconds();
        self.just_finished = false;
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(DurationConfig::default(), SessionType::Focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ticks(timer: &mut SessionTimer, n: u64) {
        for _ in 0..n {
            timer.tick();
        }
    }

    #[test]
    fn new_timer_is_idle_with_full_duration() {
        let timer = SessionTimer::default();
        assert_eq!(timer.phase(), Phase::Idle);
        assert_eq!(timer.current_type(), SessionType::Focus);
        assert_eq!(timer.seconds_left(), 45 * 60);
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn start_pause_resume() {
        let mut timer = SessionTimer::default();
        assert!(matches!(timer.start(), Some(Event::TimerStarted { .. })));
        assert_eq!(timer.phase(), Phase::Running);
        assert!(timer.start().is_none());

        run_ticks(&mut timer, 10);
        assert!(matches!(timer.pause(), Some(Event::TimerPaused { seconds_left: 2690, .. })));
        assert_eq!(timer.phase(), Phase::Idle);
        assert!(timer.pause().is_none());

        assert!(matches!(timer.start(), Some(Event::TimerResumed { seconds_left: 2690, .. })));
        assert_eq!(timer.seconds_left(), 2690);
    }

    #[test]
    fn full_focus_session_updates_stats() {
        let mut timer = SessionTimer::default();
        timer.start();
        run_ticks(&mut timer, 2699);
        assert_eq!(timer.seconds_left(), 1);
        assert_eq!(timer.stats().completed_focus_blocks, 0);

        let event = timer.tick();
        assert!(matches!(
            event,
            Some(Event::TimerCompleted { session_type: SessionType::Focus, duration_min: 45, .. })
        ));
        assert_eq!(timer.seconds_left(), 0);
        assert!(!timer.is_running());
        assert!(timer.just_finished());
        assert_eq!(timer.phase(), Phase::Finished);
        assert_eq!(timer.progress(), 1.0);
        assert_eq!(timer.stats().completed_focus_blocks, 1);
        assert_eq!(timer.stats().total_focus_minutes, 45);
    }

    #[test]
    fn break_sessions_leave_stats_untouched() {
        for session in [SessionType::ShortBreak, SessionType::LongBreak] {
            let mut timer = SessionTimer::default();
            timer.select_type(session);
            timer.start();
            let total = timer.total_seconds();
            run_ticks(&mut timer, total);
            assert!(timer.just_finished());
            assert_eq!(timer.stats(), DailyStats::default());
        }
    }

    #[test]
    fn tick_after_pause_is_discarded() {
        let mut timer = SessionTimer::default();
        timer.start();
        run_ticks(&mut timer, 3);
        timer.pause();
        assert!(timer.tick().is_none());
        assert_eq!(timer.seconds_left(), 2700 - 3);
    }

    #[test]
    fn start_after_finish_reloads() {
        let mut timer = SessionTimer::default();
        timer.adjust_duration(SessionType::Focus, -40);
        timer.start();
        run_ticks(&mut timer, 300);
        assert!(timer.just_finished());

        assert!(matches!(timer.start(), Some(Event::TimerStarted { duration_secs: 300, .. })));
        assert_eq!(timer.seconds_left(), 300);
        assert!(!timer.just_finished());
        assert!(timer.is_running());
    }

    #[test]
    fn completed_minutes_use_duration_at_completion() {
        let mut timer = SessionTimer::default();
        timer.adjust_duration(SessionType::Focus, -40);
        timer.start();
        run_ticks(&mut timer, 300);
        timer.adjust_duration(SessionType::Focus, 10);
        timer.start();
        run_ticks(&mut timer, 900);
        assert_eq!(timer.stats().completed_focus_blocks, 2);
        assert_eq!(timer.stats().total_focus_minutes, 5 + 15);
    }

    #[test]
    fn reset_from_any_state() {
        let mut timer = SessionTimer::default();
        timer.reset();
        assert_eq!(timer.seconds_left(), 2700);

        timer.start();
        run_ticks(&mut timer, 100);
        timer.reset();
        assert_eq!(timer.seconds_left(), 2700);
        assert!(!timer.is_running());

        timer.start();
        run_ticks(&mut timer, 2700);
        assert!(timer.just_finished());
        timer.reset();
        assert_eq!(timer.seconds_left(), 2700);
        assert!(!timer.just_finished());
        assert_eq!(timer.phase(), Phase::Idle);
    }

    #[test]
    fn adjust_while_running_is_ignored() {
        let mut timer = SessionTimer::default();
        timer.start();
        run_ticks(&mut timer, 5);
        assert!(timer.adjust_duration(SessionType::Focus, 5).is_none());
        assert!(timer.adjust_duration(SessionType::LongBreak, 5).is_none());
        assert_eq!(timer.durations().minutes(SessionType::Focus), 45);
        assert_eq!(timer.durations().minutes(SessionType::LongBreak), 20);
        assert_eq!(timer.seconds_left(), 2695);
    }

    #[test]
    fn adjust_active_type_reloads_countdown() {
        let mut timer = SessionTimer::default();
        timer.start();
        run_ticks(&mut timer, 60);
        timer.pause();

        timer.step_duration(SessionType::Focus, Step::Up);
        assert_eq!(timer.durations().minutes(SessionType::Focus), 50);
        assert_eq!(timer.seconds_left(), 50 * 60);
    }

    #[test]
    fn adjust_other_type_keeps_countdown() {
        let mut timer = SessionTimer::default();
        timer.start();
        run_ticks(&mut timer, 60);
        timer.pause();

        timer.step_duration(SessionType::ShortBreak, Step::Down);
        assert_eq!(timer.durations().minutes(SessionType::ShortBreak), 5);
        assert_eq!(timer.seconds_left(), 2640);
    }

    #[test]
    fn adjust_at_bound_returns_none() {
        let mut timer = SessionTimer::default();
        timer.adjust_duration(SessionType::ShortBreak, 100);
        assert!(timer.adjust_duration(SessionType::ShortBreak, 5).is_none());
        assert_eq!(timer.durations().minutes(SessionType::ShortBreak), 60);
    }

    #[test]
    fn select_other_type_while_running_stops_and_reloads() {
        let mut timer = SessionTimer::default();
        timer.start();
        run_ticks(&mut timer, 30);

        let event = timer.select_type(SessionType::ShortBreak);
        assert!(matches!(event, Some(Event::SessionSelected { interrupted: true, .. })));
        assert!(!timer.is_running());
        assert_eq!(timer.current_type(), SessionType::ShortBreak);
        assert_eq!(timer.seconds_left(), 10 * 60);
    }

    #[test]
    fn select_same_type_while_running_is_ignored() {
        let mut timer = SessionTimer::default();
        timer.start();
        run_ticks(&mut timer, 30);
        assert!(timer.select_type(SessionType::Focus).is_none());
        assert!(timer.is_running());
        assert_eq!(timer.seconds_left(), 2670);
    }

    #[test]
    fn select_clears_finished_flag() {
        let mut timer = SessionTimer::default();
        timer.select_type(SessionType::ShortBreak);
        timer.start();
        run_ticks(&mut timer, 600);
        assert!(timer.just_finished());

        timer.select_type(SessionType::ShortBreak);
        assert!(!timer.just_finished());
        assert_eq!(timer.seconds_left(), 600);
    }

    #[test]
    fn toggle_twice_resumes_from_pause_point() {
        let mut timer = SessionTimer::default();
        timer.start();
        run_ticks(&mut timer, 1700);
        timer.pause();
        assert_eq!(timer.seconds_left(), 1000);

        timer.toggle();
        timer.toggle();
        assert!(!timer.is_running());
        timer.toggle();
        assert!(timer.is_running());
        assert_eq!(timer.seconds_left(), 1000);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut timer = SessionTimer::default();
        timer.start();
        run_ticks(&mut timer, 675);
        let snap = timer.snapshot();
        assert_eq!(snap.current_type, SessionType::Focus);
        assert_eq!(snap.seconds_left, 2025);
        assert_eq!(snap.total_seconds, 2700);
        assert!(snap.is_running);
        assert!(!snap.just_finished);
        assert_eq!(snap.phase, Phase::Running);
        assert!((snap.progress - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn snapshot_event_serializes_with_type_tag() {
        let timer = SessionTimer::default();
        let json = serde_json::to_value(timer.snapshot_event()).unwrap();
        assert_eq!(json["type"], "StateSnapshot");
        assert_eq!(json["snapshot"]["seconds_left"], 2700);
        assert_eq!(json["snapshot"]["current_type"], "focus");
        assert_eq!(json["snapshot"]["phase"], "idle");
    }
}
