use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Minutes added or removed by one press of a duration control.
pub const DURATION_STEP_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Focus,
    #[serde(alias = "short")]
    ShortBreak,
    #[serde(alias = "long")]
    LongBreak,
}

impl SessionType {
    pub const ALL: [SessionType; 3] = [
        SessionType::Focus,
        SessionType::ShortBreak,
        SessionType::LongBreak,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SessionType::Focus => "Focus",
            SessionType::ShortBreak => "Short Break",
            SessionType::LongBreak => "Long Break",
        }
    }

    /// Accent color as an `0xRRGGBB` value. Presentation only.
    pub fn accent_rgb(self) -> u32 {
        match self {
            SessionType::Focus => 0xFF6B9C,
            SessionType::ShortBreak => 0x5DD6FF,
            SessionType::LongBreak => 0xFFB86C,
        }
    }

    /// Inclusive `(min, max)` duration bounds in minutes.
    pub fn bounds(self) -> (u32, u32) {
        match self {
            SessionType::Focus => (5, 180),
            SessionType::ShortBreak => (3, 60),
            SessionType::LongBreak => (5, 90),
        }
    }

    pub fn default_minutes(self) -> u32 {
        match self {
            SessionType::Focus => 45,
            SessionType::ShortBreak => 10,
            SessionType::LongBreak => 20,
        }
    }

    /// Clamp an arbitrary (possibly negative) minute value into this type's bounds.
    pub fn clamp_minutes(self, minutes: i64) -> u32 {
        let (min, max) = self.bounds();
        minutes.clamp(min as i64, max as i64) as u32
    }

    /// The type after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            SessionType::Focus => SessionType::ShortBreak,
            SessionType::ShortBreak => SessionType::LongBreak,
            SessionType::LongBreak => SessionType::Focus,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Focus => "focus",
            SessionType::ShortBreak => "short_break",
            SessionType::LongBreak => "long_break",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "focus" => Ok(SessionType::Focus),
            "short_break" | "short" => Ok(SessionType::ShortBreak),
            "long_break" | "long" => Ok(SessionType::LongBreak),
            other => Err(format!(
                "unknown session type '{other}' (expected focus, short_break or long_break)"
            )),
        }
    }
}

/// Configured minutes per session type.
///
/// Values are always inside their type's bounds: the fields are private and
/// every constructor and setter clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDurations")]
pub struct DurationConfig {
    focus: u32,
    short_break: u32,
    long_break: u32,
}

impl DurationConfig {
    pub fn new(focus: u32, short_break: u32, long_break: u32) -> Self {
        let mut cfg = Self::default();
        cfg.set(SessionType::Focus, focus as i64);
        cfg.set(SessionType::ShortBreak, short_break as i64);
        cfg.set(SessionType::LongBreak, long_break as i64);
        cfg
    }

    pub fn minutes(&self, session: SessionType) -> u32 {
        match session {
            SessionType::Focus => self.focus,
            SessionType::ShortBreak => self.short_break,
            SessionType::LongBreak => self.long_break,
        }
    }

    /// Full session length in seconds.
    pub fn seconds(&self, session: SessionType) -> u64 {
        u64::from(self.minutes(session)) * 60
    }

    /// Store `minutes` clamped into bounds. Returns the stored value.
    pub fn set(&mut self, session: SessionType, minutes: i64) -> u32 {
        let value = session.clamp_minutes(minutes);
        match session {
            SessionType::Focus => self.focus = value,
            SessionType::ShortBreak => self.short_break = value,
            SessionType::LongBreak => self.long_break = value,
        }
        value
    }

    /// Add `delta` minutes (may be negative), clamped. Returns the stored value.
    pub fn adjust(&mut self, session: SessionType, delta: i64) -> u32 {
        let current = i64::from(self.minutes(session));
        self.set(session, current.saturating_add(delta))
    }
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            focus: SessionType::Focus.default_minutes(),
            short_break: SessionType::ShortBreak.default_minutes(),
            long_break: SessionType::LongBreak.default_minutes(),
        }
    }
}

#[derive(Deserialize)]
struct RawDurations {
    focus: u32,
    short_break: u32,
    long_break: u32,
}

impl From<RawDurations> for DurationConfig {
    fn from(raw: RawDurations) -> Self {
        DurationConfig::new(raw.focus, raw.short_break, raw.long_break)
    }
}

/// Format seconds as zero-padded `MM:SS`. Minutes are not wrapped at 60.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
