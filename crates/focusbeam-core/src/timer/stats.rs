use serde::{Deserialize, Serialize};

/// Focus tally for the life of the process. Never reset, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub completed_focus_blocks: u32,
    pub total_focus_minutes: u32,
}

impl DailyStats {
    /// Record one finished focus session of `minutes` length.
    pub(crate) fn record_focus(&mut self, minutes: u32) {
        self.completed_focus_blocks = self.completed_focus_blocks.saturating_add(1);
        self.total_focus_minutes = self.total_focus_minutes.saturating_add(minutes);
    }
}
