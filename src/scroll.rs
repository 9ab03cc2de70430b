//! Scroll position memory across detail views and mode switches.
//!
//! Each presentation mode keeps its own remembered offset, and every capture
//! is mirrored into a "last known" slot used when coming back from the detail
//! screen. Restores are deferred by a short delay so the list has been laid out
//! again before the offset is applied.

use crate::catalog::Mode;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::time::Duration;

/// Delay between returning to the list and applying the remembered offset.
pub const DEFAULT_RESTORE_DELAY: Duration = Duration::from_millis(100);

/// Which slot a restore reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreContext {
    /// Re-entering a list mode: use that mode's slot.
    Mode(Mode),
    /// Returning from outside any mode, e.g. the detail screen.
    Generic,
}

/// Delivered when a deferred restore is due.
///
/// `generation` identifies the list view that asked for it; a view that has
/// been replaced since ignores the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreScrollMsg {
    /// Which offset to apply.
    pub context: RestoreContext,
    /// View generation the restore was scheduled for.
    pub generation: u64,
}

/// Remembered scroll offsets, one per mode plus the last one captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollMemory {
    paginated: usize,
    infinite: usize,
    last_known: usize,
    delay: Duration,
}

impl Default for ScrollMemory {
    fn default() -> Self {
        Self::new(DEFAULT_RESTORE_DELAY)
    }
}

impl ScrollMemory {
    /// Empty memory with the given restore delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            paginated: 0,
            infinite: 0,
            last_known: 0,
            delay,
        }
    }

    /// How long a restore waits before it applies.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Remembers `offset` for `mode` and as the last known position.
    pub fn capture(&mut self, mode: Mode, offset: usize) {
        match mode {
            Mode::Paginated => self.paginated = offset,
            Mode::Infinite => self.infinite = offset,
        }
        self.last_known = offset;
    }

    /// The offset a restore in `context` should apply.
    pub fn offset_for(&self, context: RestoreContext) -> usize {
        match context {
            RestoreContext::Mode(Mode::Paginated) => self.paginated,
            RestoreContext::Mode(Mode::Infinite) => self.infinite,
            RestoreContext::Generic => self.last_known,
        }
    }

    /// Forgets the infinite list's offset.
    pub fn clear_infinite(&mut self) {
        self.infinite = 0;
    }

    /// Schedules a [`RestoreScrollMsg`] after the restore delay.
    ///
    /// The offset is looked up when the message is handled, not now, so a
    /// capture that happens in between is honoured.
    pub fn restore(&self, context: RestoreContext, generation: u64) -> Cmd {
        bubbletea_tick(self.delay, move |_| {
            Box::new(RestoreScrollMsg {
                context,
                generation,
            }) as Msg
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_fills_mode_and_generic_slots() {
        let mut memory = ScrollMemory::default();
        memory.capture(Mode::Paginated, 12);
        assert_eq!(memory.offset_for(RestoreContext::Mode(Mode::Paginated)), 12);
        assert_eq!(memory.offset_for(RestoreContext::Generic), 12);
        assert_eq!(memory.offset_for(RestoreContext::Mode(Mode::Infinite)), 0);

        memory.capture(Mode::Infinite, 40);
        assert_eq!(memory.offset_for(RestoreContext::Mode(Mode::Infinite)), 40);
        assert_eq!(memory.offset_for(RestoreContext::Mode(Mode::Paginated)), 12);
        assert_eq!(memory.offset_for(RestoreContext::Generic), 40);
    }

    #[test]
    fn test_restore_defaults_to_zero() {
        let memory = ScrollMemory::default();
        assert_eq!(memory.offset_for(RestoreContext::Generic), 0);
        assert_eq!(memory.delay(), DEFAULT_RESTORE_DELAY);
    }

    #[test]
    fn test_clear_infinite_keeps_other_slots() {
        let mut memory = ScrollMemory::default();
        memory.capture(Mode::Infinite, 30);
        memory.clear_infinite();
        assert_eq!(memory.offset_for(RestoreContext::Mode(Mode::Infinite)), 0);
        assert_eq!(memory.offset_for(RestoreContext::Generic), 30);
    }
}
