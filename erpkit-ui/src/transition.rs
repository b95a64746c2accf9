//! Mount/show transition for animated overlays.
//!
//! An overlay that animates needs to be mounted one step before it is shown
//! (so the entry animation starts from a defined state) and must stay mounted
//! for a grace period after it is hidden (so the exit animation is visible).
//! The renderer calls [`Transition::frame`] once after each paint and
//! [`Transition::tick`] on its timer.

use std::time::{Duration, Instant};

/// Frames to wait after mounting before flipping to shown.
pub const ENTER_FRAMES: u8 = 2;

/// Default exit animation length.
pub const DEFAULT_EXIT_DURATION: Duration = Duration::from_millis(200);

/// Where an overlay is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not mounted.
    Closed,
    /// Mounted, waiting for paints before showing.
    Entering { frames_left: u8 },
    /// Mounted and shown.
    Entered,
    /// Hidden but still mounted until `until`.
    Leaving { until: Instant },
}

#[derive(Debug, Clone)]
pub struct Transition {
    phase: Phase,
    exit_duration: Duration,
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(DEFAULT_EXIT_DURATION)
    }
}

impl Transition {
    pub fn new(exit_duration: Duration) -> Self {
        Self {
            phase: Phase::Closed,
            exit_duration,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn exit_duration(&self) -> Duration {
        self.exit_duration
    }

    /// Start entering. Returns false if already entering or entered.
    pub fn open(&mut self) -> bool {
        match self.phase {
            Phase::Closed | Phase::Leaving { .. } => {
                self.phase = Phase::Entering {
                    frames_left: ENTER_FRAMES,
                };
                true
            }
            Phase::Entering { .. } | Phase::Entered => false,
        }
    }

    /// Start leaving. Returns false if already leaving or closed.
    pub fn close(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Entering { .. } | Phase::Entered => {
                self.phase = Phase::Leaving {
                    until: now + self.exit_duration,
                };
                true
            }
            Phase::Closed | Phase::Leaving { .. } => false,
        }
    }

    /// Called once after each paint. Returns true on the frame the overlay
    /// becomes shown.
    pub fn frame(&mut self) -> bool {
        if let Phase::Entering { frames_left } = self.phase {
            let frames_left = frames_left.saturating_sub(1);
            if frames_left == 0 {
                self.phase = Phase::Entered;
                return true;
            }
            self.phase = Phase::Entering { frames_left };
        }
        false
    }

    /// Advance timers. Returns true when the overlay unmounts.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Phase::Leaving { until } = self.phase
            && now >= until
        {
            self.phase = Phase::Closed;
            return true;
        }
        false
    }

    pub fn is_mounted(&self) -> bool {
        !matches!(self.phase, Phase::Closed)
    }

    pub fn is_shown(&self) -> bool {
        matches!(self.phase, Phase::Entered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_takes_two_frames() {
        let mut t = Transition::default();
        assert!(t.open());
        assert!(t.is_mounted());
        assert!(!t.is_shown());
        assert!(!t.frame());
        assert!(!t.is_shown());
        assert!(t.frame());
        assert!(t.is_shown());
        assert!(!t.frame());
    }

    #[test]
    fn test_leave_waits_for_grace_period() {
        let start = Instant::now();
        let mut t = Transition::new(Duration::from_millis(100));
        t.open();
        t.frame();
        t.frame();
        assert!(t.close(start));
        assert!(t.is_mounted());
        assert!(!t.is_shown());
        assert!(!t.tick(start + Duration::from_millis(50)));
        assert!(t.is_mounted());
        assert!(t.tick(start + Duration::from_millis(100)));
        assert!(!t.is_mounted());
    }

    #[test]
    fn test_reopen_while_leaving() {
        let now = Instant::now();
        let mut t = Transition::default();
        t.open();
        t.close(now);
        assert!(t.open());
        assert_eq!(t.phase(), Phase::Entering { frames_left: ENTER_FRAMES });
        assert!(!t.tick(now + Duration::from_secs(1)));
        assert!(t.is_mounted());
    }
}
