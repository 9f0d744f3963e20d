//! Daily check-in streak.
//!
//! Two states per student: never checked in, or checked in as of day `K`.
//! Transitions compare day indices, never raw timestamps.

use serde::{Deserialize, Serialize};

/// Where a student's streak currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckInState {
    /// No check-in has ever been recorded.
    #[default]
    Never,
    /// Last check-in happened on `day`.
    CheckedIn {
        /// Day index of the last check-in.
        day: u64,
    },
}

/// Effect of a check-in call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInTransition {
    /// First check-in ever; streak starts at 1.
    Started,
    /// Previous check-in was yesterday; streak grew by one.
    Continued,
    /// At least one day was skipped; streak restarts at 1.
    Reset,
    /// Already checked in today; nothing changed.
    AlreadyCheckedIn,
}

impl CheckInTransition {
    /// True when the call changed streak state.
    pub fn advanced(self) -> bool {
        !matches!(self, CheckInTransition::AlreadyCheckedIn)
    }
}

/// Read view of a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckInStats {
    /// Current streak length.
    pub consecutive_days: u64,
    /// Day index of the last check-in, 0 when never.
    pub last_check_in_day: u64,
}

/// Streak counter for one student.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CheckInStreak {
    state: CheckInState,
    consecutive: u64,
}

impl CheckInStreak {
    /// Applies a check-in on `current_day`.
    pub fn check_in(&mut self, current_day: u64) -> CheckInTransition {
        let transition = match self.state {
            CheckInState::Never => CheckInTransition::Started,
            CheckInState::CheckedIn { day } if day >= current_day => {
                return CheckInTransition::AlreadyCheckedIn;
            }
            CheckInState::CheckedIn { day } if day.checked_add(1) == Some(current_day) => {
                CheckInTransition::Continued
            }
            CheckInState::CheckedIn { .. } => CheckInTransition::Reset,
        };
        self.consecutive = match transition {
            CheckInTransition::Reset => 1,
            _ => self.consecutive.saturating_add(1),
        };
        self.state = CheckInState::CheckedIn { day: current_day };
        transition
    }

    /// Current streak length.
    pub fn consecutive_days(&self) -> u64 {
        self.consecutive
    }

    /// Current state.
    pub fn state(&self) -> CheckInState {
        self.state
    }

    /// Streak length and last day (0 when never).
    pub fn stats(&self) -> CheckInStats {
        let last_check_in_day = match self.state {
            CheckInState::Never => 0,
            CheckInState::CheckedIn { day } => day,
        };
        CheckInStats {
            consecutive_days: self.consecutive,
            last_check_in_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_days_build_a_streak() {
        let mut streak = CheckInStreak::default();
        assert_eq!(streak.check_in(100), CheckInTransition::Started);
        assert_eq!(streak.check_in(101), CheckInTransition::Continued);
        assert_eq!(streak.check_in(102), CheckInTransition::Continued);
        assert_eq!(
            streak.stats(),
            CheckInStats {
                consecutive_days: 3,
                last_check_in_day: 102
            }
        );
    }

    #[test]
    fn skipped_day_resets_to_one() {
        let mut streak = CheckInStreak::default();
        streak.check_in(100);
        streak.check_in(101);
        assert_eq!(streak.check_in(103), CheckInTransition::Reset);
        assert_eq!(streak.consecutive_days(), 1);
    }

    #[test]
    fn same_day_is_a_no_op() {
        let mut streak = CheckInStreak::default();
        streak.check_in(100);
        assert_eq!(streak.check_in(100), CheckInTransition::AlreadyCheckedIn);
        assert_eq!(streak.consecutive_days(), 1);
        assert_eq!(streak.state(), CheckInState::CheckedIn { day: 100 });
    }

    #[test]
    fn day_zero_check_in_is_remembered() {
        let mut streak = CheckInStreak::default();
        streak.check_in(0);
        assert_eq!(streak.check_in(0), CheckInTransition::AlreadyCheckedIn);
        assert_eq!(streak.check_in(1), CheckInTransition::Continued);
        assert_eq!(streak.consecutive_days(), 2);
    }

    #[test]
    fn earlier_day_does_not_rewind() {
        let mut streak = CheckInStreak::default();
        streak.check_in(50);
        assert_eq!(streak.check_in(49), CheckInTransition::AlreadyCheckedIn);
        assert_eq!(streak.stats().last_check_in_day, 50);
    }

    #[test]
    fn never_reports_day_zero() {
        assert_eq!(CheckInStreak::default().stats(), CheckInStats::default());
    }
}
