/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The cost of breaking a line after a given word.
//!
//! Costs are compared over several infinity levels, so that "infinitely bad"
//! candidates can still be ranked among each other without overflowing
//! fixed-width integers. A cost is a vector indexed by level; two costs are
//! compared starting at the highest level.

use std::cmp::Ordering;
use std::fmt;

use app_units::Au;

use crate::flow::word::Penalty;

/// Ordinary badness and penalty values.
pub const INF_VALUE: usize = 0;
/// Lines that are quite loose.
pub const INF_LARGE: usize = 1;
/// Lines that fall short of the available width and cannot be stretched.
pub const INF_NOT_STRETCHABLE: usize = 2;
/// Lines that do not fit.
pub const INF_TOO_TIGHT: usize = 3;
/// Prohibited (and, negatively, forced) breaks.
pub const INF_PENALTIES: usize = 4;
const INF_MAX: usize = INF_PENALTIES;

/// Stretch ratios above this many percent are all equally loose.
const MAX_RATIO: i64 = 1024;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum BadnessState {
    #[default]
    NotStretchable,
    QuiteLoose,
    Badness(i32),
    TooTight,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BadnessAndPenalty {
    /// Stretch (positive) or shrink (negative) ratio in percent.
    ratio: i32,
    badness: BadnessState,
    penalty: Option<Penalty>,
}

impl BadnessAndPenalty {
    /// Classifies a line of `total_width` in `ideal_width` of space.
    pub fn calc_badness(
        &mut self,
        total_width: Au,
        ideal_width: Au,
        total_stretch: Au,
        total_shrink: Au,
    ) {
        let (total, ideal) = (total_width.0 as i64, ideal_width.0 as i64);
        if total == ideal {
            self.ratio = 0;
            self.badness = BadnessState::Badness(0);
        } else if total < ideal {
            if total_stretch.0 <= 0 {
                self.ratio = 0;
                self.badness = BadnessState::NotStretchable;
            } else {
                let ratio = 100 * (ideal - total) / total_stretch.0 as i64;
                if ratio > MAX_RATIO {
                    self.ratio = MAX_RATIO as i32;
                    self.badness = BadnessState::QuiteLoose;
                } else {
                    self.ratio = ratio as i32;
                    self.badness = BadnessState::Badness((ratio * ratio * ratio) as i32);
                }
            }
        } else if total_shrink.0 <= 0 {
            self.ratio = -(MAX_RATIO as i32);
            self.badness = BadnessState::TooTight;
        } else {
            let ratio = 100 * (total - ideal) / total_shrink.0 as i64;
            if ratio >= 100 {
                self.ratio = -(ratio.min(MAX_RATIO) as i32);
                self.badness = BadnessState::TooTight;
            } else {
                self.ratio = -(ratio as i32);
                self.badness = BadnessState::Badness((ratio * ratio * ratio) as i32);
            }
        }
    }

    pub fn set_penalty(&mut self, penalty: Penalty) {
        self.penalty = Some(penalty);
    }

    pub fn line_too_tight(&self) -> bool {
        self.badness == BadnessState::TooTight
    }

    pub fn line_loose(&self) -> bool {
        matches!(
            self.badness,
            BadnessState::NotStretchable | BadnessState::QuiteLoose
        )
    }

    pub fn line_must_be_broken(&self) -> bool {
        self.penalty.is_some_and(|penalty| penalty.forces_break())
    }

    pub fn line_can_be_broken(&self) -> bool {
        self.penalty.is_none_or(|penalty| penalty.allows_break())
    }

    /// Stretch (positive) or shrink (negative) ratio in percent.
    pub fn ratio(&self) -> i32 {
        self.ratio
    }

    fn badness_value(&self, level: usize) -> i32 {
        match self.badness {
            BadnessState::NotStretchable => (level == INF_NOT_STRETCHABLE) as i32,
            BadnessState::QuiteLoose => (level == INF_LARGE) as i32,
            BadnessState::Badness(badness) => {
                if level == INF_VALUE {
                    badness
                } else {
                    0
                }
            },
            BadnessState::TooTight => (level == INF_TOO_TIGHT) as i32,
        }
    }

    fn penalty_value(&self, level: usize) -> i32 {
        match self.penalty {
            None => 0,
            Some(Penalty::ForceBreak) => -((level == INF_PENALTIES) as i32),
            Some(Penalty::ProhibitBreak) => (level == INF_PENALTIES) as i32,
            Some(Penalty::Value(value)) => {
                if level == INF_VALUE {
                    value
                } else {
                    0
                }
            },
        }
    }

    fn value(&self, level: usize) -> i64 {
        self.badness_value(level) as i64 + self.penalty_value(level) as i64
    }

    /// Compares the cost of two candidates, lowest cost first.
    pub fn compare_to(&self, other: &BadnessAndPenalty) -> Ordering {
        (0..=INF_MAX)
            .rev()
            .map(|level| self.value(level).cmp(&other.value(level)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for BadnessAndPenalty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.badness {
            BadnessState::NotStretchable => write!(f, "not stretchable")?,
            BadnessState::QuiteLoose => write!(f, "quite loose")?,
            BadnessState::Badness(badness) => write!(f, "{} ({}%)", badness, self.ratio)?,
            BadnessState::TooTight => write!(f, "too tight")?,
        }
        match self.penalty {
            None => Ok(()),
            Some(Penalty::ForceBreak) => write!(f, " + forced"),
            Some(Penalty::ProhibitBreak) => write!(f, " + prohibited"),
            Some(Penalty::Value(value)) => write!(f, " + {}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost(
        total: i32,
        ideal: i32,
        stretch: i32,
        shrink: i32,
        penalty: Penalty,
    ) -> BadnessAndPenalty {
        let mut cost = BadnessAndPenalty::default();
        cost.calc_badness(Au(total), Au(ideal), Au(stretch), Au(shrink));
        cost.set_penalty(penalty);
        cost
    }

    #[test]
    fn classification() {
        assert!(cost(100, 100, 0, 0, Penalty::Value(0))
            .compare_to(&cost(100, 100, 10, 0, Penalty::Value(0)))
            .is_eq());
        assert!(cost(50, 100, 0, 0, Penalty::Value(0)).line_loose());
        assert!(cost(50, 100, 1, 0, Penalty::Value(0)).line_loose());
        assert!(cost(101, 100, 10, 0, Penalty::Value(0)).line_too_tight());
        assert!(cost(110, 100, 0, 10, Penalty::Value(0)).line_too_tight());
        let tight = cost(105, 100, 0, 10, Penalty::Value(0));
        assert!(!tight.line_too_tight());
        assert_eq!(tight.ratio(), -50);
    }

    #[test]
    fn levels_are_compared_from_the_top() {
        let fitting = cost(90, 100, 20, 0, Penalty::Value(0));
        let loose = cost(10, 100, 20, 0, Penalty::Value(0));
        let unstretchable = cost(10, 100, 0, 0, Penalty::Value(0));
        let too_tight = cost(120, 100, 20, 0, Penalty::Value(0));
        let prohibited = cost(100, 100, 20, 0, Penalty::ProhibitBreak);
        let forced = cost(120, 100, 20, 0, Penalty::ForceBreak);

        assert!(fitting.compare_to(&loose).is_lt());
        assert!(loose.compare_to(&unstretchable).is_lt());
        assert!(unstretchable.compare_to(&too_tight).is_lt());
        assert!(too_tight.compare_to(&prohibited).is_lt());
        assert!(forced.compare_to(&fitting).is_lt());
        assert!(forced.line_must_be_broken());
        assert!(!prohibited.line_can_be_broken());
    }

    #[test]
    fn penalties_break_ties_between_equal_badness() {
        let plain = cost(90, 100, 20, 0, Penalty::Value(0));
        let hyphenated = cost(90, 100, 20, 0, Penalty::Value(100));
        assert!(plain.compare_to(&hyphenated).is_lt());
        assert!(hyphenated.compare_to(&plain).is_gt());
    }

    #[test]
    fn huge_widths_do_not_overflow() {
        let huge = cost(1, i32::MAX, 1, 0, Penalty::Value(0));
        assert!(huge.line_loose());
        let wide = cost(i32::MAX, 1, 0, 1, Penalty::Value(0));
        assert!(wide.line_too_tight());
    }
}
