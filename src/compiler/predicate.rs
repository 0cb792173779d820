//! Per-property predicates of a select command
//!
//! Each property carries at most one predicate of its kind. Range clauses
//! on a uint property fold into a single closed interval; enum and string
//! predicates cannot be combined.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cql::Comparator;

/// Closed range `[low, high]` over an unsigned-integer property
///
/// An interval with `low > high` matches nothing. It is kept as-is rather
/// than rejected so that contradictory conjuncts still compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub low: u64,
    pub high: u64,
}

impl Interval {
    /// Matches every value
    pub const FULL: Interval = Interval {
        low: 0,
        high: u64::MAX,
    };

    /// Canonical interval that matches nothing
    pub const EMPTY: Interval = Interval {
        low: u64::MAX,
        high: 0,
    };

    pub fn new(low: u64, high: u64) -> Self {
        Self { low, high }
    }

    /// Interval described by `property <op> value`
    ///
    /// `< 0` and `> u64::MAX` have no satisfying value and yield
    /// [`Interval::EMPTY`].
    pub fn from_comparison(op: Comparator, value: u64) -> Self {
        match op {
            Comparator::Lt => match value.checked_sub(1) {
                Some(high) => Interval::new(0, high),
                None => Interval::EMPTY,
            },
            Comparator::Gt => match value.checked_add(1) {
                Some(low) => Interval::new(low, u64::MAX),
                None => Interval::EMPTY,
            },
            Comparator::Le => Interval::new(0, value),
            Comparator::Ge => Interval::new(value, u64::MAX),
            Comparator::Eq => Interval::new(value, value),
        }
    }

    /// Conjunction of two intervals
    pub fn intersect(&self, other: &Interval) -> Interval {
        Interval {
            low: self.low.max(other.low),
            high: self.high.min(other.high),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.low > self.high
    }

    pub fn contains(&self, value: u64) -> bool {
        self.low <= value && value <= self.high
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::FULL
    }
}

/// Accepted codes of an enum property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPredicate {
    pub values: BTreeSet<i64>,
}

impl SetPredicate {
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    pub fn matches(&self, value: i64) -> bool {
        self.values.contains(&value)
    }
}

/// Substring a string property must contain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstringPredicate {
    pub pattern: String,
}

impl SubstringPredicate {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Builds the predicate from a CONTAINS literal. One leading and one
    /// trailing `"` are removed independently.
    pub fn from_literal(literal: &str) -> Self {
        let trimmed = literal.strip_prefix('"').unwrap_or(literal);
        let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
        Self::new(trimmed)
    }

    pub fn matches(&self, value: &str) -> bool {
        value.contains(self.pattern.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_translation() {
        assert_eq!(Interval::from_comparison(Comparator::Lt, 10), Interval::new(0, 9));
        assert_eq!(
            Interval::from_comparison(Comparator::Gt, 10),
            Interval::new(11, u64::MAX)
        );
        assert_eq!(Interval::from_comparison(Comparator::Le, 10), Interval::new(0, 10));
        assert_eq!(
            Interval::from_comparison(Comparator::Ge, 10),
            Interval::new(10, u64::MAX)
        );
        assert_eq!(Interval::from_comparison(Comparator::Eq, 10), Interval::new(10, 10));
    }

    #[test]
    fn test_unsatisfiable_bounds_are_empty() {
        let below_zero = Interval::from_comparison(Comparator::Lt, 0);
        let above_max = Interval::from_comparison(Comparator::Gt, u64::MAX);

        assert_eq!(below_zero, Interval::EMPTY);
        assert_eq!(above_max, Interval::EMPTY);
        assert!(below_zero.is_empty());
        assert!(!below_zero.contains(0));
    }

    #[test]
    fn test_empty_stays_empty_under_intersection() {
        let folded = Interval::EMPTY.intersect(&Interval::FULL);
        assert!(folded.is_empty());
    }

    #[test]
    fn test_intersect_takes_tightest_bounds() {
        let a = Interval::new(11, u64::MAX);
        let b = Interval::new(0, 99);
        let c = Interval::new(20, u64::MAX);

        assert_eq!(a.intersect(&b).intersect(&c), Interval::new(20, 99));
    }

    #[test]
    fn test_inverted_intersection_is_kept() {
        let folded = Interval::new(50, u64::MAX).intersect(&Interval::new(0, 10));
        assert_eq!(folded, Interval::new(50, 10));
        assert!(folded.is_empty());
    }

    #[test]
    fn test_substring_strips_quotes_independently() {
        assert_eq!(SubstringPredicate::from_literal("\"pen\"").pattern, "pen");
        assert_eq!(SubstringPredicate::from_literal("\"pen").pattern, "pen");
        assert_eq!(SubstringPredicate::from_literal("pen\"").pattern, "pen");
        assert_eq!(SubstringPredicate::from_literal("pen").pattern, "pen");
    }

    #[test]
    fn test_substring_matches() {
        let pred = SubstringPredicate::new("pen");
        assert!(pred.matches("fountain pen"));
        assert!(!pred.matches("PEN"));
    }

    #[test]
    fn test_set_deduplicates() {
        let pred = SetPredicate::new([2, 1, 2]);
        assert_eq!(pred.values.len(), 2);
        assert!(pred.matches(1));
        assert!(!pred.matches(3));
    }
}
