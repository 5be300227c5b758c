//! A one-dimensional integer interval.
//!
//! An interval is stored as the pair `(start, stop)` with `start <= stop`.
//! Overlap is defined on the open interior, so two intervals sharing only an
//! endpoint [abut](Interval::abuts) but do not [overlap](Interval::overlaps).
use serde::{Deserialize, Serialize};

/// An interval of coordinates in one dimension.
#[derive(
    Debug, Default, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize, PartialEq, Eq,
)]
pub struct Interval {
    start: i64,
    stop: i64,
}

impl Interval {
    /// Creates a new [`Interval`] between two integers.
    ///
    /// The endpoints are sorted, so the order of the arguments does not matter.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Interval::new(10, 3), Interval::new(3, 10));
    /// ```
    pub fn new(start: i64, stop: i64) -> Self {
        use std::cmp::{max, min};
        Self {
            start: min(start, stop),
            stop: max(start, stop),
        }
    }

    /// Creates an interval of zero length at the given point.
    pub const fn from_point(x: i64) -> Self {
        Self { start: x, stop: x }
    }

    /// Creates an interval of the given length centered at `center`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Interval::from_center_length(50, 40), Interval::new(30, 70));
    /// ```
    pub fn from_center_length(center: i64, length: i64) -> Self {
        let lower = center - length / 2;
        Self::new(lower, lower + length)
    }

    /// Gets the start of the interval.
    #[inline]
    pub const fn start(&self) -> i64 {
        self.start
    }

    /// Gets the stop of the interval.
    #[inline]
    pub const fn stop(&self) -> i64 {
        self.stop
    }

    /// Gets the length of the interval.
    #[inline]
    pub const fn length(&self) -> i64 {
        self.stop - self.start
    }

    /// Gets the center of the interval, rounding toward negative infinity.
    #[inline]
    pub const fn center(&self) -> i64 {
        (self.start + self.stop).div_euclid(2)
    }

    /// Returns `true` if the interval has zero length.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// Returns `true` if the interiors of the two intervals share at least one point.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let a = Interval::new(0, 3);
    /// assert!(a.overlaps(&Interval::new(2, 5)));
    /// assert!(!a.overlaps(&Interval::new(3, 5)));
    /// ```
    #[inline]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.stop && other.start < self.stop
    }

    /// Returns `true` if the two intervals share at least one point, including endpoints.
    #[inline]
    pub const fn intersects(&self, other: &Self) -> bool {
        !(other.stop < self.start || self.stop < other.start)
    }

    /// Returns `true` if one interval ends exactly where the other begins.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let a = Interval::new(0, 3);
    /// assert!(a.abuts(&Interval::new(3, 5)));
    /// assert!(Interval::new(-2, 0).abuts(&a));
    /// assert!(!a.abuts(&Interval::new(4, 5)));
    /// ```
    #[inline]
    pub const fn abuts(&self, other: &Self) -> bool {
        self.stop == other.start || other.stop == self.start
    }

    /// Returns `true` if `other` lies entirely within this interval.
    #[inline]
    pub const fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.stop <= self.stop
    }

    /// Returns `true` if `x` lies within this interval, including endpoints.
    #[inline]
    pub const fn contains_point(&self, x: i64) -> bool {
        self.start <= x && x <= self.stop
    }

    /// Calculates the smallest interval containing this interval and `other`.
    pub fn union(self, other: Self) -> Self {
        use std::cmp::{max, min};
        Self {
            start: min(self.start, other.start),
            stop: max(self.stop, other.stop),
        }
    }

    /// Calculates the intersection of this interval with `other`.
    ///
    /// Returns [`None`] if the intervals do not [intersect](Interval::intersects).
    pub fn intersection(self, other: Self) -> Option<Self> {
        let start = std::cmp::max(self.start, other.start);
        let stop = std::cmp::min(self.stop, other.stop);
        (start <= stop).then_some(Self { start, stop })
    }

    /// Translates the interval by the given amount.
    pub const fn shift(self, amount: i64) -> Self {
        Self {
            start: self.start + amount,
            stop: self.stop + amount,
        }
    }

    /// Expands the interval by `amount` on both ends.
    ///
    /// A negative `amount` shrinks the interval; the result never inverts and
    /// collapses onto the center instead.
    pub fn expand(self, amount: i64) -> Self {
        let start = self.start - amount;
        let stop = self.stop + amount;
        if start > stop {
            Self::from_point(self.center())
        } else {
            Self { start, stop }
        }
    }
}

impl From<(i64, i64)> for Interval {
    #[inline]
    fn from(value: (i64, i64)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<Interval> for (i64, i64) {
    #[inline]
    fn from(value: Interval) -> Self {
        (value.start, value.stop)
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.stop)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn overlap_excludes_shared_endpoint() {
        let a = Interval::new(4, 7);
        assert!(a.overlaps(&Interval::new(6, 8)));
        assert!(a.overlaps(&Interval::new(0, 100)));
        assert!(!a.overlaps(&Interval::new(7, 9)));
        assert!(a.intersects(&Interval::new(7, 9)));
        assert!(!a.intersects(&Interval::new(8, 9)));
    }

    #[test]
    fn intersection_and_union() {
        let a = Interval::new(0, 10);
        let b = Interval::new(5, 20);
        assert_eq!(a.intersection(b), Some(Interval::new(5, 10)));
        assert_eq!(a.union(b), Interval::new(0, 20));
        assert_eq!(a.intersection(Interval::new(11, 12)), None);
        assert_eq!(a.intersection(Interval::new(10, 12)), Some(Interval::from_point(10)));
    }

    #[test]
    fn expand_never_inverts() {
        assert_eq!(Interval::new(0, 10).expand(2), Interval::new(-2, 12));
        assert_eq!(Interval::new(0, 10).expand(-3), Interval::new(3, 7));
        assert_eq!(Interval::new(0, 10).expand(-8), Interval::from_point(5));
    }

    #[test]
    fn center_rounds_down() {
        assert_eq!(Interval::new(-3, 0).center(), -2);
        assert_eq!(Interval::new(1, 4).center(), 2);
    }
}
