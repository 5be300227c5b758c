//! Ordered maps from disjoint integer intervals to owned values.
//!
//! A [`DisjointIntervals`] stores half-open intervals `[start, stop)` sorted by
//! start coordinate. No two stored intervals overlap; intervals that share an
//! endpoint may coexist only when the insertion that created the contact asked
//! for it with `allow_abut`.
//!
//! Keys are anything implementing [`Bounds`]. Tuple keys keep their endpoint
//! order, so a reversed pair such as `(7, 5)` is never reordered into a valid
//! interval: it is rejected by insertions and matches nothing in queries.
//!
//! # Examples
//!
//! ```
//! use intervals::DisjointIntervals;
//!
//! let mut track = DisjointIntervals::new();
//! assert!(track.add((0, 3), "hi", false));
//! assert!(track.add((3, 5), "bye", true));
//! assert!(!track.add((5, 7), "no", false));
//! assert_eq!(track.len(), 2);
//! assert_eq!(track.stop().unwrap(), 5);
//! ```
#![warn(missing_docs)]

use geometry::interval::Interval;
use itertools::Itertools;

#[cfg(test)]
mod tests;

/// The [`IntervalError`] result type.
pub type IntervalResult<T> = Result<T, IntervalError>;

/// An error accessing or building a [`DisjointIntervals`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    /// The container has no intervals.
    #[error("interval map is empty")]
    Empty,
    /// An interval whose start is not less than its stop was supplied.
    #[error("interval [{start}, {stop}) is empty or reversed")]
    EmptyInterval {
        /// The supplied start coordinate.
        start: i64,
        /// The supplied stop coordinate.
        stop: i64,
    },
    /// Two supplied intervals were out of order or overlapping.
    #[error("intervals {prev} and {next} are not sorted and disjoint")]
    NotDisjoint {
        /// The earlier interval.
        prev: Interval,
        /// The later interval.
        next: Interval,
    },
    /// A transform with zero scale was requested.
    #[error("interval transform scale must be nonzero")]
    ZeroScale,
}

/// The raw `(start, stop)` endpoints of an interval key.
///
/// Unlike [`Interval::new`], implementations never reorder the endpoints.
pub trait Bounds {
    /// Returns `(start, stop)` as supplied.
    fn bounds(self) -> (i64, i64);
}

impl Bounds for Interval {
    #[inline]
    fn bounds(self) -> (i64, i64) {
        (self.start(), self.stop())
    }
}

impl Bounds for (i64, i64) {
    #[inline]
    fn bounds(self) -> (i64, i64) {
        self
    }
}

impl<T: Bounds + Copy> Bounds for &T {
    #[inline]
    fn bounds(self) -> (i64, i64) {
        (*self).bounds()
    }
}

/// Converts a key to an [`Interval`] if it has positive length.
fn checked(key: impl Bounds) -> Option<Interval> {
    let (start, stop) = key.bounds();
    (start < stop).then(|| Interval::new(start, stop))
}

/// An ordered collection of non-overlapping intervals, each owning a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisjointIntervals<V> {
    entries: Vec<(Interval, V)>,
}

impl<V> Default for DisjointIntervals<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> DisjointIntervals<V> {
    /// Creates an empty collection.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds a collection from entries that are already sorted and disjoint.
    ///
    /// Abutting entries are accepted. Empty or reversed entries are not.
    pub fn from_disjoint(
        entries: impl IntoIterator<Item = (impl Bounds, V)>,
    ) -> IntervalResult<Self> {
        let entries = entries
            .into_iter()
            .map(|(key, val)| {
                let (start, stop) = key.bounds();
                checked((start, stop))
                    .map(|intv| (intv, val))
                    .ok_or(IntervalError::EmptyInterval { start, stop })
            })
            .collect::<IntervalResult<Vec<_>>>()?;
        if let Some(((prev, _), (next, _))) = entries
            .iter()
            .tuple_windows()
            .find(|((prev, _), (next, _))| prev.stop() > next.start())
        {
            return Err(IntervalError::NotDisjoint {
                prev: *prev,
                next: *next,
            });
        }
        Ok(Self { entries })
    }

    /// The number of stored intervals.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no intervals are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(interval, value)` pairs in sorted order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Interval, &V)> + '_ {
        self.entries.iter().map(|(intv, val)| (*intv, val))
    }

    /// Iterates over the stored intervals in sorted order.
    pub fn intervals(&self) -> impl ExactSizeIterator<Item = Interval> + '_ {
        self.entries.iter().map(|(intv, _)| *intv)
    }

    /// Iterates over the stored values in interval order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.entries.iter().map(|(_, val)| val)
    }

    /// The lowest start coordinate of any stored interval.
    pub fn start(&self) -> IntervalResult<i64> {
        self.entries
            .first()
            .map(|(intv, _)| intv.start())
            .ok_or(IntervalError::Empty)
    }

    /// The highest stop coordinate of any stored interval.
    pub fn stop(&self) -> IntervalResult<i64> {
        self.entries
            .last()
            .map(|(intv, _)| intv.stop())
            .ok_or(IntervalError::Empty)
    }

    /// The index of the first entry whose stop is greater than `coord`.
    fn first_ending_after(&self, coord: i64) -> usize {
        // Stops are sorted because the stored intervals are sorted and disjoint.
        self.entries.partition_point(|(intv, _)| intv.stop() <= coord)
    }

    /// Looks up the index of an exactly matching interval.
    fn find_exact(&self, intv: Interval) -> Option<usize> {
        let idx = self
            .entries
            .partition_point(|(stored, _)| stored.start() < intv.start());
        self.entries
            .get(idx)
            .filter(|(stored, _)| *stored == intv)
            .map(|_| idx)
    }

    /// Returns the insertion index for `intv`, or `None` if it cannot be inserted.
    fn insertion_point(&self, intv: Interval, allow_abut: bool) -> Option<usize> {
        let idx = self
            .entries
            .partition_point(|(stored, _)| stored.start() < intv.start());
        let conflicts = |stored: &Interval| {
            stored.overlaps(&intv) || (!allow_abut && stored.abuts(&intv))
        };
        if idx > 0 && conflicts(&self.entries[idx - 1].0) {
            return None;
        }
        if idx < self.entries.len() && conflicts(&self.entries[idx].0) {
            return None;
        }
        Some(idx)
    }

    /// Returns `true` if [`add`](DisjointIntervals::add) would accept `intv`.
    pub fn can_add(&self, intv: impl Bounds, allow_abut: bool) -> bool {
        checked(intv).is_some_and(|intv| self.insertion_point(intv, allow_abut).is_some())
    }

    /// Inserts `val` at `intv`, returning the value back if the interval conflicts.
    ///
    /// An interval conflicts with a stored interval if the two overlap, or if
    /// they abut and `allow_abut` is `false`. Empty and reversed intervals are
    /// always rejected. The container is unchanged on failure.
    pub fn try_add(&mut self, intv: impl Bounds, val: V, allow_abut: bool) -> Result<(), V> {
        let (start, stop) = intv.bounds();
        let Some(intv) = checked((start, stop)) else {
            tracing::debug!(start, stop, "rejected empty interval");
            return Err(val);
        };
        match self.insertion_point(intv, allow_abut) {
            Some(idx) => {
                self.entries.insert(idx, (intv, val));
                Ok(())
            }
            None => {
                tracing::debug!(%intv, allow_abut, "rejected conflicting interval");
                Err(val)
            }
        }
    }

    /// Inserts `val` at `intv`, returning `true` on success.
    ///
    /// See [`try_add`](DisjointIntervals::try_add) for the conflict rules.
    /// On failure, `val` is dropped and the container is unchanged.
    pub fn add(&mut self, intv: impl Bounds, val: V, allow_abut: bool) -> bool {
        self.try_add(intv, val, allow_abut).is_ok()
    }

    /// Returns `true` if exactly `intv` is stored.
    ///
    /// An interval that is merely covered by a stored interval is not contained.
    pub fn contains(&self, intv: impl Bounds) -> bool {
        checked(intv).and_then(|intv| self.find_exact(intv)).is_some()
    }

    /// Gets the value stored at exactly `intv`.
    pub fn get(&self, intv: impl Bounds) -> Option<&V> {
        let idx = self.find_exact(checked(intv)?)?;
        Some(&self.entries[idx].1)
    }

    /// Gets a mutable reference to the value stored at exactly `intv`.
    pub fn get_mut(&mut self, intv: impl Bounds) -> Option<&mut V> {
        let idx = self.find_exact(checked(intv)?)?;
        Some(&mut self.entries[idx].1)
    }

    /// The index range of the entries overlapping `query`.
    ///
    /// Empty and reversed queries overlap nothing.
    fn overlap_range(&self, query: impl Bounds) -> std::ops::Range<usize> {
        let Some(query) = checked(query) else {
            return 0..0;
        };
        let lo = self.first_ending_after(query.start());
        let hi = lo
            + self.entries[lo..]
                .iter()
                .take_while(|(intv, _)| intv.overlaps(&query))
                .count();
        lo..hi
    }

    /// Returns the lowest stored entry overlapping `query`, if any.
    ///
    /// An empty query overlaps nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use geometry::interval::Interval;
    /// use intervals::DisjointIntervals;
    ///
    /// let intvs = DisjointIntervals::from_disjoint([((1, 2), 1), ((4, 7), 2), ((10, 12), 3)]).unwrap();
    /// assert_eq!(intvs.get_first_overlap_item((6, 11)), Some((Interval::new(4, 7), &2)));
    /// assert_eq!(intvs.get_first_overlap_item((7, 10)), None);
    /// assert_eq!(intvs.get_first_overlap_item((5, 5)), None);
    /// ```
    pub fn get_first_overlap_item(&self, query: impl Bounds) -> Option<(Interval, &V)> {
        let range = self.overlap_range(query);
        self.entries[range]
            .first()
            .map(|(intv, val)| (*intv, val))
    }

    /// Returns `true` if any stored interval overlaps `query`.
    pub fn overlaps(&self, query: impl Bounds) -> bool {
        !self.overlap_range(query).is_empty()
    }

    /// Returns `true` if a single stored interval contains all of `query`.
    pub fn covers(&self, query: impl Bounds) -> bool {
        let Some(query) = checked(query) else {
            return false;
        };
        let idx = self.first_ending_after(query.start());
        self.entries
            .get(idx)
            .is_some_and(|(intv, _)| intv.contains(&query))
    }

    /// Iterates over every stored entry overlapping `query`, in sorted order.
    pub fn overlap_items(&self, query: impl Bounds) -> impl Iterator<Item = (Interval, &V)> + '_ {
        self.entries[self.overlap_range(query)]
            .iter()
            .map(|(intv, val)| (*intv, val))
    }

    /// Removes the entry stored at exactly `intv`, returning its value.
    pub fn remove(&mut self, intv: impl Bounds) -> Option<V> {
        let idx = self.find_exact(checked(intv)?)?;
        Some(self.entries.remove(idx).1)
    }

    /// Removes every entry overlapping `query`, returning them in sorted order.
    pub fn remove_overlaps(&mut self, query: impl Bounds) -> Vec<(Interval, V)> {
        let range = self.overlap_range(query);
        self.entries.drain(range).collect()
    }

    /// Returns the pieces covered by both `self` and `other`.
    ///
    /// Each overlapping pair of stored intervals contributes its intersection,
    /// so pieces from adjacent entries may abut.
    pub fn get_intersection<W>(&self, other: &DisjointIntervals<W>) -> DisjointIntervals<()> {
        let mut entries = Vec::new();
        let (mut i, mut j) = (0, 0);
        while let (Some((a, _)), Some((b, _))) = (self.entries.get(i), other.entries.get(j)) {
            if let Some(piece) = a.intersection(*b).filter(|piece| !piece.is_empty()) {
                entries.push((piece, ()));
            }
            if a.stop() <= b.stop() {
                i += 1;
            } else {
                j += 1;
            }
        }
        DisjointIntervals { entries }
    }

    /// Returns the gaps between stored intervals within `total`.
    ///
    /// ```
    /// use intervals::DisjointIntervals;
    ///
    /// let intvs = DisjointIntervals::from_disjoint([((2, 4), 'a'), ((6, 8), 'b')]).unwrap();
    /// let gaps = intvs.get_complement((0, 7)).unwrap();
    /// assert_eq!(gaps.intervals().map(<(i64, i64)>::from).collect::<Vec<_>>(), [(0, 2), (4, 6)]);
    /// ```
    pub fn get_complement(&self, total: impl Bounds) -> IntervalResult<DisjointIntervals<()>> {
        let (start, stop) = total.bounds();
        let total = checked((start, stop)).ok_or(IntervalError::EmptyInterval { start, stop })?;
        let mut entries = Vec::new();
        let mut cursor = total.start();
        for (intv, _) in &self.entries[self.overlap_range(total)] {
            if cursor < intv.start() {
                entries.push((Interval::new(cursor, intv.start()), ()));
            }
            cursor = cursor.max(intv.stop());
        }
        if cursor < total.stop() {
            entries.push((Interval::new(cursor, total.stop()), ()));
        }
        Ok(DisjointIntervals { entries })
    }

    /// Removes the extent of `query` from every stored interval.
    ///
    /// Stored intervals partially covered by `query` are trimmed, and one that
    /// strictly contains it is split in two, each half keeping a copy of the
    /// value. Returns `true` if anything changed.
    pub fn subtract(&mut self, query: impl Bounds) -> bool
    where
        V: Clone,
    {
        let Some(query) = checked(query) else {
            return false;
        };
        let range = self.overlap_range(query);
        if range.is_empty() {
            return false;
        }
        let lo = range.start;
        let mut pieces = Vec::with_capacity(2);
        for (intv, val) in self.entries.drain(range) {
            if intv.start() < query.start() {
                pieces.push((Interval::new(intv.start(), query.start()), val.clone()));
            }
            if query.stop() < intv.stop() {
                pieces.push((Interval::new(query.stop(), intv.stop()), val));
            }
        }
        self.entries.splice(lo..lo, pieces);
        tracing::debug!(%query, "subtracted interval");
        true
    }

    /// Returns a copy with every coordinate `x` mapped to `scale * x + shift`.
    ///
    /// A negative scale mirrors the intervals, reversing their order.
    pub fn get_transform(&self, scale: i64, shift: i64) -> IntervalResult<DisjointIntervals<V>>
    where
        V: Clone,
    {
        if scale == 0 {
            return Err(IntervalError::ZeroScale);
        }
        let map = |x: i64| scale * x + shift;
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(intv, val)| (Interval::new(map(intv.start()), map(intv.stop())), val.clone()))
            .collect();
        if scale < 0 {
            entries.reverse();
        }
        Ok(DisjointIntervals { entries })
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<V> IntoIterator for DisjointIntervals<V> {
    type Item = (Interval, V);
    type IntoIter = std::vec::IntoIter<(Interval, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a DisjointIntervals<V> {
    type Item = &'a (Interval, V);
    type IntoIter = std::slice::Iter<'a, (Interval, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
