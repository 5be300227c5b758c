//! Axis-aligned rectangular bounding boxes.

use impl_trait_for_tuples::impl_for_tuples;
use serde::{Deserialize, Serialize};

use crate::dir::Dir;
use crate::interval::Interval;
use crate::transform::{Transformation, TransformMut, TranslateMut};

/// An axis-aligned rectangle specified by its lower-left and upper-right corners.
///
/// A box is *valid* when `xl <= xh` and `yl <= yh`, and *physical* when both
/// inequalities are strict. The [invalid box](BBox::invalid) is the identity
/// element of [`BBox::merge`].
///
/// # Examples
///
/// ```
/// # use geometry::prelude::*;
/// let b = BBox::new(0, 0, 0, 0);
/// assert!(b.is_valid());
/// assert!(!b.is_physical());
/// assert!(!BBox::new(0, 0, -1, -1).is_valid());
/// assert!(BBox::new(-2, -3, 6, 12).is_physical());
/// ```
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    xl: i64,
    yl: i64,
    xh: i64,
    yh: i64,
}

impl Default for BBox {
    /// Returns the [invalid box](BBox::invalid).
    fn default() -> Self {
        Self::invalid()
    }
}

impl BBox {
    /// Creates a box from its four edge coordinates.
    ///
    /// The coordinates are not sorted; `xl > xh` produces an invalid box.
    #[inline]
    pub const fn new(xl: i64, yl: i64, xh: i64, yh: i64) -> Self {
        Self { xl, yl, xh, yh }
    }

    /// The canonical invalid box.
    ///
    /// Merging any box with the invalid box returns the other box.
    #[inline]
    pub const fn invalid() -> Self {
        Self::new(0, 0, -1, -1)
    }

    /// Creates a box from coordinates given relative to the direction `dir`.
    ///
    /// `(tl, th)` is the span along `dir`; `(pl, ph)` is the span along the
    /// perpendicular direction.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(BBox::from_orient(Dir::Horiz, 1, 2, 3, 4), BBox::new(1, 3, 2, 4));
    /// assert_eq!(BBox::from_orient(Dir::Vert, 1, 2, 3, 4), BBox::new(3, 1, 4, 2));
    /// ```
    pub const fn from_orient(dir: Dir, tl: i64, th: i64, pl: i64, ph: i64) -> Self {
        match dir {
            Dir::Horiz => Self::new(tl, pl, th, ph),
            Dir::Vert => Self::new(pl, tl, ph, th),
        }
    }

    /// Creates a box from its x and y intervals.
    pub const fn from_intervals(x: Interval, y: Interval) -> Self {
        Self::new(x.start(), y.start(), x.stop(), y.stop())
    }

    /// The lower x coordinate.
    #[inline]
    pub const fn xl(&self) -> i64 {
        self.xl
    }

    /// The lower y coordinate.
    #[inline]
    pub const fn yl(&self) -> i64 {
        self.yl
    }

    /// The upper x coordinate.
    #[inline]
    pub const fn xh(&self) -> i64 {
        self.xh
    }

    /// The upper y coordinate.
    #[inline]
    pub const fn yh(&self) -> i64 {
        self.yh
    }

    /// The x coordinate of the center, rounded toward negative infinity.
    #[inline]
    pub const fn xm(&self) -> i64 {
        (self.xl + self.xh).div_euclid(2)
    }

    /// The y coordinate of the center, rounded toward negative infinity.
    #[inline]
    pub const fn ym(&self) -> i64 {
        (self.yl + self.yh).div_euclid(2)
    }

    /// The width of the box.
    #[inline]
    pub const fn w(&self) -> i64 {
        self.xh - self.xl
    }

    /// The height of the box.
    #[inline]
    pub const fn h(&self) -> i64 {
        self.yh - self.yl
    }

    /// The center of the box.
    #[inline]
    pub const fn center(&self) -> (i64, i64) {
        (self.xm(), self.ym())
    }

    /// The area of the box, or zero if the box is invalid.
    pub const fn area(&self) -> i64 {
        if self.is_valid() {
            self.w() * self.h()
        } else {
            0
        }
    }

    /// The dimension of the box along `dir`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let b = BBox::new(1, 2, 4, 10);
    /// assert_eq!(b.dim(Dir::Horiz), 3);
    /// assert_eq!(b.dim(Dir::Vert), 8);
    /// ```
    pub const fn dim(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.w(),
            Dir::Vert => self.h(),
        }
    }

    /// The lower and upper coordinates of the box along `dir`.
    ///
    /// Only meaningful for valid boxes.
    pub fn interval(&self, dir: Dir) -> Interval {
        match dir {
            Dir::Horiz => Interval::new(self.xl, self.xh),
            Dir::Vert => Interval::new(self.yl, self.yh),
        }
    }

    /// The lower coordinate of the box along `dir`.
    pub const fn lower(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.xl,
            Dir::Vert => self.yl,
        }
    }

    /// The upper coordinate of the box along `dir`.
    pub const fn upper(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.xh,
            Dir::Vert => self.yh,
        }
    }

    /// A hashable key identifying this box by value.
    #[inline]
    pub const fn immutable_key(&self) -> (i64, i64, i64, i64) {
        (self.xl, self.yl, self.xh, self.yh)
    }

    /// Returns `true` if `xl <= xh` and `yl <= yh`.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.xl <= self.xh && self.yl <= self.yh
    }

    /// Returns `true` if `xl < xh` and `yl < yh`.
    #[inline]
    pub const fn is_physical(&self) -> bool {
        self.xl < self.xh && self.yl < self.yh
    }

    /// Returns `true` if `other` lies entirely within this box.
    ///
    /// Invalid boxes contain nothing and are contained by nothing.
    pub const fn contains(&self, other: &BBox) -> bool {
        self.is_valid()
            && other.is_valid()
            && self.xl <= other.xl
            && other.xh <= self.xh
            && self.yl <= other.yl
            && other.yh <= self.yh
    }

    /// Returns `true` if the point `(x, y)` lies within this box, including its edges.
    pub const fn contains_point(&self, x: i64, y: i64) -> bool {
        self.xl <= x && x <= self.xh && self.yl <= y && y <= self.yh
    }

    /// Returns `true` if the two boxes share a region of positive area.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let a = BBox::new(0, 0, 10, 10);
    /// assert!(a.overlaps(&BBox::new(5, 5, 15, 15)));
    /// assert!(!a.overlaps(&BBox::new(10, 0, 20, 10)));
    /// assert!(a.intersects(&BBox::new(10, 0, 20, 10)));
    /// ```
    pub const fn overlaps(&self, other: &BBox) -> bool {
        self.is_valid()
            && other.is_valid()
            && self.xl < other.xh
            && other.xl < self.xh
            && self.yl < other.yh
            && other.yl < self.yh
    }

    /// Returns `true` if the two boxes share at least one point, including edges and corners.
    pub const fn intersects(&self, other: &BBox) -> bool {
        self.is_valid()
            && other.is_valid()
            && self.xl <= other.xh
            && other.xl <= self.xh
            && self.yl <= other.yh
            && other.yl <= self.yh
    }

    /// Returns the smallest box containing both `self` and `other`.
    ///
    /// If either box is invalid, the other box is returned unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let a = BBox::new(0, 0, 2, 2);
    /// let b = BBox::new(5, -1, 6, 1);
    /// assert_eq!(a.merge(b), BBox::new(0, -1, 6, 2));
    /// assert_eq!(a.merge(BBox::invalid()), a);
    /// ```
    pub fn merge(mut self, other: BBox) -> Self {
        self.merge_mut(other);
        self
    }

    /// Replaces this box with the smallest box containing both `self` and `other`.
    pub fn merge_mut(&mut self, other: BBox) -> &mut Self {
        if !other.is_valid() {
            return self;
        }
        if !self.is_valid() {
            *self = other;
            return self;
        }
        self.xl = self.xl.min(other.xl);
        self.yl = self.yl.min(other.yl);
        self.xh = self.xh.max(other.xh);
        self.yh = self.yh.max(other.yh);
        self
    }

    /// Returns the region shared by both boxes.
    ///
    /// The result is invalid if the boxes do not [intersect](BBox::intersects).
    pub fn intersect(mut self, other: BBox) -> Self {
        self.intersect_mut(other);
        self
    }

    /// Replaces this box with the region it shares with `other`.
    pub fn intersect_mut(&mut self, other: BBox) -> &mut Self {
        if !self.intersects(&other) {
            *self = Self::invalid();
            return self;
        }
        self.xl = self.xl.max(other.xl);
        self.yl = self.yl.max(other.yl);
        self.xh = self.xh.min(other.xh);
        self.yh = self.yh.min(other.yh);
        self
    }

    /// Returns the smallest box containing `self` and the point `(x, y)`.
    ///
    /// Extending an invalid box yields the zero-area box at `(x, y)`.
    pub fn extend(mut self, x: i64, y: i64) -> Self {
        self.extend_mut(x, y);
        self
    }

    /// Grows this box to contain the point `(x, y)`.
    pub fn extend_mut(&mut self, x: i64, y: i64) -> &mut Self {
        self.merge_mut(BBox::new(x, y, x, y))
    }

    /// Returns the box extended to reach `ct` along `dir` and `cp` across it.
    ///
    /// A `None` coordinate leaves that axis unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let b = BBox::new(0, 0, 10, 10);
    /// assert_eq!(b.extend_orient(Dir::Vert, Some(-5), None), BBox::new(0, -5, 10, 10));
    /// assert_eq!(b.extend_orient(Dir::Vert, None, Some(12)), BBox::new(0, 0, 12, 10));
    /// ```
    pub fn extend_orient(mut self, dir: Dir, ct: Option<i64>, cp: Option<i64>) -> Self {
        self.extend_orient_mut(dir, ct, cp);
        self
    }

    /// Extends this box to reach `ct` along `dir` and `cp` across it.
    pub fn extend_orient_mut(&mut self, dir: Dir, ct: Option<i64>, cp: Option<i64>) -> &mut Self {
        let (x, y) = match dir {
            Dir::Horiz => (ct, cp),
            Dir::Vert => (cp, ct),
        };
        let (x, y) = (x.unwrap_or(self.xl), y.unwrap_or(self.yl));
        self.extend_mut(x, y)
    }

    /// Returns the box grown by `dx` on the left and right and by `dy` on the top and bottom.
    ///
    /// Negative values shrink the box, possibly making it invalid.
    /// Invalid boxes are returned unchanged.
    pub fn expand(mut self, dx: i64, dy: i64) -> Self {
        self.expand_mut(dx, dy);
        self
    }

    /// Grows this box by `dx` on the left and right and by `dy` on the top and bottom.
    pub fn expand_mut(&mut self, dx: i64, dy: i64) -> &mut Self {
        if self.is_valid() {
            self.xl -= dx;
            self.xh += dx;
            self.yl -= dy;
            self.yh += dy;
        }
        self
    }

    /// Returns the box shifted by `(dx, dy)`.
    pub fn move_by(self, dx: i64, dy: i64) -> Self {
        crate::transform::Translate::translate(self, dx, dy)
    }

    /// Returns the box shifted by `dt` along `dir` and by `dp` along the perpendicular direction.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let b = BBox::new(550, 80, 619, 2992);
    /// assert_eq!(b.move_by_orient(Dir::Vert, 0, 128), BBox::new(678, 80, 747, 2992));
    /// ```
    pub fn move_by_orient(mut self, dir: Dir, dt: i64, dp: i64) -> Self {
        self.move_by_orient_mut(dir, dt, dp);
        self
    }

    /// Shifts this box by `dt` along `dir` and by `dp` along the perpendicular direction.
    pub fn move_by_orient_mut(&mut self, dir: Dir, dt: i64, dp: i64) -> &mut Self {
        match dir {
            Dir::Horiz => self.translate_mut(dt, dp),
            Dir::Vert => self.translate_mut(dp, dt),
        }
        self
    }

    /// Returns the box mirrored across the line `y = x`.
    pub fn flip_xy(mut self) -> Self {
        self.flip_xy_mut();
        self
    }

    /// Mirrors this box across the line `y = x`.
    pub fn flip_xy_mut(&mut self) -> &mut Self {
        *self = Self::new(self.yl, self.xl, self.yh, self.xh);
        self
    }
}

impl TranslateMut for BBox {
    fn translate_mut(&mut self, dx: i64, dy: i64) {
        if self.is_valid() {
            self.xl += dx;
            self.xh += dx;
            self.yl += dy;
            self.yh += dy;
        }
    }
}

impl TransformMut for BBox {
    /// Maps both corners through `trans` and re-sorts them.
    ///
    /// Invalid boxes are left unchanged.
    fn transform_mut(&mut self, trans: Transformation) {
        if !self.is_valid() {
            return;
        }
        let (x0, y0) = trans.apply(self.xl, self.yl);
        let (x1, y1) = trans.apply(self.xh, self.yh);
        *self = Self::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1));
    }
}

impl std::fmt::Display for BBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BBox({}, {}, {}, {})", self.xl, self.yl, self.xh, self.yh)
    }
}

/// A geometric object that has a bounding box.
///
/// Empty objects return the [invalid box](BBox::invalid).
///
/// # Examples
///
/// ```
/// # use geometry::prelude::*;
/// let shapes = vec![BBox::new(0, 0, 1, 1), BBox::new(4, 5, 6, 7)];
/// assert_eq!(shapes.bound_box(), BBox::new(0, 0, 6, 7));
/// assert_eq!(Vec::<BBox>::new().bound_box(), BBox::invalid());
/// ```
pub trait BoundBox {
    /// Computes the axis-aligned rectangular bounding box.
    fn bound_box(&self) -> BBox;
}

impl BoundBox for BBox {
    #[inline]
    fn bound_box(&self) -> BBox {
        *self
    }
}

impl<T: BoundBox> BoundBox for &T {
    fn bound_box(&self) -> BBox {
        T::bound_box(*self)
    }
}

impl<T: BoundBox> BoundBox for [T] {
    fn bound_box(&self) -> BBox {
        self.iter()
            .fold(BBox::invalid(), |acc, item| acc.merge(item.bound_box()))
    }
}

impl<T: BoundBox> BoundBox for Vec<T> {
    fn bound_box(&self) -> BBox {
        self.as_slice().bound_box()
    }
}

impl<T: BoundBox> BoundBox for Option<T> {
    fn bound_box(&self) -> BBox {
        self.as_ref()
            .map(BoundBox::bound_box)
            .unwrap_or_else(BBox::invalid)
    }
}

#[impl_for_tuples(1, 16)]
impl BoundBox for TupleIdentifier {
    #[allow(clippy::let_and_return)]
    fn bound_box(&self) -> BBox {
        let mut bbox = BBox::invalid();
        for_tuples!( #( bbox.merge_mut(TupleIdentifier.bound_box()); )* );
        bbox
    }
}
