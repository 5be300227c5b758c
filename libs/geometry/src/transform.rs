//! Transformation types and traits.

use impl_trait_for_tuples::impl_for_tuples;
use serde::{Deserialize, Serialize};

use crate::orientation::Orientation;

/// A transformation representing a Manhattan translation, rotation, and/or reflection of geometry.
///
/// A point `p` maps to `orient * p + (dx, dy)`: the orientation is applied about the
/// origin first, followed by the translation. All arithmetic is exact integer arithmetic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transformation {
    /// The x translation applied after the orientation.
    pub dx: i64,
    /// The y translation applied after the orientation.
    pub dy: i64,
    /// The orientation applied about the origin.
    pub orient: Orientation,
}

impl Transformation {
    /// Creates a new transformation.
    pub const fn new(dx: i64, dy: i64, orient: Orientation) -> Self {
        Self { dx, dy, orient }
    }

    /// Returns the identity transform, leaving any transformed object unmodified.
    pub const fn identity() -> Self {
        Self::new(0, 0, Orientation::R0)
    }

    /// Returns a translation by `(dx, dy)`.
    pub const fn translate(dx: i64, dy: i64) -> Self {
        Self::new(dx, dy, Orientation::R0)
    }

    /// Returns a transformation applying only the given orientation.
    pub const fn from_orient(orient: Orientation) -> Self {
        Self::new(0, 0, orient)
    }

    /// The translation of this transformation.
    #[inline]
    pub const fn location(&self) -> (i64, i64) {
        (self.dx, self.dy)
    }

    /// The orientation of this transformation.
    #[inline]
    pub const fn orient(&self) -> Orientation {
        self.orient
    }

    /// Returns `true` if this transformation maps the x-axis onto the y-axis.
    #[inline]
    pub const fn flips_xy(&self) -> bool {
        self.orient.swaps_axes()
    }

    /// The signs applied to the x and y axes.
    ///
    /// For axis-swapping orientations, the first element is the sign applied
    /// to the input y coordinate to produce the output x coordinate, and
    /// vice versa.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Transformation::from_orient(Orientation::ReflectVert).axis_scale(), (1, -1));
    /// assert_eq!(Transformation::from_orient(Orientation::R90).axis_scale(), (-1, 1));
    /// ```
    pub const fn axis_scale(&self) -> (i64, i64) {
        let m = self.orient.matrix();
        if self.flips_xy() {
            (m[0][1] as i64, m[1][0] as i64)
        } else {
            (m[0][0] as i64, m[1][1] as i64)
        }
    }

    /// Applies the transformation to the point `(x, y)`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let t = Transformation::new(1, 1, Orientation::R90);
    /// assert_eq!(t.apply(3, 6), (-5, 4));
    /// ```
    #[inline]
    pub const fn apply(&self, x: i64, y: i64) -> (i64, i64) {
        let (x, y) = self.orient.apply(x, y);
        (x + self.dx, y + self.dy)
    }

    /// Translates this transformation by `(dx, dy)`.
    pub fn move_by(&mut self, dx: i64, dy: i64) -> &mut Self {
        self.dx += dx;
        self.dy += dy;
        self
    }

    /// Create a new [`Transformation`] that is the cascade of `parent` and `child`.
    ///
    /// "Parents" and "children" refer to typical layout-instance hierarchies,
    /// in which each layer of instance has a nested set of transformations relative to its top-level parent.
    /// The result applies `child` first, then `parent`.
    ///
    /// Note this operation *is not* commutative.
    /// For example the set of transformations:
    /// * (a) Reflect vertically, then
    /// * (b) Translate by (1,1)
    /// * (c) Place a point at (local coordinate) (1,1)
    ///
    /// Lands said point at (2,-2) in top-level space,
    /// whereas reversing the order of (a) and (b) lands it at (2,0).
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let a = Transformation::from_orient(Orientation::ReflectVert);
    /// let b = Transformation::translate(1, 1);
    /// assert_eq!(Transformation::cascade(a, b).apply(1, 1), (2, -2));
    /// assert_eq!(Transformation::cascade(b, a).apply(1, 1), (2, 0));
    /// ```
    pub fn cascade(parent: Transformation, child: Transformation) -> Transformation {
        // The result-transform's origin is the parent's origin,
        // plus the parent-transformed child's origin
        let (dx, dy) = parent.apply(child.dx, child.dy);
        Self {
            dx,
            dy,
            orient: parent.orient * child.orient,
        }
    }

    /// Returns the transformation that applies `self` and then `next`.
    pub fn get_transform_by(&self, next: &Transformation) -> Transformation {
        Self::cascade(*next, *self)
    }

    /// Updates this transformation to apply `next` after itself.
    pub fn transform_by(&mut self, next: &Transformation) -> &mut Self {
        *self = self.get_transform_by(next);
        self
    }

    /// Returns the inverse [`Transformation`] of `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let trans = Transformation::cascade(
    ///     Transformation::from_orient(Orientation::R90),
    ///     Transformation::translate(5, 10),
    /// );
    /// let inv = trans.inverse();
    ///
    /// assert_eq!(Transformation::cascade(inv, trans), Transformation::identity());
    /// ```
    pub fn inverse(&self) -> Transformation {
        let orient = self.orient.inverse();
        let (dx, dy) = orient.apply(self.dx, self.dy);
        Self {
            dx: -dx,
            dy: -dy,
            orient,
        }
    }

    /// Replaces this transformation with its inverse.
    pub fn invert(&mut self) -> &mut Self {
        *self = self.inverse();
        self
    }
}

impl From<Orientation> for Transformation {
    fn from(value: Orientation) -> Self {
        Self::from_orient(value)
    }
}

impl std::fmt::Display for Transformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Transformation({}, {}, {})", self.dx, self.dy, self.orient)
    }
}

/// A trait for specifying how an object is changed by a [`Transformation`].
#[impl_for_tuples(32)]
pub trait TransformMut {
    /// Applies matrix-vector [`Transformation`] `trans`.
    fn transform_mut(&mut self, trans: Transformation);
}

impl<T: TransformMut> TransformMut for Vec<T> {
    fn transform_mut(&mut self, trans: Transformation) {
        for i in self.iter_mut() {
            i.transform_mut(trans);
        }
    }
}

impl<T: TransformMut> TransformMut for Option<T> {
    fn transform_mut(&mut self, trans: Transformation) {
        if let Some(inner) = self.as_mut() {
            inner.transform_mut(trans);
        }
    }
}

impl TransformMut for Transformation {
    fn transform_mut(&mut self, trans: Transformation) {
        self.transform_by(&trans);
    }
}

/// A trait for specifying how an object is changed by a [`Transformation`].
///
/// Takes in an owned copy of the shape and returns the transformed version.
pub trait Transform: TransformMut + Sized {
    /// Applies matrix-vector [`Transformation`] `trans`.
    ///
    /// Creates a new shape at a location equal to the transformation of the original.
    #[inline]
    fn transform(mut self, trans: Transformation) -> Self {
        self.transform_mut(trans);
        self
    }
}

impl<T: TransformMut + Sized> Transform for T {}

/// A trait for specifying how a shape is translated by `(dx, dy)`.
#[impl_for_tuples(32)]
pub trait TranslateMut {
    /// Translates the shape by `(dx, dy)` in place.
    fn translate_mut(&mut self, dx: i64, dy: i64);
}

impl<T: TranslateMut> TranslateMut for Vec<T> {
    fn translate_mut(&mut self, dx: i64, dy: i64) {
        for i in self.iter_mut() {
            i.translate_mut(dx, dy);
        }
    }
}

impl<T: TranslateMut> TranslateMut for Option<T> {
    fn translate_mut(&mut self, dx: i64, dy: i64) {
        if let Some(inner) = self.as_mut() {
            inner.translate_mut(dx, dy);
        }
    }
}

impl TranslateMut for Transformation {
    fn translate_mut(&mut self, dx: i64, dy: i64) {
        self.move_by(dx, dy);
    }
}

/// A trait for specifying how a shape is translated by `(dx, dy)`.
///
/// Takes in an owned copy of the shape and returns the translated version.
pub trait Translate: TranslateMut + Sized {
    /// Translates the shape by `(dx, dy)`, returning a new shape.
    #[inline]
    fn translate(mut self, dx: i64, dy: i64) -> Self {
        self.translate_mut(dx, dy);
        self
    }
}

impl<T: TranslateMut + Sized> Translate for T {}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn samples() -> Vec<Transformation> {
        Orientation::all()
            .into_iter()
            .enumerate()
            .map(|(i, o)| Transformation::new(3 * i as i64 - 7, 11 - 2 * i as i64, o))
            .collect()
    }

    #[test]
    fn cascade_matches_sequential_application() {
        for a in samples() {
            for b in samples() {
                let c = Transformation::cascade(a, b);
                let (x, y) = b.apply(13, -4);
                assert_eq!(c.apply(13, -4), a.apply(x, y));
            }
        }
    }

    #[test]
    fn inverse_round_trips() {
        for t in samples() {
            let inv = t.inverse();
            assert_eq!(Transformation::cascade(inv, t), Transformation::identity());
            assert_eq!(Transformation::cascade(t, inv), Transformation::identity());
            let (x, y) = t.apply(21, 8);
            assert_eq!(inv.apply(x, y), (21, 8));
        }
    }

    #[test]
    fn transform_by_applies_argument_last() {
        let mut t = Transformation::translate(5, 0);
        t.transform_by(&Transformation::from_orient(Orientation::R90));
        assert_eq!(t.apply(0, 0), (0, 5));
        assert_eq!(t, Transformation::new(0, 5, Orientation::R90));
    }

    #[test]
    fn cascade_is_associative() {
        let s = samples();
        for a in &s {
            for b in &s {
                for c in &s {
                    assert_eq!(
                        Transformation::cascade(Transformation::cascade(*a, *b), *c),
                        Transformation::cascade(*a, Transformation::cascade(*b, *c)),
                    );
                }
            }
        }
    }
}
