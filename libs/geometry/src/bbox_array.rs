//! Regular arrays of bounding boxes.

use serde::{Deserialize, Serialize};

use crate::bbox::{BBox, BoundBox};
use crate::dir::Dir;
use crate::transform::{Transformation, TransformMut, TranslateMut};

/// A grid of `nx` by `ny` copies of a base box.
///
/// Copy `(i, j)` is the base box shifted by `(i * spx, j * spy)`. Pitches may be
/// negative, in which case the array grows left or down from the base.
///
/// # Examples
///
/// ```
/// # use geometry::prelude::*;
/// let arr = BBoxArray::new(BBox::new(0, 0, 10, 20), 3, 2, 15, 30).unwrap();
/// assert_eq!(arr.len(), 6);
/// assert_eq!(arr.get_bbox(4), Some(BBox::new(15, 30, 25, 50)));
/// assert_eq!(arr.bound_box(), BBox::new(0, 0, 40, 50));
/// assert!(BBoxArray::new(BBox::new(0, 0, 1, 1), 0, 1, 0, 0).is_none());
/// ```
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBoxArray {
    base: BBox,
    num: [i64; 2],
    sp: [i64; 2],
}

impl BBoxArray {
    /// Creates an array of `nx` columns at pitch `spx` and `ny` rows at pitch `spy`.
    ///
    /// Returns [`None`] if either count is less than one.
    pub fn new(base: BBox, nx: i64, ny: i64, spx: i64, spy: i64) -> Option<Self> {
        (nx >= 1 && ny >= 1).then_some(Self {
            base,
            num: [nx, ny],
            sp: [spx, spy],
        })
    }

    /// Creates an array of `nt` boxes at pitch `spt` along `dir` and `np` boxes
    /// at pitch `spp` across it.
    pub fn from_orient(base: BBox, dir: Dir, nt: i64, spt: i64, np: i64, spp: i64) -> Option<Self> {
        match dir {
            Dir::Horiz => Self::new(base, nt, np, spt, spp),
            Dir::Vert => Self::new(base, np, nt, spp, spt),
        }
    }

    /// An array holding only `base`.
    pub const fn single(base: BBox) -> Self {
        Self {
            base,
            num: [1, 1],
            sp: [0, 0],
        }
    }

    /// The box at column 0, row 0.
    #[inline]
    pub const fn base(&self) -> BBox {
        self.base
    }

    /// The number of columns.
    #[inline]
    pub const fn nx(&self) -> i64 {
        self.num[0]
    }

    /// The number of rows.
    #[inline]
    pub const fn ny(&self) -> i64 {
        self.num[1]
    }

    /// The column pitch.
    #[inline]
    pub const fn spx(&self) -> i64 {
        self.sp[0]
    }

    /// The row pitch.
    #[inline]
    pub const fn spy(&self) -> i64 {
        self.sp[1]
    }

    /// The number of boxes along `dir`.
    #[inline]
    pub const fn num(&self, dir: Dir) -> i64 {
        self.num[dir as usize]
    }

    /// The pitch along `dir`.
    #[inline]
    pub const fn sp(&self, dir: Dir) -> i64 {
        self.sp[dir as usize]
    }

    /// The `(count, pitch)` pair along `dir`.
    pub const fn array_info(&self, dir: Dir) -> (i64, i64) {
        (self.num(dir), self.sp(dir))
    }

    /// The total number of boxes.
    pub const fn len(&self) -> i64 {
        self.num[0] * self.num[1]
    }

    /// Always `false`: an array holds at least one box.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The outermost lower (`upper == false`) or upper edge of the array along `dir`.
    pub const fn get_coord(&self, dir: Dir, upper: bool) -> i64 {
        let cur = if upper {
            self.base.upper(dir)
        } else {
            self.base.lower(dir)
        };
        let delta = (self.num(dir) - 1) * self.sp(dir);
        // With a negative pitch the far copy sits on the opposite side of the base.
        if (delta < 0) != upper {
            cur + delta
        } else {
            cur
        }
    }

    /// The left-most edge.
    pub const fn xl(&self) -> i64 {
        self.get_coord(Dir::Horiz, false)
    }

    /// The right-most edge.
    pub const fn xh(&self) -> i64 {
        self.get_coord(Dir::Horiz, true)
    }

    /// The bottom-most edge.
    pub const fn yl(&self) -> i64 {
        self.get_coord(Dir::Vert, false)
    }

    /// The top-most edge.
    pub const fn yh(&self) -> i64 {
        self.get_coord(Dir::Vert, true)
    }

    /// The x coordinate of the overall center, rounded toward negative infinity.
    pub const fn xm(&self) -> i64 {
        (self.xl() + self.xh()).div_euclid(2)
    }

    /// The y coordinate of the overall center, rounded toward negative infinity.
    pub const fn ym(&self) -> i64 {
        (self.yl() + self.yh()).div_euclid(2)
    }

    /// The box at `idx`, counting along rows first.
    ///
    /// Returns [`None`] if `idx` is out of range.
    pub fn get_bbox(&self, idx: i64) -> Option<BBox> {
        if !(0..self.len()).contains(&idx) {
            return None;
        }
        let (row, col) = (idx / self.nx(), idx % self.nx());
        Some(self.base.move_by(col * self.spx(), row * self.spy()))
    }

    /// Iterates over every box, counting along rows first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = BBox> + '_ {
        let (nx, ny) = (self.nx() as usize, self.ny() as usize);
        (0..nx * ny).map(move |idx| {
            let (row, col) = ((idx / nx) as i64, (idx % nx) as i64);
            self.base.move_by(col * self.spx(), row * self.spy())
        })
    }

    /// Returns the array shifted by `(dx, dy)`.
    pub fn move_by(mut self, dx: i64, dy: i64) -> Self {
        self.translate_mut(dx, dy);
        self
    }

    /// Returns the array with its base box extended to reach `ct` along `dir`
    /// and `cp` across it.
    pub fn extend_orient(mut self, dir: Dir, ct: Option<i64>, cp: Option<i64>) -> Self {
        self.base.extend_orient_mut(dir, ct, cp);
        self
    }

    /// Returns the array with the base box spanning `[lo, hi]` along `dir`.
    pub fn set_interval(mut self, dir: Dir, lo: i64, hi: i64) -> Self {
        let other = dir.other();
        self.base = BBox::from_orient(dir, lo, hi, self.base.lower(other), self.base.upper(other));
        self
    }

    /// Splits the array into `div` interleaved sub-arrays along `dir` and returns
    /// the one starting at position `idx`.
    ///
    /// The sub-array takes every `div`-th box along `dir`; the perpendicular
    /// count and pitch are kept. Returns [`None`] if `div` is not positive, if
    /// `idx` is not in `0..div`, or if the sub-array would be empty.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let arr = BBoxArray::new(BBox::new(0, 0, 10, 10), 5, 1, 20, 0).unwrap();
    /// let odd = arr.get_sub_array(Dir::Horiz, 2, 1).unwrap();
    /// assert_eq!(odd, BBoxArray::new(BBox::new(20, 0, 30, 10), 2, 1, 40, 0).unwrap());
    /// ```
    pub fn get_sub_array(&self, dir: Dir, div: i64, idx: i64) -> Option<Self> {
        if div < 1 || !(0..div).contains(&idx) {
            return None;
        }
        let (n_tot, pitch) = self.array_info(dir);
        let new_n = n_tot / div + i64::from(idx < n_tot % div);
        if new_n < 1 {
            return None;
        }
        let mut sub = *self;
        sub.base.move_by_orient_mut(dir, idx * pitch, 0);
        sub.num[dir as usize] = new_n;
        sub.sp[dir as usize] = pitch * div;
        Some(sub)
    }
}

impl TranslateMut for BBoxArray {
    fn translate_mut(&mut self, dx: i64, dy: i64) {
        self.base.translate_mut(dx, dy);
    }
}

impl TransformMut for BBoxArray {
    /// Transforms the base box and rotates or mirrors the pitches.
    ///
    /// Counts swap axes under 90 degree rotations.
    fn transform_mut(&mut self, trans: Transformation) {
        let (spx, spy) = trans.orient().apply(self.sp[0], self.sp[1]);
        self.sp = [spx, spy];
        if trans.orient().swaps_axes() {
            self.num.swap(0, 1);
        }
        self.base.transform_mut(trans);
    }
}

impl BoundBox for BBoxArray {
    fn bound_box(&self) -> BBox {
        BBox::new(self.xl(), self.yl(), self.xh(), self.yh())
    }
}

impl From<BBox> for BBoxArray {
    fn from(value: BBox) -> Self {
        Self::single(value)
    }
}

impl std::fmt::Display for BBoxArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BBoxArray({}, {}, {}, {}, {})",
            self.base, self.num[0], self.num[1], self.sp[0], self.sp[1]
        )
    }
}

/// An ordered list of [`BBoxArray`]s.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBoxCollection {
    arrays: Vec<BBoxArray>,
}

impl BBoxCollection {
    /// Creates an empty collection.
    pub const fn new() -> Self {
        Self { arrays: Vec::new() }
    }

    /// Appends an array.
    pub fn push(&mut self, arr: BBoxArray) {
        self.arrays.push(arr);
    }

    /// Appends an array built from its parts, returning `false` if either count
    /// is less than one.
    pub fn add_rect_arr(&mut self, bbox: BBox, nx: i64, ny: i64, spx: i64, spy: i64) -> bool {
        match BBoxArray::new(bbox, nx, ny, spx, spy) {
            Some(arr) => {
                self.push(arr);
                true
            }
            None => false,
        }
    }

    /// The number of arrays.
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// Returns `true` if the collection holds no arrays.
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Iterates over the arrays in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, BBoxArray> {
        self.arrays.iter()
    }
}

impl TranslateMut for BBoxCollection {
    fn translate_mut(&mut self, dx: i64, dy: i64) {
        self.arrays.translate_mut(dx, dy);
    }
}

impl TransformMut for BBoxCollection {
    fn transform_mut(&mut self, trans: Transformation) {
        self.arrays.transform_mut(trans);
    }
}

impl BoundBox for BBoxCollection {
    fn bound_box(&self) -> BBox {
        self.arrays.bound_box()
    }
}

impl FromIterator<BBoxArray> for BBoxCollection {
    fn from_iter<I: IntoIterator<Item = BBoxArray>>(iter: I) -> Self {
        Self {
            arrays: iter.into_iter().collect(),
        }
    }
}

impl Extend<BBoxArray> for BBoxCollection {
    fn extend<I: IntoIterator<Item = BBoxArray>>(&mut self, iter: I) {
        self.arrays.extend(iter);
    }
}

impl<'a> IntoIterator for &'a BBoxCollection {
    type Item = &'a BBoxArray;
    type IntoIter = std::slice::Iter<'a, BBoxArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.arrays.iter()
    }
}

impl IntoIterator for BBoxCollection {
    type Item = BBoxArray;
    type IntoIter = std::vec::IntoIter<BBoxArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.arrays.into_iter()
    }
}

impl std::fmt::Display for BBoxCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BBoxCollection(")?;
        for (i, arr) in self.arrays.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arr}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::orientation::Orientation;
    use crate::transform::Transform;

    fn grid() -> BBoxArray {
        BBoxArray::new(BBox::new(0, 0, 10, 20), 3, 2, 15, 30).unwrap()
    }

    #[test]
    fn rejects_nonpositive_counts() {
        let base = BBox::new(0, 0, 1, 1);
        assert!(BBoxArray::new(base, 0, 1, 0, 0).is_none());
        assert!(BBoxArray::new(base, 2, -1, 0, 0).is_none());
        assert!(BBoxArray::from_orient(base, Dir::Vert, 0, 5, 1, 0).is_none());
    }

    #[test]
    fn from_orient_maps_axes() {
        let base = BBox::new(0, 0, 1, 1);
        let arr = BBoxArray::from_orient(base, Dir::Vert, 4, 10, 2, 3).unwrap();
        assert_eq!(arr, BBoxArray::new(base, 2, 4, 3, 10).unwrap());
        assert_eq!(arr.array_info(Dir::Vert), (4, 10));
        assert_eq!(arr.array_info(Dir::Horiz), (2, 3));
    }

    #[test]
    fn boxes_count_along_rows_first() {
        let arr = grid();
        let boxes: Vec<_> = arr.iter().collect();
        assert_eq!(boxes.len(), 6);
        assert_eq!(boxes[1], BBox::new(15, 0, 25, 20));
        assert_eq!(boxes[3], BBox::new(0, 30, 10, 50));
        for (idx, bbox) in boxes.iter().enumerate() {
            assert_eq!(arr.get_bbox(idx as i64), Some(*bbox));
        }
        assert_eq!(arr.get_bbox(6), None);
        assert_eq!(arr.get_bbox(-1), None);
        assert_eq!(boxes.bound_box(), arr.bound_box());
    }

    #[test]
    fn negative_pitch_extends_toward_lower_coordinates() {
        let arr = BBoxArray::new(BBox::new(0, 0, 10, 10), 3, 1, -20, 0).unwrap();
        assert_eq!(arr.xl(), -40);
        assert_eq!(arr.xh(), 10);
        assert_eq!(arr.yl(), 0);
        assert_eq!(arr.yh(), 10);
        assert_eq!(arr.xm(), -15);
        assert_eq!(arr.bound_box(), arr.iter().collect::<Vec<_>>().bound_box());
    }

    #[test]
    fn moves_and_extends_base() {
        let arr = grid().move_by(5, -5);
        assert_eq!(arr.base(), BBox::new(5, -5, 15, 15));
        assert_eq!((arr.nx(), arr.ny(), arr.spx(), arr.spy()), (3, 2, 15, 30));

        let ext = grid().extend_orient(Dir::Horiz, Some(-4), Some(25));
        assert_eq!(ext.base(), BBox::new(-4, 0, 10, 25));
        let set = grid().set_interval(Dir::Vert, 2, 8);
        assert_eq!(set.base(), BBox::new(0, 2, 10, 8));
    }

    #[test]
    fn transform_rotates_pitch_and_counts() {
        let arr = grid().transform(Transformation::from_orient(Orientation::R90));
        assert_eq!((arr.nx(), arr.ny()), (2, 3));
        assert_eq!((arr.spx(), arr.spy()), (-30, 15));
        assert_eq!(arr.base(), BBox::new(-20, 0, 0, 10));
        let expected: Vec<_> = grid()
            .iter()
            .map(|b| b.transform(Transformation::from_orient(Orientation::R90)))
            .collect();
        assert_eq!(arr.bound_box(), expected.bound_box());

        let mirrored = grid().transform(Transformation::new(100, 0, Orientation::ReflectVert));
        assert_eq!((mirrored.nx(), mirrored.ny()), (3, 2));
        assert_eq!((mirrored.spx(), mirrored.spy()), (15, -30));
    }

    #[test]
    fn sub_arrays_interleave() {
        let arr = BBoxArray::new(BBox::new(0, 0, 10, 10), 5, 2, 20, 50).unwrap();
        let even = arr.get_sub_array(Dir::Horiz, 2, 0).unwrap();
        assert_eq!(even, BBoxArray::new(BBox::new(0, 0, 10, 10), 3, 2, 40, 50).unwrap());
        let odd = arr.get_sub_array(Dir::Horiz, 2, 1).unwrap();
        assert_eq!(odd.base(), BBox::new(20, 0, 30, 10));
        assert_eq!(odd.nx(), 2);

        let mut all: Vec<_> = even.iter().chain(odd.iter()).map(|b| b.immutable_key()).collect();
        let mut expected: Vec<_> = arr.iter().map(|b| b.immutable_key()).collect();
        all.sort();
        expected.sort();
        assert_eq!(all, expected);

        assert_eq!(arr.get_sub_array(Dir::Horiz, 0, 0), None);
        assert_eq!(arr.get_sub_array(Dir::Horiz, 2, 2), None);
        assert_eq!(arr.get_sub_array(Dir::Horiz, 6, 5), None);
    }

    #[test]
    fn collection_holds_arrays_in_order() {
        let mut col = BBoxCollection::new();
        assert_eq!(col.to_string(), "BBoxCollection()");
        assert!(col.add_rect_arr(BBox::new(0, 0, 1, 1), 1, 1, 0, 0));
        assert!(col.add_rect_arr(BBox::new(5, 5, 6, 6), 2, 1, 3, 0));
        assert!(!col.add_rect_arr(BBox::new(5, 5, 6, 6), 0, 1, 3, 0));
        assert_eq!(col.len(), 2);
        assert_eq!(
            col.to_string(),
            "BBoxCollection(BBoxArray(BBox(0, 0, 1, 1), 1, 1, 0, 0), \
             BBoxArray(BBox(5, 5, 6, 6), 2, 1, 3, 0))"
        );
        assert_eq!(col.bound_box(), BBox::new(0, 0, 9, 6));

        col.translate_mut(1, 1);
        let bases: Vec<_> = col.iter().map(BBoxArray::base).collect();
        assert_eq!(bases, vec![BBox::new(1, 1, 2, 2), BBox::new(6, 6, 7, 7)]);
    }
}
