//! 2-D integer geometry for integrated circuit layout.
//!
//! Coordinates are `i64` values in a fixed physical unit; every operation is
//! exact integer arithmetic.
//!
//! # Examples
//!
//! Create a [bounding box](crate::bbox::BBox) and place it with a
//! [transformation](crate::transform::Transformation):
//!
//! ```
//! # use geometry::prelude::*;
//! let b = BBox::new(0, 0, 3, 6);
//! let t = Transformation::new(1, 1, Orientation::R90);
//! assert_eq!(b.transform(t), BBox::new(-5, 1, 1, 4));
//! ```
#![warn(missing_docs)]

pub mod bbox;
pub mod bbox_array;
pub mod dir;
pub mod interval;
pub mod orientation;
pub mod prelude;
pub mod transform;
