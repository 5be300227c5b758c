//! An import prelude that re-exports commonly used items.

pub use crate::bbox::{BBox, BoundBox};
pub use crate::bbox_array::{BBoxArray, BBoxCollection};
pub use crate::dir::Dir;
pub use crate::interval::Interval;
pub use crate::orientation::Orientation;
pub use crate::transform::{Transform, TransformMut, Transformation, Translate, TranslateMut};
