//! Utilities and types for orienting layout objects.
//!
//! The eight Manhattan orientations form the dihedral group of order 8.
//! Each orientation has a 3-bit code: bit 0 mirrors left/right, bit 1
//! mirrors up/down, and bit 2 selects the axis-swapping half of the group.

use serde::{Deserialize, Serialize};

/// A 2x2 integer matrix whose entries are all `-1`, `0`, or `1`.
pub type OrientMatrix = [[i8; 2]; 2];

/// An orientation of a geometric object.
///
/// Captures reflection and rotation, but not position or scaling.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Orientation {
    /// No rotations or reflections.
    #[default]
    R0 = 0,
    /// Reflect horizontally (ie. about the y-axis).
    #[serde(rename = "MY")]
    ReflectHoriz = 1,
    /// Reflect vertically (ie. about the x-axis).
    #[serde(rename = "MX")]
    ReflectVert = 2,
    /// Rotate 180 degrees.
    R180 = 3,
    /// Flip across the line y = x.
    #[serde(rename = "MXR90")]
    FlipYx = 4,
    /// Rotate 90 degrees counter-clockwise.
    R90 = 5,
    /// Rotate 270 degrees counter-clockwise.
    R270 = 6,
    /// Flip across the line y = -x.
    #[serde(rename = "MYR90")]
    FlipMinusYx = 7,
}

impl Orientation {
    /// Returns all 8 orientations, ordered by code.
    pub const fn all() -> [Self; 8] {
        [
            Self::R0,
            Self::ReflectHoriz,
            Self::ReflectVert,
            Self::R180,
            Self::FlipYx,
            Self::R90,
            Self::R270,
            Self::FlipMinusYx,
        ]
    }

    /// The 3-bit integer code of this orientation.
    #[inline]
    pub const fn code(&self) -> u8 {
        *self as u8
    }

    /// Returns the orientation with the given code, if the code is in `0..8`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Orientation::from_code(5), Some(Orientation::R90));
    /// assert_eq!(Orientation::from_code(8), None);
    /// ```
    pub const fn from_code(code: u8) -> Option<Self> {
        if code < 8 {
            Some(Self::all()[code as usize])
        } else {
            None
        }
    }

    /// The conventional name of this orientation (`R0`, `MY`, `MX`, ...).
    pub const fn name(&self) -> &'static str {
        match self {
            Self::R0 => "R0",
            Self::ReflectHoriz => "MY",
            Self::ReflectVert => "MX",
            Self::R180 => "R180",
            Self::FlipYx => "MXR90",
            Self::R90 => "R90",
            Self::R270 => "R270",
            Self::FlipMinusYx => "MYR90",
        }
    }

    /// Mirrors this orientation left-to-right.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Orientation::R0.flip_lr(), Orientation::ReflectHoriz);
    /// assert_eq!(Orientation::R90.flip_lr(), Orientation::FlipYx);
    /// ```
    #[inline]
    pub const fn flip_lr(&self) -> Self {
        Self::all()[(self.code() ^ 0b001) as usize]
    }

    /// Mirrors this orientation top-to-bottom.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Orientation::R0.flip_ud(), Orientation::ReflectVert);
    /// assert_eq!(Orientation::R90.flip_ud(), Orientation::FlipMinusYx);
    /// ```
    #[inline]
    pub const fn flip_ud(&self) -> Self {
        Self::all()[(self.code() ^ 0b010) as usize]
    }

    /// Returns `true` if this orientation maps the x-axis onto the y-axis.
    #[inline]
    pub const fn swaps_axes(&self) -> bool {
        self.code() & 0b100 != 0
    }

    /// The transformation matrix of this orientation.
    pub const fn matrix(&self) -> OrientMatrix {
        match self {
            Self::R0 => [[1, 0], [0, 1]],
            Self::ReflectHoriz => [[-1, 0], [0, 1]],
            Self::ReflectVert => [[1, 0], [0, -1]],
            Self::R180 => [[-1, 0], [0, -1]],
            Self::FlipYx => [[0, 1], [1, 0]],
            Self::R90 => [[0, -1], [1, 0]],
            Self::R270 => [[0, 1], [-1, 0]],
            Self::FlipMinusYx => [[0, -1], [-1, 0]],
        }
    }

    /// Returns the orientation represented by the given matrix, if any.
    pub fn from_matrix(mat: OrientMatrix) -> Option<Self> {
        Self::all().into_iter().find(|o| o.matrix() == mat)
    }

    /// The orientation that undoes this one.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Orientation::R90.inverse(), Orientation::R270);
    /// assert_eq!(Orientation::FlipYx.inverse(), Orientation::FlipYx);
    /// ```
    pub const fn inverse(&self) -> Self {
        match self {
            Self::R90 => Self::R270,
            Self::R270 => Self::R90,
            _ => *self,
        }
    }

    /// Returns the orientation equivalent to applying `self` and then `next`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let o = Orientation::R90.then(Orientation::R90);
    /// assert_eq!(o, Orientation::R180);
    /// let o = Orientation::ReflectVert.then(Orientation::R90);
    /// assert_eq!(o, Orientation::FlipYx);
    /// ```
    pub fn then(self, next: Self) -> Self {
        next * self
    }

    /// Applies this orientation to the point `(x, y)`.
    #[inline]
    pub const fn apply(&self, x: i64, y: i64) -> (i64, i64) {
        let m = self.matrix();
        (
            m[0][0] as i64 * x + m[0][1] as i64 * y,
            m[1][0] as i64 * x + m[1][1] as i64 * y,
        )
    }
}

/// Multiplies two 2x2 matrices, returning a new 2x2 matrix.
fn matmul_i8(a: &OrientMatrix, b: &OrientMatrix) -> OrientMatrix {
    [
        [
            a[0][0] * b[0][0] + a[0][1] * b[1][0],
            a[0][0] * b[0][1] + a[0][1] * b[1][1],
        ],
        [
            a[1][0] * b[0][0] + a[1][1] * b[1][0],
            a[1][0] * b[0][1] + a[1][1] * b[1][1],
        ],
    ]
}

impl std::ops::Mul<Orientation> for Orientation {
    type Output = Orientation;
    /// Composes two orientations as matrices: `(a * b)` applies `b` first.
    fn mul(self, rhs: Orientation) -> Self::Output {
        let mat = matmul_i8(&self.matrix(), &rhs.matrix());
        // The group is closed under multiplication.
        Self::from_matrix(mat).unwrap_or_else(|| unreachable!("{mat:?} is not an orientation"))
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Orientation {
    type Err = UnknownOrientationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|o| o.name() == s)
            .ok_or_else(|| UnknownOrientationError(s.to_string()))
    }
}

/// Indicates that a string did not name a valid orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOrientationError(pub String);

impl std::fmt::Display for UnknownOrientationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown orientation: {}", self.0)
    }
}

impl std::error::Error for UnknownOrientationError {}
