//! Wire positions on the routing grid.

use geometry::transform::Transformation;
use serde::{Deserialize, Serialize};

use crate::grid::RoutingGrid;
use crate::{Level, RoutingError, RoutingResult};

/// The position of a bundle of parallel wires on a routing layer.
///
/// The bundle consists of `num` wires, each `ntr` tracks wide. Wire `i` is
/// centered at half-track `htr + i * htr_pitch`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId {
    level: Level,
    htr: i64,
    ntr: u32,
    num: u32,
    htr_pitch: i64,
}

impl TrackId {
    /// Creates a new [`TrackId`].
    ///
    /// Fails if `ntr` or `num` is zero, or if a bundle of more than one wire has
    /// zero pitch.
    pub fn new(level: Level, htr: i64, ntr: u32, num: u32, htr_pitch: i64) -> RoutingResult<Self> {
        if ntr < 1 {
            return Err(RoutingError::InvalidTrackId(format!(
                "wire width must be at least one track, got {ntr}"
            )));
        }
        if num < 1 {
            return Err(RoutingError::InvalidTrackId(format!(
                "bundle must have at least one wire, got {num}"
            )));
        }
        if num > 1 && htr_pitch == 0 {
            return Err(RoutingError::InvalidTrackId(format!(
                "bundle of {num} wires must have a nonzero pitch"
            )));
        }
        Ok(Self {
            level,
            htr,
            ntr,
            num,
            htr_pitch,
        })
    }

    /// A single wire of width `ntr` tracks at half-track `htr`.
    pub fn single(level: Level, htr: i64, ntr: u32) -> RoutingResult<Self> {
        Self::new(level, htr, ntr, 1, 0)
    }

    /// The routing level.
    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    /// The half-track index of the first wire.
    #[inline]
    pub fn htr(&self) -> i64 {
        self.htr
    }

    /// Moves the bundle so that its first wire is at half-track `htr`.
    #[inline]
    pub fn set_htr(&mut self, htr: i64) {
        self.htr = htr;
    }

    /// The width of each wire, in tracks.
    #[inline]
    pub fn ntr(&self) -> u32 {
        self.ntr
    }

    /// The number of wires.
    #[inline]
    pub fn num(&self) -> u32 {
        self.num
    }

    /// The half-track distance between adjacent wires.
    #[inline]
    pub fn htr_pitch(&self) -> i64 {
        self.htr_pitch
    }

    /// Iterates over the center half-track of each wire.
    pub fn wire_htrs(&self) -> impl Iterator<Item = i64> {
        let TrackId { htr, htr_pitch, .. } = *self;
        (0..self.num as i64).map(move |i| htr + i * htr_pitch)
    }

    /// The lower and upper edges spanned by the whole bundle, perpendicular to the layer direction.
    pub fn get_bounds(&self, grid: &RoutingGrid) -> RoutingResult<(i64, i64)> {
        let last = self.htr + (self.num as i64 - 1) * self.htr_pitch;
        let (lo, hi) = (self.htr.min(last), self.htr.max(last));
        let (lower, _) = grid.wire_bounds_htr(self.level, lo, self.ntr)?;
        let (_, upper) = grid.wire_bounds_htr(self.level, hi, self.ntr)?;
        Ok((lower, upper))
    }

    /// Maps this bundle through a transformation.
    ///
    /// A mirroring transformation negates the wire pitch.
    pub fn transform(&self, grid: &RoutingGrid, xform: Transformation) -> RoutingResult<Self> {
        let htr = grid.transform_htr(self.level, self.htr, xform)?;
        let next = grid.transform_htr(self.level, self.htr + self.htr_pitch, xform)?;
        Ok(Self {
            htr,
            htr_pitch: next - htr,
            ..*self
        })
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrackId(level={}, htr={}, ntr={}, num={}, htr_pitch={})",
            self.level, self.htr, self.ntr, self.num, self.htr_pitch
        )
    }
}
