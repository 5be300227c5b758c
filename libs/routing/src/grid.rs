//! Per-layer track tables and coordinate conversions.

use std::path::Path;

use geometry::dir::Dir;
use geometry::transform::Transformation;
use num::integer::{div_ceil, div_floor};
use serde::{Deserialize, Serialize};

use crate::coloring::{ColorSpec, TrackColoring};
use crate::config::GridConfig;
use crate::{Level, RoutingError, RoutingResult};

/// Rounding options for converting a coordinate to a half-track index.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug, Serialize, Deserialize)]
#[repr(i8)]
pub enum RoundMode {
    /// The greatest index strictly below the coordinate.
    Less = -2,
    /// The greatest index at or below the coordinate.
    LessEq = -1,
    /// The nearest index. Ties resolve toward the greater index.
    #[default]
    Nearest = 0,
    /// The least index at or above the coordinate.
    GreaterEq = 1,
    /// The least index strictly above the coordinate.
    Greater = 2,
    /// The coordinate must land exactly on an index.
    Exact = 3,
}

impl RoundMode {
    /// The integer code of this rounding mode.
    #[inline]
    pub const fn code(&self) -> i8 {
        *self as i8
    }

    /// Returns the rounding mode with the given integer code.
    pub const fn from_code(code: i8) -> Option<Self> {
        Some(match code {
            -2 => Self::Less,
            -1 => Self::LessEq,
            0 => Self::Nearest,
            1 => Self::GreaterEq,
            2 => Self::Greater,
            3 => Self::Exact,
            _ => return None,
        })
    }

    /// Divides `q` by `unit`, rounding as specified by this mode.
    ///
    /// Returns `None` in [`RoundMode::Exact`] mode if `unit` does not divide `q`.
    fn div(self, q: i64, unit: i64) -> Option<i64> {
        Some(match self {
            Self::Less => div_ceil(q, unit) - 1,
            Self::LessEq => div_floor(q, unit),
            Self::Nearest => div_floor(2 * q + unit, 2 * unit),
            Self::GreaterEq => div_ceil(q, unit),
            Self::Greater => div_floor(q, unit) + 1,
            Self::Exact => {
                if q.rem_euclid(unit) != 0 {
                    return None;
                }
                q / unit
            }
        })
    }
}

/// Converts a coordinate to a half-track index on tracks with the given pitch and offset.
///
/// If `even` is set, only full tracks (even half-track indices) are considered.
///
/// # Example
///
/// ```
/// use routing::{coord_to_custom_htr, RoundMode};
///
/// assert_eq!(coord_to_custom_htr(175, 100, 50, RoundMode::Nearest, false).unwrap(), 3);
/// assert_eq!(coord_to_custom_htr(175, 100, 50, RoundMode::Nearest, true).unwrap(), 2);
/// assert_eq!(coord_to_custom_htr(150, 100, 50, RoundMode::Less, true).unwrap(), 0);
/// ```
pub fn coord_to_custom_htr(
    coord: i64,
    pitch: i64,
    offset: i64,
    mode: RoundMode,
    even: bool,
) -> RoutingResult<i64> {
    if pitch <= 0 || pitch % 2 != 0 {
        return Err(RoutingError::InvalidConfig(format!(
            "pitch {pitch} must be positive and even"
        )));
    }
    let unit = if even { pitch } else { pitch / 2 };
    let Some(idx) = mode.div(coord - offset, unit) else {
        tracing::warn!(coord, pitch, offset, even, "coordinate is not on the grid");
        return Err(RoutingError::OffGrid {
            coord,
            pitch,
            offset,
        });
    };
    Ok(if even { 2 * idx } else { idx })
}

/// The track parameters of one routing layer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TrackInfo {
    dir: Dir,
    pitch: i64,
    width: i64,
    space: i64,
    offset: i64,
}

impl TrackInfo {
    /// Creates a new track description.
    ///
    /// The pitch and width must be positive and even, the space non-negative,
    /// and a wire plus its space must fit within one pitch.
    pub fn new(dir: Dir, pitch: i64, width: i64, space: i64, offset: i64) -> RoutingResult<Self> {
        let invalid = |msg: String| Err(RoutingError::InvalidConfig(msg));
        if pitch <= 0 || pitch % 2 != 0 {
            return invalid(format!("pitch {pitch} must be positive and even"));
        }
        if width <= 0 || width % 2 != 0 {
            return invalid(format!("width {width} must be positive and even"));
        }
        if space < 0 {
            return invalid(format!("space {space} must not be negative"));
        }
        if width + space > pitch {
            return invalid(format!(
                "width {width} plus space {space} exceeds pitch {pitch}"
            ));
        }
        Ok(Self {
            dir,
            pitch,
            width,
            space,
            offset,
        })
    }

    /// The direction wires on this layer run in.
    #[inline]
    pub const fn dir(&self) -> Dir {
        self.dir
    }

    /// The distance between adjacent track centers.
    #[inline]
    pub const fn pitch(&self) -> i64 {
        self.pitch
    }

    /// The width of a single-track wire.
    #[inline]
    pub const fn width(&self) -> i64 {
        self.width
    }

    /// The minimum space between adjacent wires.
    #[inline]
    pub const fn space(&self) -> i64 {
        self.space
    }

    /// The coordinate of track 0.
    #[inline]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Half of the pitch; the distance between adjacent half-tracks.
    #[inline]
    pub const fn htr_pitch(&self) -> i64 {
        self.pitch / 2
    }

    /// Returns `true` if `other` has the same direction and pitch.
    pub fn compatible(&self, other: &TrackInfo) -> bool {
        self.dir == other.dir && self.pitch == other.pitch
    }

    /// The coordinate of the given half-track.
    #[inline]
    pub const fn htr_to_coord(&self, htr: i64) -> i64 {
        self.offset + htr * self.htr_pitch()
    }

    /// The total width of a wire spanning `ntr` tracks.
    ///
    /// Fails if `ntr` is zero.
    pub fn wire_total_width(&self, ntr: u32) -> RoutingResult<i64> {
        if ntr < 1 {
            return Err(RoutingError::InvalidTrackId(format!(
                "wire width must be at least one track, got {ntr}"
            )));
        }
        Ok(self.width + (ntr as i64 - 1) * self.pitch)
    }
}

/// A routing grid: a contiguous stack of routing layers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoutingGrid {
    bot_level: Level,
    infos: Vec<TrackInfo>,
}

impl RoutingGrid {
    /// Creates a grid whose lowest layer is `bot_level`.
    ///
    /// `infos[i]` describes the layer at level `bot_level + i`.
    pub fn new(bot_level: Level, infos: Vec<TrackInfo>) -> RoutingResult<Self> {
        if infos.is_empty() {
            return Err(RoutingError::InvalidConfig(
                "grid must have at least one layer".into(),
            ));
        }
        Ok(Self { bot_level, infos })
    }

    /// Builds a grid from a parsed description.
    pub fn from_config(config: &GridConfig) -> RoutingResult<Self> {
        config.validate()?;
        let infos = config
            .layers
            .iter()
            .map(|layer| {
                TrackInfo::new(
                    layer.dir,
                    layer.pitch,
                    layer.width,
                    layer.space(),
                    layer.offset,
                )
                .map_err(|err| {
                    RoutingError::InvalidConfig(format!("layer {}: {err}", layer.level))
                })
            })
            .collect::<RoutingResult<Vec<_>>>()?;
        let grid = Self::new(config.layers[0].level, infos)?;
        tracing::debug!(
            bot_level = grid.bot_level(),
            top_level = grid.top_level(),
            "built routing grid"
        );
        Ok(grid)
    }

    /// Parses and builds a grid from a TOML description.
    pub fn from_toml_str(s: &str) -> RoutingResult<Self> {
        Self::from_config(&GridConfig::from_toml_str(s)?)
    }

    /// Reads and builds a grid from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> RoutingResult<Self> {
        Self::from_config(&GridConfig::from_file(path)?)
    }

    /// The lowest routing level.
    #[inline]
    pub fn bot_level(&self) -> Level {
        self.bot_level
    }

    /// The highest routing level.
    #[inline]
    pub fn top_level(&self) -> Level {
        self.bot_level + self.infos.len() as Level - 1
    }

    /// The track parameters of the given level.
    pub fn track_info(&self, level: Level) -> RoutingResult<&TrackInfo> {
        usize::try_from(level - self.bot_level)
            .ok()
            .and_then(|idx| self.infos.get(idx))
            .ok_or(RoutingError::NoSuchLayer(level))
    }

    /// The direction wires on the given level run in.
    pub fn direction(&self, level: Level) -> RoutingResult<Dir> {
        Ok(self.track_info(level)?.dir())
    }

    /// The coordinate of a half-track, perpendicular to the layer direction.
    pub fn htr_to_coord(&self, level: Level, htr: i64) -> RoutingResult<i64> {
        Ok(self.track_info(level)?.htr_to_coord(htr))
    }

    /// Converts a coordinate to a half-track index on the given level.
    pub fn coord_to_htr(&self, level: Level, coord: i64, mode: RoundMode) -> RoutingResult<i64> {
        let info = self.track_info(level)?;
        coord_to_custom_htr(coord, info.pitch(), info.offset(), mode, false)
    }

    /// Converts a coordinate to the half-track index of a full track on the given level.
    ///
    /// The result is always even.
    pub fn coord_to_even_htr(
        &self,
        level: Level,
        coord: i64,
        mode: RoundMode,
    ) -> RoutingResult<i64> {
        let info = self.track_info(level)?;
        coord_to_custom_htr(coord, info.pitch(), info.offset(), mode, true)
    }

    /// The total width of a wire spanning `ntr` tracks on the given level.
    pub fn wire_total_width(&self, level: Level, ntr: u32) -> RoutingResult<i64> {
        self.track_info(level)?.wire_total_width(ntr)
    }

    /// The lower and upper edges of a wire spanning `ntr` tracks centered at half-track `htr`.
    pub fn wire_bounds_htr(&self, level: Level, htr: i64, ntr: u32) -> RoutingResult<(i64, i64)> {
        let info = self.track_info(level)?;
        let center = info.htr_to_coord(htr);
        let half_width = info.wire_total_width(ntr)? / 2;
        Ok((center - half_width, center + half_width))
    }

    /// Finds the half-track of an `ntr`-track wire lying entirely on one side of `coord`.
    ///
    /// With [`RoundMode::Greater`], both wire edges lie strictly above `coord`;
    /// with [`RoundMode::GreaterEq`], the lower edge may touch `coord`. The
    /// `Less` modes are symmetric. The wire closest to `coord` is returned.
    pub fn find_next_htr(
        &self,
        level: Level,
        coord: i64,
        ntr: u32,
        mode: RoundMode,
        even: bool,
    ) -> RoutingResult<i64> {
        let info = self.track_info(level)?;
        let half_width = info.wire_total_width(ntr)? / 2;
        let center = match mode {
            RoundMode::Less | RoundMode::LessEq => coord - half_width,
            RoundMode::Greater | RoundMode::GreaterEq => coord + half_width,
            RoundMode::Nearest | RoundMode::Exact => return Err(RoutingError::NoDirection(mode)),
        };
        coord_to_custom_htr(center, info.pitch(), info.offset(), mode, even)
    }

    /// The minimum half-track separation between the centers of an `ntr1`-track
    /// wire and an `ntr2`-track wire on the given level.
    pub fn sep_htr(&self, level: Level, ntr1: u32, ntr2: u32) -> RoutingResult<i64> {
        let info = self.track_info(level)?;
        let dist =
            info.wire_total_width(ntr1)? / 2 + info.wire_total_width(ntr2)? / 2 + info.space();
        Ok(div_ceil(dist, info.htr_pitch()).max(1))
    }

    /// The sign and offset of the transformation along the track coordinate axis of `info`.
    fn track_axis(info: &TrackInfo, xform: Transformation) -> RoutingResult<(i64, i64)> {
        if xform.flips_xy() {
            return Err(RoutingError::SwapsAxes(xform));
        }
        let (sx, sy) = xform.axis_scale();
        Ok(match info.dir() {
            Dir::Vert => (sx, xform.dx),
            Dir::Horiz => (sy, xform.dy),
        })
    }

    /// Maps a half-track index through a transformation.
    ///
    /// Fails if the transformation swaps axes or does not map the half-track
    /// grid onto itself.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// use routing::RoutingGrid;
    ///
    /// let grid = RoutingGrid::from_toml_str(r#"
    ///     [[layers]]
    ///     level = 1
    ///     dir = "vert"
    ///     pitch = 100
    ///     width = 40
    ///     offset = 50
    /// "#).unwrap();
    ///
    /// let xform = Transformation::new(200, 0, Orientation::ReflectHoriz);
    /// // Track 0 at x = 50 lands at x = 150, which is half-track 2.
    /// assert_eq!(grid.transform_htr(1, 0, xform).unwrap(), 2);
    /// assert!(grid.transform_htr(1, 0, Transformation::translate(10, 0)).is_err());
    /// ```
    pub fn transform_htr(
        &self,
        level: Level,
        htr: i64,
        xform: Transformation,
    ) -> RoutingResult<i64> {
        let info = self.track_info(level)?;
        let (sign, shift) = Self::track_axis(info, xform)?;
        let coord = sign * info.htr_to_coord(htr) + shift;
        coord_to_custom_htr(coord, info.pitch(), info.offset(), RoundMode::Exact, false)
    }

    /// Returns the track coloring seen by a child placed with `xform` in a
    /// parent colored by `colors`.
    ///
    /// A child half-track gets the color of the parent half-track it lands on.
    pub fn track_coloring_at(
        &self,
        colors: &TrackColoring,
        xform: Transformation,
    ) -> RoutingResult<TrackColoring> {
        let mut child = TrackColoring::new();
        for (level, spec) in colors.iter() {
            let info = self.track_info(level)?;
            let (sign, _) = Self::track_axis(info, xform)?;
            let shift = self.transform_htr(level, 0, xform)?;
            child.set(
                level,
                ColorSpec {
                    num_colors: spec.num_colors,
                    sign: spec.sign * sign,
                    htr_offset: spec.sign * shift + spec.htr_offset,
                },
            );
        }
        Ok(child)
    }
}
