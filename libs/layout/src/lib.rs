//! Layout cellviews.
//!
//! A [`LayCellView`] stores the wires and shapes of one layout cell. Wires are
//! placed on routing tracks by [`TrackId`]; each track keeps a
//! [`DisjointIntervals`] of the wire spans drawn on it so that no two wires on
//! a track overlap or touch, and every shape is recorded in a
//! [`SpatialIndex`] for area queries.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use geometry::prelude::*;
//! use layout::LayCellView;
//! use routing::{RoutingGrid, TrackColoring, TrackId};
//!
//! let grid = RoutingGrid::from_toml_str(r#"
//!     [[layers]]
//!     level = 1
//!     dir = "vert"
//!     pitch = 100
//!     width = 40
//!     offset = 50
//! "#).unwrap();
//! let mut cv = LayCellView::new(Arc::new(grid), Arc::new(TrackColoring::new()), "top");
//!
//! let tid = TrackId::single(1, 2, 1).unwrap();
//! let boxes = cv.add_warr(&tid, 0, 500).unwrap();
//! assert_eq!(boxes, vec![BBox::new(130, 0, 170, 500)]);
//!
//! // The track is taken.
//! assert!(cv.add_warr(&tid, 400, 600).is_err());
//!
//! let hits = cv.get_intersect(1, BBox::new(0, 0, 140, 10), 0, 0, true);
//! assert_eq!(hits, boxes);
//! ```
#![warn(missing_docs)]

use std::collections::BTreeMap;
use std::sync::Arc;

use arcstr::ArcStr;
use geometry::bbox::BBox;
use geometry::interval::Interval;
use intervals::DisjointIntervals;
use routing::{Level, RoutingError, RoutingGrid, TrackColoring, TrackId};
use spatial::{SpatialError, SpatialIndex};

#[cfg(test)]
mod tests;

/// The [`LayoutError`] result type.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// A layout error.
#[derive(thiserror::Error, Debug)]
pub enum LayoutError {
    /// An argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A shape that must have positive area did not.
    #[error("box {0} does not have positive area")]
    NotPhysical(BBox),
    /// A wire overlaps or touches an existing wire on the same track.
    #[error("wire {span} on layer {level} half-track {htr} conflicts with an existing wire")]
    Conflict {
        /// The routing level.
        level: Level,
        /// The half-track of the conflicting wire.
        htr: i64,
        /// The span of the rejected wire along the track.
        span: Interval,
    },
    /// No wire with the given span exists on the given track.
    #[error("no wire {span} on layer {level} half-track {htr}")]
    WireNotFound {
        /// The routing level.
        level: Level,
        /// The half-track searched.
        htr: i64,
        /// The span searched for.
        span: Interval,
    },
    /// An error resolving a track on the routing grid.
    #[error("routing error: {0}")]
    Routing(#[from] RoutingError),
    /// An error accessing the shape index.
    #[error("shape index error: {0}")]
    Spatial(#[from] SpatialError),
}

/// The metadata stored for each wire on a track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct WireInfo {
    /// The id of the wire's shape in the cellview's shape index.
    pub shape_id: usize,
    /// The width of the wire, in tracks.
    pub ntr: u32,
    /// The color of the track the wire is drawn on.
    pub color: u32,
}

/// A shape stored in the spatial index.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Shape {
    level: Level,
    /// The distance other shapes must keep from this shape.
    spacing: i64,
}

/// The wires and shapes of a layout cell.
#[derive(Debug, Clone)]
pub struct LayCellView {
    cell_name: ArcStr,
    grid: Arc<RoutingGrid>,
    colors: Arc<TrackColoring>,
    tracks: BTreeMap<(Level, i64), DisjointIntervals<WireInfo>>,
    shapes: SpatialIndex<Shape>,
    max_spacing: i64,
}

impl LayCellView {
    /// Creates an empty cellview on the given routing grid.
    pub fn new(
        grid: Arc<RoutingGrid>,
        colors: Arc<TrackColoring>,
        cell_name: impl Into<ArcStr>,
    ) -> Self {
        Self {
            cell_name: cell_name.into(),
            grid,
            colors,
            tracks: BTreeMap::new(),
            shapes: SpatialIndex::new(),
            max_spacing: 0,
        }
    }

    /// The name of the cell.
    #[inline]
    pub fn cell_name(&self) -> &ArcStr {
        &self.cell_name
    }

    /// The routing grid wires are placed on.
    #[inline]
    pub fn grid(&self) -> &Arc<RoutingGrid> {
        &self.grid
    }

    /// The track coloring of the cell.
    #[inline]
    pub fn colors(&self) -> &Arc<TrackColoring> {
        &self.colors
    }

    /// The number of wires and rectangles in the cell.
    #[inline]
    pub fn num_shapes(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the cell has no shapes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// The bounding box of every shape in the cell.
    ///
    /// Returns the invalid box if the cell is empty.
    pub fn bbox(&self) -> BBox {
        self.shapes.bound_box()
    }

    /// The wires drawn on the given track, if any.
    pub fn track(&self, level: Level, htr: i64) -> Option<&DisjointIntervals<WireInfo>> {
        self.tracks.get(&(level, htr))
    }

    /// Adds every wire of the bundle `tid`, spanning `[lower, upper)` along the track.
    ///
    /// Returns the box of each wire, in bundle order. If any wire would overlap or
    /// touch an existing wire on its track, no wire is added.
    pub fn add_warr(&mut self, tid: &TrackId, lower: i64, upper: i64) -> LayoutResult<Vec<BBox>> {
        if lower >= upper {
            return Err(LayoutError::InvalidArgument(format!(
                "wire lower bound {lower} must be less than upper bound {upper}"
            )));
        }
        let level = tid.level();
        let info = *self.grid.track_info(level)?;
        let span = Interval::new(lower, upper);

        let mut wires = Vec::with_capacity(tid.num() as usize);
        for htr in tid.wire_htrs() {
            let free = self
                .tracks
                .get(&(level, htr))
                .is_none_or(|track| track.can_add(span, false));
            if !free {
                tracing::warn!(%tid, htr, %span, "rejected conflicting wire");
                return Err(LayoutError::Conflict { level, htr, span });
            }
            let (tl, th) = self.grid.wire_bounds_htr(level, htr, tid.ntr())?;
            wires.push((htr, BBox::from_orient(info.dir(), lower, upper, tl, th)));
        }

        for &(htr, bbox) in &wires {
            let shape_id = self.shapes.insert(
                Shape {
                    level,
                    spacing: info.space(),
                },
                bbox,
            )?;
            let wire = WireInfo {
                shape_id,
                ntr: tid.ntr(),
                color: self.colors.htr_color(level, htr),
            };
            let added = self
                .tracks
                .entry((level, htr))
                .or_default()
                .add(span, wire, false);
            debug_assert!(added, "track {htr} changed during insertion");
        }
        self.max_spacing = self.max_spacing.max(info.space());
        tracing::debug!(%tid, %span, cell = %self.cell_name, "added wire array");
        Ok(wires.into_iter().map(|(_, bbox)| bbox).collect())
    }

    /// Adds a free-standing rectangle on the given layer, returning its shape id.
    pub fn add_rect(&mut self, level: Level, bbox: BBox) -> LayoutResult<usize> {
        if !bbox.is_physical() {
            return Err(LayoutError::NotPhysical(bbox));
        }
        let id = self.shapes.insert(Shape { level, spacing: 0 }, bbox)?;
        tracing::debug!(level, %bbox, cell = %self.cell_name, "added rectangle");
        Ok(id)
    }

    /// Removes the wire spanning exactly `[lower, upper)` on the given track, returning its box.
    pub fn remove_wire(
        &mut self,
        level: Level,
        htr: i64,
        lower: i64,
        upper: i64,
    ) -> LayoutResult<BBox> {
        if lower >= upper {
            return Err(LayoutError::InvalidArgument(format!(
                "wire lower bound {lower} must be less than upper bound {upper}"
            )));
        }
        let span = Interval::new(lower, upper);
        let not_found = || LayoutError::WireNotFound { level, htr, span };
        let track = self.tracks.get_mut(&(level, htr)).ok_or_else(not_found)?;
        let wire = track.remove(span).ok_or_else(not_found)?;
        if track.is_empty() {
            self.tracks.remove(&(level, htr));
        }
        let bbox = self.shapes.get_bbox(wire.shape_id)?;
        self.shapes.pop(wire.shape_id)?;
        tracing::debug!(level, htr, %span, cell = %self.cell_name, "removed wire");
        Ok(bbox)
    }

    /// Returns the box of every shape on `level` that intersects `query`.
    ///
    /// The query box is first grown by `spx` horizontally and `spy` vertically.
    /// Unless `no_sp` is set, each stored shape is also grown by its own
    /// spacing (the layer space for wires, zero for rectangles) before testing.
    /// Shapes touching the query along an edge are included.
    pub fn get_intersect(
        &self,
        level: Level,
        query: BBox,
        spx: i64,
        spy: i64,
        no_sp: bool,
    ) -> Vec<BBox> {
        if !query.is_valid() {
            return Vec::new();
        }
        let query = query.expand(spx, spy);
        let margin = if no_sp { 0 } else { self.max_spacing };
        self.shapes
            .intersect_iter(query.expand(margin, margin))
            .filter(|&(bbox, id)| {
                self.shapes.get(id).is_ok_and(|shape| {
                    let sp = if no_sp { 0 } else { shape.spacing };
                    shape.level == level && bbox.expand(sp, sp).intersects(&query)
                })
            })
            .map(|(bbox, _)| bbox)
            .collect()
    }
}
