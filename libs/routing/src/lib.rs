//! Routing grids and half-track coordinates.
//!
//! Each routing layer (identified by an integer *level*) has uniformly spaced
//! tracks running in a single [`Dir`](geometry::dir::Dir). Tracks are addressed
//! by *half-track indices*: half-track `h` on a layer is centered at
//! `offset + h * pitch / 2`, so even indices land on tracks and odd indices
//! land halfway between two tracks.
//!
//! # Examples
//!
//! ```
//! use routing::{RoundMode, RoutingGrid};
//!
//! let grid = RoutingGrid::from_toml_str(r#"
//!     [[layers]]
//!     level = 1
//!     dir = "vert"
//!     pitch = 100
//!     width = 40
//!     offset = 50
//! "#).unwrap();
//!
//! assert_eq!(grid.htr_to_coord(1, 7).unwrap(), 400);
//! assert_eq!(grid.coord_to_htr(1, 400, RoundMode::Exact).unwrap(), 7);
//! assert_eq!(grid.coord_to_htr(1, 410, RoundMode::LessEq).unwrap(), 7);
//! assert!(grid.coord_to_htr(1, 410, RoundMode::Exact).is_err());
//! ```
#![warn(missing_docs)]

use std::path::PathBuf;

use geometry::transform::Transformation;

pub mod coloring;
pub mod config;
pub mod grid;
pub mod track;


pub use coloring::{ColorSpec, TrackColoring};
pub use config::{GridConfig, LayerConfig};
pub use grid::{coord_to_custom_htr, RoundMode, RoutingGrid, TrackInfo};
pub use track::TrackId;

/// A routing layer level.
pub type Level = i32;

/// The [`RoutingError`] result type.
pub type RoutingResult<T> = Result<T, RoutingError>;

/// An error building or querying a routing grid.
#[derive(thiserror::Error, Debug)]
pub enum RoutingError {
    /// The grid has no layer at the given level.
    #[error("no routing layer at level {0}")]
    NoSuchLayer(Level),
    /// A coordinate does not land exactly on a half-track.
    #[error("coordinate {coord} is not on a half-track of pitch {pitch} with offset {offset}")]
    OffGrid {
        /// The offending coordinate.
        coord: i64,
        /// The track pitch.
        pitch: i64,
        /// The track offset.
        offset: i64,
    },
    /// A rounding mode that does not pick a side was used where one is required.
    #[error("round mode {0:?} does not select a direction")]
    NoDirection(RoundMode),
    /// The grid description is inconsistent.
    #[error("invalid routing grid: {0}")]
    InvalidConfig(String),
    /// A track id with an invalid width, count, or pitch.
    #[error("invalid track id: {0}")]
    InvalidTrackId(String),
    /// A transformation maps routing tracks onto the perpendicular axis.
    #[error("transformation {0} swaps the x and y axes")]
    SwapsAxes(Transformation),
    /// Error trying to read the given file.
    #[error("failed to read file at path `{path:?}`: {err:?}")]
    FailedToRead {
        /// The path we attempted to read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        err: std::io::Error,
    },
    /// A grid description that is not valid TOML or does not match the expected schema.
    #[error("failed to parse routing grid description: {0}")]
    Toml(#[from] toml::de::Error),
}
