//! Track coloring for multi-patterned routing layers.

use std::collections::BTreeMap;

use num::integer::div_floor;
use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::Level;

/// The coloring of the tracks of one routing layer.
///
/// Half-track `h` has color `floor((sign * h + htr_offset) / 2) mod num_colors`,
/// so a half-track between two tracks shares the color of the track below it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorSpec {
    /// The number of colors.
    pub num_colors: u32,
    /// Either `1` or `-1`; `-1` if the tracks are mirrored relative to the top level.
    pub sign: i64,
    /// The half-track offset applied before coloring.
    pub htr_offset: i64,
}

impl ColorSpec {
    /// Colors tracks with `num_colors` colors, starting at color 0 on track 0.
    pub const fn new(num_colors: u32) -> Self {
        Self {
            num_colors,
            sign: 1,
            htr_offset: 0,
        }
    }

    /// The color of the given half-track.
    pub fn htr_color(&self, htr: i64) -> u32 {
        let track = div_floor(self.sign * htr + self.htr_offset, 2);
        track.rem_euclid(self.num_colors as i64) as u32
    }
}

/// Track colorings for a stack of routing layers.
///
/// Levels without a [`ColorSpec`] are uncolored; all of their tracks have color 0.
///
/// # Example
///
/// ```
/// use routing::{ColorSpec, TrackColoring};
///
/// let mut colors = TrackColoring::new();
/// colors.set(1, ColorSpec::new(2));
///
/// assert_eq!(colors.htr_color(1, 0), 0);
/// assert_eq!(colors.htr_color(1, 2), 1);
/// assert_eq!(colors.htr_color(1, 4), 0);
/// assert!(colors.same_color(1, 0, 4));
/// assert_eq!(colors.htr_color(2, 2), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackColoring {
    specs: BTreeMap<Level, ColorSpec>,
}

impl TrackColoring {
    /// Creates a coloring with every level uncolored.
    pub fn new() -> Self {
        Self::default()
    }

    /// Colors every layer of the grid description that has more than one color.
    pub fn from_config(config: &GridConfig) -> Self {
        let specs = config
            .layers
            .iter()
            .filter(|layer| layer.colors > 1)
            .map(|layer| (layer.level, ColorSpec::new(layer.colors)))
            .collect();
        Self { specs }
    }

    /// Sets the coloring of the given level.
    pub fn set(&mut self, level: Level, spec: ColorSpec) {
        self.specs.insert(level, spec);
    }

    /// The coloring of the given level, if it is colored.
    pub fn get(&self, level: Level) -> Option<&ColorSpec> {
        self.specs.get(&level)
    }

    /// Iterates over the colored levels and their colorings, lowest level first.
    pub fn iter(&self) -> impl Iterator<Item = (Level, &ColorSpec)> + '_ {
        self.specs.iter().map(|(level, spec)| (*level, spec))
    }

    /// The number of colors on the given level.
    pub fn num_colors(&self, level: Level) -> u32 {
        self.get(level).map_or(1, |spec| spec.num_colors)
    }

    /// The color of a half-track on the given level.
    pub fn htr_color(&self, level: Level, htr: i64) -> u32 {
        self.get(level).map_or(0, |spec| spec.htr_color(htr))
    }

    /// Returns `true` if two half-tracks of the given level have the same color.
    pub fn same_color(&self, level: Level, htr1: i64, htr2: i64) -> bool {
        self.htr_color(level, htr1) == self.htr_color(level, htr2)
    }
}
