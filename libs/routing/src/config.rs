//! Serialized routing grid descriptions.

use std::path::Path;

use geometry::dir::Dir;
use serde::{Deserialize, Serialize};

use crate::{Level, RoutingError, RoutingResult};

/// A routing grid description, as read from a TOML file.
///
/// Layers must be listed in ascending, contiguous level order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// The routing layers, lowest first.
    pub layers: Vec<LayerConfig>,
}

/// The description of a single routing layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// The layer level.
    pub level: Level,
    /// The direction wires on this layer run in.
    pub dir: Dir,
    /// The distance between adjacent track centers.
    pub pitch: i64,
    /// The width of a single-track wire.
    pub width: i64,
    /// The coordinate of track 0.
    pub offset: i64,
    /// The number of track colors. Uncolored layers have one color.
    #[serde(default = "default_colors")]
    pub colors: u32,
    /// The minimum space between adjacent wires. Defaults to `pitch - width`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<i64>,
}

fn default_colors() -> u32 {
    1
}

impl LayerConfig {
    /// The minimum space between adjacent wires on this layer.
    pub fn space(&self) -> i64 {
        self.space.unwrap_or(self.pitch - self.width)
    }
}

impl GridConfig {
    /// Parses a grid description from a TOML string.
    pub fn from_toml_str(s: &str) -> RoutingResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Reads a grid description from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> RoutingResult<Self> {
        let path = path.as_ref();
        tracing::debug!("reading routing grid file: {:?}", path);
        let s = std::fs::read_to_string(path).map_err(|err| RoutingError::FailedToRead {
            path: path.into(),
            err,
        })?;
        Self::from_toml_str(&s)
    }

    /// Checks that levels are contiguous and ascending and that every layer has a color.
    ///
    /// Track geometry is checked when the grid is built.
    pub fn validate(&self) -> RoutingResult<()> {
        let Some(first) = self.layers.first() else {
            return Err(RoutingError::InvalidConfig(
                "grid must have at least one layer".into(),
            ));
        };
        for (i, layer) in self.layers.iter().enumerate() {
            let expected = first.level + i as Level;
            if layer.level != expected {
                return Err(RoutingError::InvalidConfig(format!(
                    "expected layer at level {expected}, found level {}",
                    layer.level
                )));
            }
            if layer.colors == 0 {
                return Err(RoutingError::InvalidConfig(format!(
                    "layer {} must have at least one color",
                    layer.level
                )));
            }
        }
        Ok(())
    }
}
