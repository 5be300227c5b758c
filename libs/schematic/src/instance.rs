//! Schematic instances and parameters.

use arcstr::ArcStr;
use geometry::transform::Transformation;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Str(ArcStr),
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<ArcStr> for ParamValue {
    fn from(value: ArcStr) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value.into())
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

/// An instance of a master cell within a schematic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// The library of the master cell.
    pub lib_name: ArcStr,
    /// The name of the master cell.
    pub cell_name: ArcStr,
    /// Whether the master is a primitive.
    pub is_primitive: bool,
    /// The placement of the instance.
    pub xform: Transformation,
    connections: IndexMap<ArcStr, ArcStr>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    params: IndexMap<ArcStr, ParamValue>,
}

impl Instance {
    /// Creates an unconnected instance of the given master.
    pub fn new(
        lib_name: impl Into<ArcStr>,
        cell_name: impl Into<ArcStr>,
        is_primitive: bool,
        xform: Transformation,
    ) -> Self {
        Self {
            lib_name: lib_name.into(),
            cell_name: cell_name.into(),
            is_primitive,
            xform,
            connections: IndexMap::new(),
            params: IndexMap::new(),
        }
    }

    /// The net connected to the given terminal, if any.
    pub fn get_connection(&self, term: &str) -> Option<&ArcStr> {
        self.connections.get(term)
    }

    /// Iterates over `(terminal, net)` pairs in declaration order.
    pub fn connections(&self) -> impl Iterator<Item = (&ArcStr, &ArcStr)> {
        self.connections.iter()
    }

    /// Connects `term` to `net`, replacing any existing connection of `term`.
    ///
    /// A terminal that was already connected keeps its position.
    pub fn update_connection(&mut self, term: impl Into<ArcStr>, net: impl Into<ArcStr>) {
        self.connections.insert(term.into(), net.into());
    }

    /// Disconnects `term`, returning the net it was connected to.
    pub fn remove_connection(&mut self, term: &str) -> Option<ArcStr> {
        self.connections.shift_remove(term)
    }

    /// The value of the given parameter, if set.
    pub fn get_param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Iterates over `(name, value)` parameter pairs.
    pub fn params(&self) -> impl Iterator<Item = (&ArcStr, &ParamValue)> {
        self.params.iter()
    }

    /// Sets a parameter.
    pub fn set_param(&mut self, name: impl Into<ArcStr>, value: impl Into<ParamValue>) {
        self.params.insert(name.into(), value.into());
    }

    /// Points this instance at a different master.
    ///
    /// Parameters are cleared; connections are cleared unless `keep_connections` is set.
    pub fn update_master(
        &mut self,
        lib_name: impl Into<ArcStr>,
        cell_name: impl Into<ArcStr>,
        is_primitive: bool,
        keep_connections: bool,
    ) {
        self.lib_name = lib_name.into();
        self.cell_name = cell_name.into();
        self.is_primitive = is_primitive;
        self.params.clear();
        if !keep_connections {
            self.connections.clear();
        }
    }
}
