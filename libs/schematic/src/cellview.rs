//! Schematic cellviews.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use arcstr::ArcStr;
use geometry::transform::TranslateMut;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::instance::{Instance, ParamValue};
use crate::terminal::{SigType, TermType, Terminal};
use crate::{SchError, SchResult};

/// The terminals, instances, and parameters of a schematic cell.
///
/// Terminals and instances keep their insertion order, which is also the order
/// they are written in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchCellView {
    /// The library containing the cell.
    pub lib_name: ArcStr,
    /// The name of the cell.
    pub cell_name: ArcStr,
    /// The name of the view.
    pub view_name: ArcStr,
    terminals: IndexMap<ArcStr, Terminal>,
    instances: IndexMap<ArcStr, Instance>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    params: IndexMap<ArcStr, ParamValue>,
}

impl SchCellView {
    /// Creates an empty cellview.
    pub fn new(
        lib_name: impl Into<ArcStr>,
        cell_name: impl Into<ArcStr>,
        view_name: impl Into<ArcStr>,
    ) -> Self {
        Self {
            lib_name: lib_name.into(),
            cell_name: cell_name.into(),
            view_name: view_name.into(),
            terminals: IndexMap::new(),
            instances: IndexMap::new(),
            params: IndexMap::new(),
        }
    }

    /// Reads a cellview from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> SchResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "reading schematic cellview");
        let s = std::fs::read_to_string(path).map_err(|err| SchError::FailedToRead {
            path: path.into(),
            err,
        })?;
        s.parse()
    }

    /// Serializes this cellview to YAML.
    pub fn to_yaml(&self) -> SchResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Writes this cellview to a YAML file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> SchResult<()> {
        let path = path.as_ref();
        let s = self.to_yaml()?;
        std::fs::write(path, s).map_err(|err| SchError::FailedToWrite {
            path: path.into(),
            err,
        })?;
        tracing::debug!(path = ?path, cell = %self.cell_name, "wrote schematic cellview");
        Ok(())
    }

    /// Iterates over `(name, direction)` pairs of every terminal, in order.
    pub fn terminals(&self) -> impl Iterator<Item = (&ArcStr, TermType)> {
        self.terminals.iter().map(|(name, term)| (name, term.ttype))
    }

    /// The terminal with the given name, if any.
    pub fn terminal(&self, name: &str) -> Option<&Terminal> {
        self.terminals.get(name)
    }

    /// Returns `true` if a terminal with the given name exists.
    pub fn has_terminal(&self, name: &str) -> bool {
        self.terminals.contains_key(name)
    }

    /// The signal type of the given terminal.
    pub fn signal_type(&self, name: &str) -> SchResult<SigType> {
        self.terminals
            .get(name)
            .map(|term| term.stype)
            .ok_or_else(|| SchError::TerminalNotFound(name.into()))
    }

    /// Adds a terminal at the end of the terminal list.
    pub fn add_pin(
        &mut self,
        name: impl Into<ArcStr>,
        ttype: TermType,
        stype: SigType,
    ) -> SchResult<()> {
        let name = name.into();
        if self.terminals.contains_key(&name) {
            return Err(SchError::DuplicateTerminal(name));
        }
        self.terminals.insert(name, Terminal::new(ttype, stype));
        Ok(())
    }

    /// Removes a terminal, returning `true` if it existed.
    pub fn remove_pin(&mut self, name: &str) -> bool {
        self.terminals.shift_remove(name).is_some()
    }

    /// Renames a terminal in place.
    pub fn rename_pin(&mut self, old: &str, new: impl Into<ArcStr>) -> SchResult<()> {
        let new = new.into();
        let idx = self
            .terminals
            .get_index_of(old)
            .ok_or_else(|| SchError::TerminalNotFound(old.into()))?;
        if new.as_str() == old {
            return Ok(());
        }
        if self.terminals.contains_key(&new) {
            return Err(SchError::DuplicateTerminal(new));
        }
        if let Some((_, term)) = self.terminals.shift_remove_index(idx) {
            self.terminals.shift_insert(idx, new, term);
        }
        Ok(())
    }

    /// Iterates over `(name, instance)` pairs, in order.
    pub fn instances(&self) -> impl Iterator<Item = (&ArcStr, &Instance)> {
        self.instances.iter()
    }

    /// The number of instances.
    pub fn num_instances(&self) -> usize {
        self.instances.len()
    }

    /// The instance with the given name, if any.
    pub fn get_inst_ref(&self, name: &str) -> Option<&Instance> {
        self.instances.get(name)
    }

    /// A mutable reference to the instance with the given name, if any.
    pub fn get_inst_mut(&mut self, name: &str) -> Option<&mut Instance> {
        self.instances.get_mut(name)
    }

    /// Adds an instance at the end of the instance list.
    pub fn add_instance(&mut self, name: impl Into<ArcStr>, inst: Instance) -> SchResult<()> {
        let name = name.into();
        if self.instances.contains_key(&name) {
            return Err(SchError::DuplicateInstance(name));
        }
        self.instances.insert(name, inst);
        Ok(())
    }

    /// Removes and returns an instance.
    pub fn remove_instance(&mut self, name: &str) -> Option<Instance> {
        self.instances.shift_remove(name)
    }

    /// Renames an instance in place.
    pub fn rename_instance(&mut self, old: &str, new: impl Into<ArcStr>) -> SchResult<()> {
        let new = new.into();
        let idx = self
            .instances
            .get_index_of(old)
            .ok_or_else(|| SchError::InstanceNotFound(old.into()))?;
        if new.as_str() == old {
            return Ok(());
        }
        if self.instances.contains_key(&new) {
            return Err(SchError::DuplicateInstance(new));
        }
        if let Some((_, inst)) = self.instances.shift_remove_index(idx) {
            self.instances.shift_insert(idx, new, inst);
        }
        Ok(())
    }

    /// Replaces the instance `base` with one copy per entry of `name_conn_range`.
    ///
    /// Copy `i` is named by the entry's name, shifted by `(i * dx, i * dy)` from
    /// the base placement, and has the entry's `(terminal, net)` connections
    /// applied over the base connections. The copies take the position of the
    /// base in the instance list. An empty range removes the base.
    ///
    /// Fails without modifying the cellview if the base does not exist, or if a
    /// new name repeats or collides with an instance other than the base.
    pub fn array_instance<N, T, U>(
        &mut self,
        base: &str,
        dx: i64,
        dy: i64,
        name_conn_range: impl IntoIterator<Item = (N, Vec<(T, U)>)>,
    ) -> SchResult<()>
    where
        N: Into<ArcStr>,
        T: Into<ArcStr>,
        U: Into<ArcStr>,
    {
        let idx = self
            .instances
            .get_index_of(base)
            .ok_or_else(|| SchError::InstanceNotFound(base.into()))?;
        let entries: Vec<(ArcStr, Vec<(T, U)>)> = name_conn_range
            .into_iter()
            .map(|(name, conns)| (name.into(), conns))
            .collect();

        let mut seen = HashSet::with_capacity(entries.len());
        for (name, _) in &entries {
            let taken = name != base && self.instances.contains_key(name);
            if taken || !seen.insert(name.clone()) {
                return Err(SchError::DuplicateInstance(name.clone()));
            }
        }

        let Some((_, proto)) = self.instances.shift_remove_index(idx) else {
            return Err(SchError::InstanceNotFound(base.into()));
        };
        let count = entries.len();
        for (i, (name, conns)) in entries.into_iter().enumerate() {
            let mut inst = proto.clone();
            let step = i as i64;
            inst.xform.translate_mut(step * dx, step * dy);
            for (term, net) in conns {
                inst.update_connection(term, net);
            }
            self.instances.shift_insert(idx + i, name, inst);
        }
        tracing::debug!(base, count, dx, dy, cell = %self.cell_name, "arrayed instance");
        Ok(())
    }

    /// The value of a cell parameter, if set.
    pub fn get_param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Iterates over `(name, value)` cell parameter pairs.
    pub fn params(&self) -> impl Iterator<Item = (&ArcStr, &ParamValue)> {
        self.params.iter()
    }

    /// Sets a cell parameter.
    pub fn set_param(&mut self, name: impl Into<ArcStr>, value: impl Into<ParamValue>) {
        self.params.insert(name.into(), value.into());
    }

    /// Removes every cell parameter.
    pub fn clear_params(&mut self) {
        self.params.clear();
    }
}

impl FromStr for SchCellView {
    type Err = SchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_yaml::from_str(s)?)
    }
}
