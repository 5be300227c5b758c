//! Cellview terminals.

use serde::{Deserialize, Serialize};

/// The direction of a terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermType {
    /// An input.
    #[default]
    Input = 0,
    /// An output.
    Output = 1,
    /// A bidirectional terminal.
    Inout = 2,
}

impl TermType {
    /// The integer code of this terminal type.
    #[inline]
    pub const fn code(&self) -> u8 {
        *self as u8
    }
}

/// The kind of signal carried by a terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SigType {
    /// An ordinary signal.
    #[default]
    Signal,
    /// A power supply.
    Power,
    /// A ground supply.
    Ground,
    /// A clock.
    Clock,
    /// A tie-off.
    TieOff,
    /// A tie to the high supply.
    TieHi,
    /// A tie to the low supply.
    TieLo,
    /// An analog signal.
    Analog,
    /// A scan chain signal.
    Scan,
    /// A reset.
    Reset,
}

/// A terminal of a schematic cellview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Terminal {
    /// The terminal direction.
    pub ttype: TermType,
    /// The signal type.
    pub stype: SigType,
}

impl Terminal {
    /// Creates a new terminal.
    pub const fn new(ttype: TermType, stype: SigType) -> Self {
        Self { ttype, stype }
    }
}
