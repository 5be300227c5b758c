//! Schematic cellviews.
//!
//! A [`SchCellView`] holds the terminals, instances, and parameters of one
//! schematic cell and round-trips through YAML. The [`names`] module expands
//! bus and array names such as `foo<2:0>` into their individual bits.
//!
//! # Examples
//!
//! ```
//! use schematic::{SchCellView, TermType};
//!
//! let cv: SchCellView = r#"
//! lib_name: demo
//! cell_name: buf
//! view_name: schematic
//! terminals:
//!   in:
//!     ttype: input
//!     stype: signal
//!   out:
//!     ttype: output
//!     stype: signal
//! instances: {}
//! "#.parse().unwrap();
//!
//! let terms: Vec<_> = cv.terminals().collect();
//! assert_eq!(terms.len(), 2);
//! assert_eq!(terms[1].1, TermType::Output);
//! ```
#![warn(missing_docs)]

use std::path::PathBuf;

use arcstr::ArcStr;

pub mod cellview;
pub mod instance;
pub mod names;
pub mod terminal;

pub use cellview::SchCellView;
pub use instance::{Instance, ParamValue};
pub use terminal::{SigType, TermType, Terminal};

/// The [`SchError`] result type.
pub type SchResult<T> = Result<T, SchError>;

/// A schematic error.
#[derive(thiserror::Error, Debug)]
pub enum SchError {
    /// No instance with the given name exists.
    #[error("no instance named `{0}`")]
    InstanceNotFound(ArcStr),
    /// An instance with the given name already exists.
    #[error("an instance named `{0}` already exists")]
    DuplicateInstance(ArcStr),
    /// No terminal with the given name exists.
    #[error("no terminal named `{0}`")]
    TerminalNotFound(ArcStr),
    /// A terminal with the given name already exists.
    #[error("a terminal named `{0}` already exists")]
    DuplicateTerminal(ArcStr),
    /// Error reading a cellview file.
    #[error("failed to read file `{path}`")]
    FailedToRead {
        /// The path being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        err: std::io::Error,
    },
    /// Error writing a cellview file.
    #[error("failed to write file `{path}`")]
    FailedToWrite {
        /// The path being written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        err: std::io::Error,
    },
    /// Malformed YAML, or YAML that does not describe a cellview.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
