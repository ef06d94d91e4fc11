//! Backend-agnostic plotting facade.
//!
//! A script plots through one namespace; which plotting program ends up
//! doing the work is decided by configuration. At initialisation the
//! configured backend identifier is resolved through a [`Registry`], the
//! backend is loaded, and its primitives are merged with the utilities into
//! a single [`Facade`].
//!
//! # Supported Backends
//!
//! - Gnuplot
//! - Matplotlib
//! - Template (call trace)
//! - VTK (with the `vtk` feature)
//!
//! ```
//! use easyviz::{Config, Facade, Registry};
//!
//! let facade = Facade::initialize(
//!     &Config::new("template"),
//!     &Registry::builtin(),
//!     &mut std::io::sink(),
//! )
//! .unwrap();
//! let z = facade.call("peaks", &[]).unwrap();
//! facade.call("surf", &[z]).unwrap();
//! assert_eq!(facade.get_active_backend().name(), "template");
//! ```

/// The backend capability trait and the scripted backend shell.
pub mod backend;
/// Built-in backends.
pub mod backends;
/// Parsing of the common primitives.
pub mod command;
/// Configuration sources.
pub mod config;
/// Error types used across the crate.
pub mod error;
/// The facade and the process-wide lifecycle.
mod facade;
/// Line style specifications.
pub mod linespec;
/// Central registry of backend metadata and constructors.
pub mod registry;
/// Initialisation diagnostics.
pub mod report;
/// Backend-independent utilities.
pub mod utils;
/// Dynamic values passed through the namespace.
pub mod value;

pub use crate::{
    backend::Backend,
    config::{Config, Verbosity},
    error::{Error, ErrorKind, Result},
    facade::{
        Facade, Phase, Symbol, facade, get_active_backend, initialize, initialize_with, phase,
    },
    registry::{BackendEntry, Registry},
    value::Value,
};
