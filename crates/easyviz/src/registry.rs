//! Central registry of backend metadata and constructors.
//!
//! The registry maps backend identifiers to constructors so the facade never
//! has to build module paths from configuration strings. Custom backends can
//! be added to a [`Registry`] value before the facade is initialised.

use std::fmt;

use crate::{
    backend::Backend,
    backends::{GnuplotBackend, MatplotlibBackend, TemplateBackend},
    error::{Error, Result},
};
#[cfg(feature = "vtk")]
use crate::backends::VtkBackend;

/// Suffix accepted after any backend key (`"gnuplot-like"`).
const ALIAS_SUFFIX: &str = "-like";

/// Metadata and constructor for a single backend.
#[derive(Clone, Copy)]
pub struct BackendEntry {
    /// Canonical key (lowercase), e.g. `"gnuplot"`.
    pub key: &'static str,
    /// Human-friendly display name.
    pub display: &'static str,
    /// What the backend produces.
    pub description: &'static str,
    /// Cargo feature the backend needs, if any.
    pub requires: Option<&'static str>,
    /// Whether the backend is compiled into this build.
    pub available: bool,
    /// Load the backend.
    pub constructor: fn() -> Result<Box<dyn Backend>>,
}

impl BackendEntry {
    /// Run the constructor.
    pub fn load(&self) -> Result<Box<dyn Backend>> {
        tracing::debug!(backend = self.key, "constructing backend");
        (self.constructor)()
    }
}

impl fmt::Debug for BackendEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendEntry")
            .field("key", &self.key)
            .field("requires", &self.requires)
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}

/// Load the VTK backend.
#[cfg(feature = "vtk")]
fn load_vtk() -> Result<Box<dyn Backend>> {
    VtkBackend::boxed()
}

/// The VTK backend is recognised but not compiled in.
#[cfg(not(feature = "vtk"))]
fn load_vtk() -> Result<Box<dyn Backend>> {
    Err(Error::BackendLoad {
        backend: "vtk".to_string(),
        reason: "easyviz was built without the `vtk` feature".to_string(),
    })
}

/// Built-in backends.
pub static REGISTRY: &[BackendEntry] = &[
    BackendEntry {
        key: "gnuplot",
        display: "Gnuplot",
        description: "gnuplot script with inline data",
        requires: None,
        available: true,
        constructor: GnuplotBackend::boxed,
    },
    BackendEntry {
        key: "matplotlib",
        display: "Matplotlib",
        description: "pyplot script",
        requires: None,
        available: true,
        constructor: MatplotlibBackend::boxed,
    },
    BackendEntry {
        key: "template",
        display: "Template",
        description: "trace of every call, for writing new backends",
        requires: None,
        available: true,
        constructor: TemplateBackend::boxed,
    },
    BackendEntry {
        key: "vtk",
        display: "VTK",
        description: "VTK pipeline description",
        requires: Some("vtk"),
        available: cfg!(feature = "vtk"),
        constructor: load_vtk,
    },
];

/// Keys of the built-in backends, in registry order.
pub const BACKEND_NAMES: &[&str] = &["gnuplot", "matplotlib", "template", "vtk"];

/// Canonical form of a backend identifier.
///
/// Surrounding whitespace is dropped, ASCII letters are lowercased, and a
/// single trailing `_` or `-like` suffix is removed, so `" Gnuplot_ "` and
/// `"gnuplot-like"` both become `"gnuplot"`.
pub fn normalize(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    let base = lower.strip_suffix('_').unwrap_or(&lower);
    base.strip_suffix(ALIAS_SUFFIX).unwrap_or(base).to_string()
}

/// Find `name` among `entries`.
fn find<'a>(entries: &'a [BackendEntry], name: &str) -> Result<&'a BackendEntry> {
    let key = normalize(name);
    if key.is_empty() {
        return Err(Error::MissingBackend);
    }
    entries.iter().find(|e| e.key == key).ok_or_else(|| {
        let known: Vec<&str> = entries.iter().map(|e| e.key).collect();
        Error::UnknownBackend {
            name: name.trim().to_string(),
            known: known.join(", "),
        }
    })
}

/// Look up a built-in backend by identifier.
pub fn lookup(name: &str) -> Result<&'static BackendEntry> {
    find(REGISTRY, name)
}

/// Construct a built-in backend by identifier.
pub fn construct(name: &str) -> Result<Box<dyn Backend>> {
    lookup(name)?.load()
}

/// A set of backends the facade can resolve identifiers against.
#[derive(Debug, Clone)]
pub struct Registry {
    /// Registered backends in insertion order.
    entries: Vec<BackendEntry>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// A registry holding the built-in backends.
    pub fn builtin() -> Self {
        Self {
            entries: REGISTRY.to_vec(),
        }
    }

    /// A registry with no backends.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a backend. Keys are compared after normalisation.
    pub fn register(&mut self, entry: BackendEntry) -> Result<()> {
        let key = normalize(entry.key);
        if self.entries.iter().any(|e| e.key == key) {
            return Err(Error::DuplicateBackend(key));
        }
        if key != entry.key {
            return Err(Error::NonCanonicalBackend {
                key: entry.key,
                canonical: key,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Look up a backend by identifier.
    pub fn lookup(&self, name: &str) -> Result<&BackendEntry> {
        find(&self.entries, name)
    }

    /// Construct a backend by identifier.
    pub fn construct(&self, name: &str) -> Result<Box<dyn Backend>> {
        self.lookup(name)?.load()
    }

    /// All registered backends.
    pub fn entries(&self) -> &[BackendEntry] {
        &self.entries
    }

    /// Registered keys.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.key).collect()
    }
}
