//! The facade: resolves the configured backend and exposes its primitives
//! together with the utilities as one namespace.
//!
//! A [`Facade`] can be built directly for a custom [`Registry`] and output
//! sink. Most programs use the process-wide facade instead, created once
//! through [`initialize`] and read back through [`facade`] or
//! [`get_active_backend`].

use std::{
    collections::BTreeMap,
    io::{self, Write},
    mem,
    sync::OnceLock,
    time::Instant,
};

use parking_lot::Mutex;

use crate::{
    backend::Backend,
    config::Config,
    error::{Error, Result},
    registry::Registry,
    report::Diagnostics,
    utils::{self, UTILITIES, Utility},
    value::Value,
};

/// What a namespace name is bound to.
#[derive(Debug, Clone, Copy)]
pub enum Symbol {
    /// A primitive of the active backend.
    Primitive(&'static str),
    /// A backend-independent utility.
    Utility(&'static Utility),
}

impl Symbol {
    /// True for backend primitives.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// True for utilities.
    pub fn is_utility(&self) -> bool {
        matches!(self, Self::Utility(_))
    }
}

/// An initialised facade bound to one backend.
#[derive(Debug)]
pub struct Facade {
    /// The active backend, which is also its own state handle.
    backend: Box<dyn Backend>,
    /// Every callable name.
    namespace: BTreeMap<&'static str, Symbol>,
    /// Configuration the facade was built from.
    config: Config,
    /// Import steps and timings recorded while initialising.
    diagnostics: Diagnostics,
}

impl Facade {
    /// Resolve `config.backend` in `registry`, load it and build the
    /// namespace. Diagnostics for `config.verbosity` are written to `sink`
    /// once the facade is complete; nothing is written on failure.
    pub fn initialize(config: &Config, registry: &Registry, sink: &mut dyn Write) -> Result<Self> {
        let mut diagnostics = Diagnostics::new();

        let start = Instant::now();
        let entry = registry.lookup(&config.backend)?;
        diagnostics.time("config", start.elapsed());

        let start = Instant::now();
        diagnostics.import(format!("import backend {}", entry.key));
        let backend = entry.load()?;
        diagnostics.time(entry.key, start.elapsed());

        let start = Instant::now();
        let mut namespace: BTreeMap<&'static str, Symbol> = backend
            .primitives()
            .into_iter()
            .map(|name| (name, Symbol::Primitive(name)))
            .collect();
        for utility in UTILITIES {
            if let Some(Symbol::Primitive(_)) =
                namespace.insert(utility.name, Symbol::Utility(utility))
            {
                tracing::debug!(
                    name = utility.name,
                    backend = entry.key,
                    "utility shadows backend primitive"
                );
            }
        }
        let utility_names: Vec<&str> = utils::names().collect();
        diagnostics.import(format!("import utilities ({})", utility_names.join(", ")));
        diagnostics.time("utils", start.elapsed());

        tracing::debug!(
            backend = entry.key,
            symbols = namespace.len(),
            "easyviz facade ready"
        );
        diagnostics.emit(config.verbosity, entry.key, sink);

        Ok(Self {
            backend,
            namespace,
            config: config.clone(),
            diagnostics,
        })
    }

    /// The active backend.
    pub fn get_active_backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Configuration the facade was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// What happened during initialisation.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The binding for `name`, if any.
    pub fn resolve(&self, name: &str) -> Option<Symbol> {
        self.namespace.get(name).copied()
    }

    /// Every name in the namespace, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.namespace.keys().copied().collect()
    }

    /// Call `name` with `args`.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        match self.resolve(name) {
            Some(Symbol::Primitive(primitive)) => self.backend.execute(primitive, args),
            Some(Symbol::Utility(utility)) => utility.call(args),
            None => Err(Error::UnknownSymbol(name.to_string())),
        }
    }
}

/// Lifecycle of the process-wide facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// [`initialize`] has not been called.
    Uninitialized,
    /// An initialisation is running.
    Initializing,
    /// The facade is available.
    Ready,
    /// Initialisation failed; the reason is kept.
    Failed(String),
}

/// Guard for the process-wide lifecycle.
static PHASE: Mutex<Phase> = Mutex::new(Phase::Uninitialized);

/// The process-wide facade, set once.
static FACADE: OnceLock<Facade> = OnceLock::new();

/// Moves the lifecycle to [`Phase::Failed`] when dropped. It is forgotten
/// once initialisation returns, so only an unwind drops it.
struct UnwindGuard;

impl Drop for UnwindGuard {
    fn drop(&mut self) {
        tracing::error!("easyviz initialisation panicked");
        *PHASE.lock() = Phase::Failed("initialisation panicked".to_string());
    }
}

/// Initialise the process-wide facade with the built-in registry,
/// reporting to stdout.
pub fn initialize(config: &Config) -> Result<&'static Facade> {
    initialize_with(config, &Registry::builtin(), &mut io::stdout())
}

/// Initialise the process-wide facade.
///
/// Only the first call does any work. Later calls fail with
/// [`Error::AlreadyInitialized`] or [`Error::InitializationFailed`]
/// depending on how the first one ended, and calls made while it is still
/// running fail with [`Error::InitializationInProgress`].
pub fn initialize_with(
    config: &Config,
    registry: &Registry,
    sink: &mut dyn Write,
) -> Result<&'static Facade> {
    {
        let mut phase = PHASE.lock();
        match &*phase {
            Phase::Uninitialized => *phase = Phase::Initializing,
            Phase::Initializing => return Err(Error::InitializationInProgress),
            Phase::Ready => {
                return Err(Error::AlreadyInitialized {
                    backend: FACADE
                        .get()
                        .map_or("unknown", |f| f.get_active_backend().name()),
                });
            }
            Phase::Failed(reason) => return Err(Error::InitializationFailed(reason.clone())),
        }
    }

    // The lock is released while the backend loads so a re-entrant call
    // observes `Initializing` instead of deadlocking.
    let guard = UnwindGuard;
    let result = Facade::initialize(config, registry, sink);
    mem::forget(guard);

    let mut phase = PHASE.lock();
    match result {
        Ok(built) => {
            let facade = FACADE.get_or_init(|| built);
            *phase = Phase::Ready;
            Ok(facade)
        }
        Err(e) => {
            tracing::debug!(error = %e, "easyviz initialisation failed");
            *phase = Phase::Failed(e.to_string());
            Err(e)
        }
    }
}

/// The process-wide facade, once initialised.
pub fn facade() -> Option<&'static Facade> {
    FACADE.get()
}

/// The backend of the process-wide facade, once initialised.
pub fn get_active_backend() -> Option<&'static dyn Backend> {
    FACADE.get().map(Facade::get_active_backend)
}

/// Current lifecycle phase of the process-wide facade.
pub fn phase() -> Phase {
    PHASE.lock().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Verbosity, error::ErrorKind};

    /// Build a facade for `backend` with output discarded.
    fn build(backend: &str) -> Result<Facade> {
        Facade::initialize(&Config::new(backend), &Registry::builtin(), &mut io::sink())
    }

    #[test]
    fn namespace_merges_primitives_and_utilities() {
        let facade = build("gnuplot").unwrap();
        assert!(facade.resolve("plot").unwrap().is_primitive());
        assert!(facade.resolve("hot").unwrap().is_primitive());
        assert!(facade.resolve("peaks").unwrap().is_utility());
        assert!(facade.resolve("savefig").is_none());
        let names = facade.names();
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn call_dispatches() {
        let facade = build("template").unwrap();
        let z = facade.call("peaks", &[5.0.into()]).unwrap();
        facade.call("surf", &[z]).unwrap();
        assert!(
            facade
                .get_active_backend()
                .transcript()
                .iter()
                .any(|l| l.contains("surf(x, y, z; 5x5)"))
        );
        let err = facade.call("isosurface", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Call);
    }

    #[test]
    fn failed_lookup_writes_nothing() {
        let mut out = Vec::new();
        let config = Config::new("pyx").with_verbosity(Verbosity::Timing);
        assert!(Facade::initialize(&config, &Registry::builtin(), &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn diagnostics_are_recorded() {
        let facade = build("matplotlib").unwrap();
        assert_eq!(
            facade.diagnostics().imports()[0],
            "import backend matplotlib"
        );
        let stages: Vec<&str> = facade
            .diagnostics()
            .timings()
            .iter()
            .map(|(s, _)| s.as_str())
            .collect();
        assert_eq!(stages, ["config", "matplotlib", "utils"]);
    }
}
