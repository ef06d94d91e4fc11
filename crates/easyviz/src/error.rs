//! Error types for facade initialisation and namespace calls.

use std::{io, path::PathBuf, result};

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration does not name a usable backend or is malformed.
    Configuration,
    /// A recognised backend could not be loaded.
    BackendLoad,
    /// The process-wide facade was used outside its lifecycle.
    Lifecycle,
    /// A namespace call could not be dispatched or rejected its arguments.
    Call,
    /// Underlying I/O failure.
    Io,
}

/// Errors produced by easyviz.
#[derive(Error, Debug)]
pub enum Error {
    /// The configured backend identifier is not in the registry.
    #[error("unknown easyviz backend '{name}' (known backends: {known})")]
    UnknownBackend {
        /// Identifier as it appeared in the configuration.
        name: String,
        /// Comma separated list of registered keys.
        known: String,
    },

    /// The configured backend identifier is empty.
    #[error("no easyviz backend configured")]
    MissingBackend,

    /// Verbosity outside the supported range.
    #[error("invalid verbosity level '{0}': expected 0, 1, 2 or 3")]
    InvalidVerbosity(String),

    /// A command-line option that needs a value was given without one.
    #[error("{option} option must be followed by a backend name ({known})")]
    MissingOptionValue {
        /// The offending option.
        option: &'static str,
        /// Comma separated list of registered keys.
        known: String,
    },

    /// The configuration file could not be parsed.
    #[error("configuration file error in {}: {source}", path.display())]
    ConfigFile {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },

    /// The backend was recognised but its load step failed.
    #[error("failed to load easyviz backend '{backend}': {reason}")]
    BackendLoad {
        /// Canonical backend key.
        backend: String,
        /// Why loading failed.
        reason: String,
    },

    /// The process-wide facade is already initialised.
    #[error("easyviz is already initialised with backend '{backend}'")]
    AlreadyInitialized {
        /// Backend of the existing facade.
        backend: &'static str,
    },

    /// Initialisation was requested while another one is running.
    #[error("easyviz initialisation is already in progress")]
    InitializationInProgress,

    /// A previous initialisation of the process-wide facade failed.
    #[error("easyviz initialisation previously failed: {0}")]
    InitializationFailed(String),

    /// A backend with the same key is already registered.
    #[error("backend '{0}' is already registered")]
    DuplicateBackend(String),

    /// A backend was registered under a key that does not normalise to itself.
    #[error("backend key '{key}' is not in canonical form (expected '{canonical}')")]
    NonCanonicalBackend {
        /// Key as given.
        key: &'static str,
        /// What the key normalises to.
        canonical: String,
    },

    /// No symbol of this name exists in the namespace.
    #[error("'{0}' is not defined by the active backend or the utilities")]
    UnknownSymbol(String),

    /// A primitive or utility rejected its arguments.
    #[error("{symbol}: {reason}")]
    InvalidArguments {
        /// Name of the called symbol.
        symbol: String,
        /// Description of the problem.
        reason: String,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownBackend { .. }
            | Self::MissingBackend
            | Self::InvalidVerbosity(_)
            | Self::MissingOptionValue { .. }
            | Self::ConfigFile { .. } => ErrorKind::Configuration,
            Self::BackendLoad { .. } => ErrorKind::BackendLoad,
            Self::AlreadyInitialized { .. }
            | Self::InitializationInProgress
            | Self::InitializationFailed(_)
            | Self::DuplicateBackend(_)
            | Self::NonCanonicalBackend { .. } => ErrorKind::Lifecycle,
            Self::UnknownSymbol(_) | Self::InvalidArguments { .. } => ErrorKind::Call,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Shorthand for [`Error::InvalidArguments`].
    pub(crate) fn args(symbol: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}
