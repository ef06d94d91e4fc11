//! Facade configuration.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file, the
//! `EASYVIZ_BACKEND`/`EASYVIZ_VERBOSE` environment variables, and a
//! `--easyviz NAME` command-line option.
//!
//! ```toml
//! [easyviz]
//! backend = "matplotlib"
//!
//! [modes]
//! verbose = 1
//! ```

use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    registry::BACKEND_NAMES,
};

/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND: &str = "gnuplot";
/// File name searched for in the working directory and the home directory.
pub const CONFIG_FILE_NAME: &str = ".easyviz.toml";
/// Environment variable naming the backend.
pub const ENV_BACKEND: &str = "EASYVIZ_BACKEND";
/// Environment variable holding the verbosity level.
pub const ENV_VERBOSE: &str = "EASYVIZ_VERBOSE";
/// Command-line option naming the backend.
pub const BACKEND_OPTION: &str = "--easyviz";

/// How much the facade reports while initialising.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    /// Nothing.
    #[default]
    Silent = 0,
    /// The selected backend.
    Backend = 1,
    /// Also each import performed.
    Imports = 2,
    /// Also import timings.
    Timing = 3,
}

impl Verbosity {
    /// Numeric level.
    pub fn level(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i64> for Verbosity {
    type Error = Error;

    fn try_from(level: i64) -> Result<Self> {
        match level {
            0 => Ok(Self::Silent),
            1 => Ok(Self::Backend),
            2 => Ok(Self::Imports),
            3 => Ok(Self::Timing),
            other => Err(Error::InvalidVerbosity(other.to_string())),
        }
    }
}

impl FromStr for Verbosity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let level: i64 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidVerbosity(s.to_string()))?;
        Self::try_from(level)
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// `[easyviz]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EasyvizSection {
    /// Backend identifier.
    backend: Option<String>,
}

/// `[modes]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModesSection {
    /// Verbosity level.
    verbose: Option<i64>,
}

/// On-disk layout of the configuration file.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    /// Backend selection.
    #[serde(default)]
    easyviz: EasyvizSection,
    /// Reporting.
    #[serde(default)]
    modes: ModesSection,
}

/// Settings read once when the facade is initialised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend identifier, resolved through the registry.
    pub backend: String,
    /// Diagnostic level.
    pub verbosity: Verbosity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            verbosity: Verbosity::Silent,
        }
    }
}

impl Config {
    /// Configuration selecting `backend`, silent.
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            verbosity: Verbosity::Silent,
        }
    }

    /// Set the verbosity.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Merge the settings in a TOML document. `path` is only used in errors.
    pub fn apply_toml(&mut self, text: &str, path: &Path) -> Result<()> {
        let file: FileConfig = toml::from_str(text).map_err(|source| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(backend) = file.easyviz.backend {
            self.backend = backend;
        }
        if let Some(level) = file.modes.verbose {
            self.verbosity = Verbosity::try_from(level)?;
        }
        Ok(())
    }

    /// Merge a configuration file.
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "reading configuration file");
        self.apply_toml(&text, path)
    }

    /// Merge environment settings obtained through `var`. Empty values are
    /// treated as unset.
    pub fn apply_env_with(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        let set = |name: &str| var(name).filter(|v| !v.trim().is_empty());
        if let Some(backend) = set(ENV_BACKEND) {
            self.backend = backend;
        }
        if let Some(level) = set(ENV_VERBOSE) {
            self.verbosity = level.parse()?;
        }
        Ok(())
    }

    /// Merge the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|name| env::var(name).ok())
    }

    /// Merge a `--easyviz NAME` (or `--easyviz=NAME`) option from `args`.
    /// The last occurrence wins.
    pub fn apply_args<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            if arg == BACKEND_OPTION {
                let name = args.next().ok_or_else(|| Error::MissingOptionValue {
                    option: BACKEND_OPTION,
                    known: BACKEND_NAMES.join(", "),
                })?;
                self.backend = name.as_ref().to_string();
            } else if let Some(name) = arg
                .strip_prefix(BACKEND_OPTION)
                .and_then(|rest| rest.strip_prefix('='))
            {
                self.backend = name.to_string();
            }
        }
        Ok(())
    }

    /// Build a configuration from every source: `file` (or the discovered
    /// one), the environment obtained through `var`, then `args`.
    pub fn load_with<I, S>(
        file: Option<&Path>,
        var: impl Fn(&str) -> Option<String>,
        args: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        match file {
            Some(path) => config.apply_file(path)?,
            None => {
                if let Some(path) = discover() {
                    config.apply_file(&path)?;
                }
            }
        }
        config.apply_env_with(var)?;
        config.apply_args(args)?;
        Ok(config)
    }

    /// Build a configuration from the discovered file, the process
    /// environment and the process arguments.
    pub fn from_environment() -> Result<Self> {
        Self::load_with(
            None,
            |name| env::var(name).ok(),
            env::args().skip(1),
        )
    }
}

/// Locate a configuration file: `./.easyviz.toml`, then `~/.easyviz.toml`.
pub fn discover() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::ErrorKind;

    /// Environment lookup backed by a map.
    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.backend, "gnuplot");
        assert_eq!(config.verbosity, Verbosity::Silent);
    }

    #[test]
    fn toml_sections() {
        let mut config = Config::default();
        config
            .apply_toml(
                "[easyviz]\nbackend = \"matplotlib\"\n[modes]\nverbose = 2\n",
                Path::new("x.toml"),
            )
            .unwrap();
        assert_eq!(config, Config::new("matplotlib").with_verbosity(Verbosity::Imports));
    }

    #[test]
    fn toml_errors_are_configuration_errors() {
        let mut config = Config::default();
        let err = config
            .apply_toml("[easyviz]\nbackend = 3\n", Path::new("bad.toml"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("bad.toml"));

        let err = config
            .apply_toml("[modes]\nverbose = 7\n", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidVerbosity(ref v) if v == "7"));
    }

    #[test]
    fn env_overrides_file() {
        let mut config = Config::default();
        config
            .apply_toml("[easyviz]\nbackend = \"matplotlib\"\n", Path::new("x.toml"))
            .unwrap();
        config
            .apply_env_with(env(&[(ENV_BACKEND, "template"), (ENV_VERBOSE, "3")]))
            .unwrap();
        assert_eq!(config, Config::new("template").with_verbosity(Verbosity::Timing));

        config.apply_env_with(env(&[(ENV_BACKEND, " ")])).unwrap();
        assert_eq!(config.backend, "template");
        assert!(config.apply_env_with(env(&[(ENV_VERBOSE, "loud")])).is_err());
    }

    #[test]
    fn argv_option() {
        let mut config = Config::default();
        config
            .apply_args(["script.py", "--easyviz", "matplotlib", "--easyviz=vtk"])
            .unwrap();
        assert_eq!(config.backend, "vtk");

        let err = config.apply_args(["--easyviz"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("gnuplot"));
    }

    #[test]
    fn verbosity_parsing() {
        assert_eq!("1".parse::<Verbosity>().unwrap(), Verbosity::Backend);
        assert!("-1".parse::<Verbosity>().is_err());
        assert!(Verbosity::Timing > Verbosity::Imports);
        assert_eq!(Verbosity::Imports.to_string(), "2");
    }
}
