//! The capability set every backend exposes, and the scripted backend shell
//! shared by the built-in dialects.

use std::fmt;

use parking_lot::Mutex;

use crate::{
    command::{Command, PRIMITIVES},
    error::{Error, Result},
    value::Value,
};

/// A loaded plotting backend.
///
/// The backend object doubles as its own state handle: callers that need
/// more than the facade re-exports can inspect the transcript it has
/// produced so far.
pub trait Backend: Send + Sync + fmt::Debug {
    /// Canonical registry key, e.g. `"gnuplot"`.
    fn name(&self) -> &'static str;

    /// Human-readable name.
    fn display(&self) -> &'static str;

    /// Names of every primitive this backend provides.
    fn primitives(&self) -> Vec<&'static str>;

    /// Execute a primitive.
    fn execute(&self, primitive: &str, args: &[Value]) -> Result<Value>;

    /// Everything emitted so far, in the backend's own command language.
    fn transcript(&self) -> Vec<String>;

    /// Snapshot of the figure state.
    fn session(&self) -> Session;

    /// Drop all figures and the transcript.
    fn reset(&self);
}

/// Figure bookkeeping shared by scripted backends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Current figure number; 0 before the first figure is opened.
    pub figure: u32,
    /// Highest figure number opened so far.
    pub last_figure: u32,
    /// Whether new items are added to the current axes.
    pub hold: bool,
    /// Items drawn into the current axes since they were last cleared.
    pub items: usize,
    /// Emitted command lines.
    pub lines: Vec<String>,
}

impl Session {
    /// True if the next plot item starts a fresh set of axes.
    pub fn replaces(&self) -> bool {
        !self.hold || self.items == 0
    }

    /// Make `n` (or the next free number) the current figure.
    fn select_figure(&mut self, n: Option<u32>) -> Result<u32> {
        let n = match n {
            Some(n) => n,
            None => self
                .last_figure
                .checked_add(1)
                .ok_or_else(|| Error::args("figure", "no figure numbers left"))?,
        };
        if n != self.figure {
            self.items = 0;
        }
        self.figure = n;
        self.last_figure = self.last_figure.max(n);
        Ok(n)
    }
}

/// Translation of commands into one plotting program's language.
pub trait Dialect: Send + Sync + fmt::Debug + Default + 'static {
    /// Registry key.
    const NAME: &'static str;
    /// Human-readable name.
    const DISPLAY: &'static str;

    /// Lines that start every transcript.
    fn preamble(&self) -> Vec<String> {
        Vec::new()
    }

    /// Emit the lines for a validated common command. `session` reflects
    /// figure and hold changes made by this command, but not the item it
    /// adds.
    fn translate(&self, command: &Command, session: &Session) -> Result<Vec<String>>;

    /// Dialect-specific primitives beyond the common set.
    fn extras(&self) -> &'static [&'static str] {
        &[]
    }

    /// Emit the lines for one of [`Dialect::extras`].
    fn extra(&self, name: &str, _args: &[Value], _session: &Session) -> Result<Vec<String>> {
        Err(Error::UnknownSymbol(name.to_string()))
    }
}

/// A backend that records a script in its dialect.
#[derive(Debug, Default)]
pub struct ScriptBackend<D: Dialect> {
    /// Translation rules.
    dialect: D,
    /// Figure state and transcript.
    session: Mutex<Session>,
}

impl<D: Dialect> ScriptBackend<D> {
    /// Create a backend with an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxed constructor for the registry.
    pub fn boxed() -> Result<Box<dyn Backend>> {
        Ok(Box::new(Self::new()))
    }

    /// The dialect in use.
    pub fn dialect(&self) -> &D {
        &self.dialect
    }
}

impl<D: Dialect> Backend for ScriptBackend<D> {
    fn name(&self) -> &'static str {
        D::NAME
    }

    fn display(&self) -> &'static str {
        D::DISPLAY
    }

    fn primitives(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = PRIMITIVES.to_vec();
        names.extend_from_slice(self.dialect.extras());
        names
    }

    fn execute(&self, primitive: &str, args: &[Value]) -> Result<Value> {
        let mut session = self.session.lock();

        if self.dialect.extras().contains(&primitive) {
            let lines = self.dialect.extra(primitive, args, &session)?;
            session.lines.extend(lines);
            return Ok(Value::Unit);
        }

        let command = Command::parse(primitive, args)?;
        let mut result = Value::Unit;
        match &command {
            Command::Figure(n) => {
                result = Value::from(session.select_figure(*n)?);
            }
            Command::Hold(flag) => {
                session.hold = flag.unwrap_or(!session.hold);
            }
            _ if command.is_plot_item() && session.figure == 0 => {
                // Drawing without a figure opens the first one implicitly.
                session.select_figure(Some(1))?;
                let open = self.dialect.translate(&Command::Figure(Some(1)), &session)?;
                session.lines.extend(open);
            }
            _ => {}
        }

        let lines = self.dialect.translate(&command, &session)?;
        session.lines.extend(lines);

        if command.is_plot_item() {
            session.items = if session.hold { session.items + 1 } else { 1 };
        } else if command == Command::Clf {
            session.items = 0;
        }
        tracing::trace!(backend = D::NAME, %command, "executed");
        Ok(result)
    }

    fn transcript(&self) -> Vec<String> {
        let mut out = self.dialect.preamble();
        out.extend(self.session.lock().lines.iter().cloned());
        out
    }

    fn session(&self) -> Session {
        self.session.lock().clone()
    }

    fn reset(&self) {
        *self.session.lock() = Session::default();
    }
}

/// Format floats as a comma separated list.
pub(crate) fn join_numbers<'a>(values: impl IntoIterator<Item = &'a f64>) -> String {
    values
        .into_iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Quote a string for a double-quoted script literal.
pub(crate) fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
