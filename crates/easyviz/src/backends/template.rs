//! Reference backend that records each call in canonical form.
//!
//! Useful as a starting point for new dialects and for inspecting what a
//! script asks the facade to do without any plotting program installed.

use crate::{
    backend::{Dialect, ScriptBackend, Session},
    command::Command,
    error::Result,
};

/// The template backend.
pub type TemplateBackend = ScriptBackend<Template>;

/// Template dialect.
#[derive(Debug, Default)]
pub struct Template;

impl Dialect for Template {
    const NAME: &'static str = "template";
    const DISPLAY: &'static str = "Template (call trace)";

    fn translate(&self, command: &Command, session: &Session) -> Result<Vec<String>> {
        Ok(vec![format!("[fig {}] {command}", session.figure)])
    }
}
