//! Initialisation diagnostics.

use std::{io::Write, time::Duration};

use crate::config::Verbosity;

/// What happened while a facade was initialised.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    /// Import steps, in order.
    imports: Vec<String>,
    /// Elapsed time per stage, in order.
    timings: Vec<(String, Duration)>,
}

impl Diagnostics {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Note an import step.
    pub fn import(&mut self, step: impl Into<String>) {
        self.imports.push(step.into());
    }

    /// Note how long a stage took.
    pub fn time(&mut self, stage: impl Into<String>, elapsed: Duration) {
        self.timings.push((stage.into(), elapsed));
    }

    /// Recorded import steps.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Recorded stage timings.
    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    /// The lines to print at `verbosity` for a facade using `backend`.
    ///
    /// Every line printed at one level is also printed at the next: imports
    /// from level 2, timings from level 3, and the backend line from level 1.
    pub fn lines(&self, verbosity: Verbosity, backend: &str) -> Vec<String> {
        let mut out = Vec::new();
        if verbosity >= Verbosity::Imports {
            out.extend(self.imports.iter().cloned());
        }
        if verbosity >= Verbosity::Timing {
            let stages: Vec<String> = self
                .timings
                .iter()
                .map(|(stage, t)| format!("{stage}={:.6}s", t.as_secs_f64()))
                .collect();
            out.push(format!("easyviz import times: {}", stages.join(" ")));
        }
        if verbosity >= Verbosity::Backend {
            out.push(format!("easyviz backend is {backend}"));
        }
        out
    }

    /// Write [`Diagnostics::lines`] to `sink`. Write failures are logged
    /// and otherwise ignored.
    pub fn emit(&self, verbosity: Verbosity, backend: &str, sink: &mut dyn Write) {
        for line in self.lines(verbosity, backend) {
            if let Err(e) = writeln!(sink, "{line}") {
                tracing::warn!(error = %e, "could not write easyviz diagnostics");
                return;
            }
        }
        if let Err(e) = sink.flush() {
            tracing::warn!(error = %e, "could not flush easyviz diagnostics");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    /// Sink that rejects every write.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("closed"))
        }
    }

    /// Diagnostics with two imports and two timings.
    fn sample() -> Diagnostics {
        let mut d = Diagnostics::new();
        d.import("import backend gnuplot");
        d.import("import utilities (peaks)");
        d.time("config", Duration::from_millis(1));
        d.time("gnuplot", Duration::from_micros(250));
        d
    }

    #[test]
    fn levels_are_cumulative() {
        let d = sample();
        assert!(d.lines(Verbosity::Silent, "gnuplot").is_empty());
        assert_eq!(
            d.lines(Verbosity::Backend, "gnuplot"),
            vec!["easyviz backend is gnuplot"]
        );
        assert_eq!(d.lines(Verbosity::Imports, "gnuplot").len(), 3);
        let all = d.lines(Verbosity::Timing, "gnuplot");
        assert_eq!(
            all[2],
            "easyviz import times: config=0.001000s gnuplot=0.000250s"
        );
        assert_eq!(all.last().unwrap(), "easyviz backend is gnuplot");
    }

    #[test]
    fn write_failure_is_ignored() {
        sample().emit(Verbosity::Timing, "gnuplot", &mut Broken);
    }

    #[test]
    fn emits_one_line_each() {
        let mut out = Vec::new();
        sample().emit(Verbosity::Imports, "gnuplot", &mut out);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
