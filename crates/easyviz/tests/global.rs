//! Lifecycle of the process-wide facade.
//!
//! Each integration test file runs in its own process, so this file holds a
//! single test that walks through the whole lifecycle in order.

#![allow(missing_docs, clippy::tests_outside_test_module)]

use std::io::{self, Write};

use easyviz::{Config, Error, Phase, Registry, Verbosity};

/// Sink that tries to initialise again while the first initialisation is
/// still writing its report.
#[derive(Default)]
struct Reentrant {
    lines: Vec<u8>,
    nested: Option<Error>,
}

impl Write for Reentrant {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.nested.is_none() {
            assert_eq!(easyviz::phase(), Phase::Initializing);
            self.nested = easyviz::initialize(&Config::new("matplotlib")).err();
        }
        self.lines.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn initialises_once() {
    assert_eq!(easyviz::phase(), Phase::Uninitialized);
    assert!(easyviz::facade().is_none());
    assert!(easyviz::get_active_backend().is_none());

    let mut sink = Reentrant::default();
    let config = Config::new("Template_").with_verbosity(Verbosity::Backend);
    let facade = easyviz::initialize_with(&config, &Registry::builtin(), &mut sink)
        .expect("first initialisation");
    assert!(matches!(sink.nested, Some(Error::InitializationInProgress)));
    assert_eq!(
        String::from_utf8(sink.lines).expect("utf8"),
        "easyviz backend is template\n"
    );

    assert_eq!(easyviz::phase(), Phase::Ready);
    assert_eq!(facade.get_active_backend().name(), "template");
    let active = easyviz::get_active_backend().expect("backend available");
    assert_eq!(active.name(), "template");

    let err = easyviz::initialize(&Config::new("gnuplot")).unwrap_err();
    assert!(matches!(err, Error::AlreadyInitialized { backend: "template" }));
    assert_eq!(easyviz::phase(), Phase::Ready);

    easyviz::facade()
        .expect("facade available")
        .call("xlabel", &["t".into()])
        .expect("xlabel");
    assert_eq!(active.transcript(), vec!["[fig 0] xlabel('t')"]);
}
