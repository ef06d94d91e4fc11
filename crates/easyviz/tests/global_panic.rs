//! A panic while building the process-wide facade leaves it failed rather
//! than stuck initialising.

#![allow(missing_docs, clippy::tests_outside_test_module)]

use std::{
    io,
    panic::{self, AssertUnwindSafe},
};

use easyviz::{Backend, BackendEntry, Config, Error, ErrorKind, Phase, Registry};

fn construct_panicking() -> easyviz::Result<Box<dyn Backend>> {
    panic!("constructor exploded");
}

#[test]
fn panic_during_initialisation_is_terminal() {
    let mut registry = Registry::builtin();
    registry
        .register(BackendEntry {
            key: "exploding",
            display: "Exploding",
            description: "panics while loading",
            requires: None,
            available: true,
            constructor: construct_panicking,
        })
        .expect("new key");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        easyviz::initialize_with(&Config::new("exploding"), &registry, &mut io::sink())
    }));
    assert!(outcome.is_err());
    assert_eq!(
        easyviz::phase(),
        Phase::Failed("initialisation panicked".to_string())
    );
    assert!(easyviz::facade().is_none());

    let err = easyviz::initialize_with(&Config::new("template"), &registry, &mut io::sink())
        .unwrap_err();
    assert!(matches!(err, Error::InitializationFailed(ref r) if r.contains("panicked")));
    assert_eq!(err.kind(), ErrorKind::Lifecycle);
}
