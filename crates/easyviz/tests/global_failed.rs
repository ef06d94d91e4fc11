//! A failed initialisation of the process-wide facade is final.

#![allow(missing_docs, clippy::tests_outside_test_module)]

use std::io;

use easyviz::{Config, Error, ErrorKind, Phase, Registry};

#[test]
fn failure_is_terminal() {
    let err = easyviz::initialize_with(&Config::new("pyx"), &Registry::builtin(), &mut io::sink())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    let Phase::Failed(reason) = easyviz::phase() else {
        panic!("expected the failed phase");
    };
    assert!(reason.contains("pyx"));
    assert!(easyviz::facade().is_none());

    let err = easyviz::initialize(&Config::new("gnuplot")).unwrap_err();
    assert!(matches!(err, Error::InitializationFailed(ref r) if r.contains("pyx")));
    assert_eq!(err.kind(), ErrorKind::Lifecycle);
}
