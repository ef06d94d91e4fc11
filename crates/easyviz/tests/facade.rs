//! Facade initialisation against the built-in and custom registries.

#![allow(missing_docs, clippy::tests_outside_test_module)]

use std::{
    io,
    sync::atomic::{AtomicUsize, Ordering},
};

use easyviz::{
    Backend, BackendEntry, Config, ErrorKind, Facade, Registry, Symbol, Value, Verbosity,
    backend::Session, registry,
};

fn init(config: &Config) -> easyviz::Result<Facade> {
    Facade::initialize(config, &Registry::builtin(), &mut io::sink())
}

fn init_capture(backend: &str, verbosity: Verbosity) -> (Facade, Vec<String>) {
    let mut out = Vec::new();
    let facade = Facade::initialize(
        &Config::new(backend).with_verbosity(verbosity),
        &Registry::builtin(),
        &mut out,
    )
    .expect("initialise");
    let text = String::from_utf8(out).expect("utf8");
    (facade, text.lines().map(str::to_string).collect())
}

#[test]
fn every_available_backend_initialises() {
    for entry in registry::REGISTRY.iter().filter(|e| e.available) {
        let facade = init(&Config::new(entry.key)).expect("backend loads");
        assert_eq!(facade.get_active_backend().name(), entry.key);
        for primitive in ["plot", "surf", "figure", "hardcopy"] {
            assert!(matches!(
                facade.resolve(primitive),
                Some(Symbol::Primitive(_))
            ));
        }
    }
}

#[test]
fn unknown_backend_is_a_configuration_error() {
    let err = init(&Config::new("pyx")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("gnuplot"));

    let err = init(&Config::new("")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[cfg(not(feature = "vtk"))]
#[test]
fn missing_feature_is_a_load_error() {
    let mut out = Vec::new();
    let err = Facade::initialize(
        &Config::new("vtk").with_verbosity(Verbosity::Timing),
        &Registry::builtin(),
        &mut out,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendLoad);
    assert!(out.is_empty());
}

#[cfg(feature = "vtk")]
#[test]
fn vtk_backend_initialises() {
    let facade = init(&Config::new("vtk_")).expect("vtk loads");
    assert_eq!(facade.get_active_backend().name(), "vtk");
    assert!(facade.resolve("render_window").is_some());
}

static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

/// Backend exposing a primitive that collides with a utility.
#[derive(Debug, Default)]
struct Shadowed;

impl Backend for Shadowed {
    fn name(&self) -> &'static str {
        "shadowed"
    }

    fn display(&self) -> &'static str {
        "Shadowed"
    }

    fn primitives(&self) -> Vec<&'static str> {
        vec!["plot", "peaks"]
    }

    fn execute(&self, primitive: &str, _args: &[Value]) -> easyviz::Result<Value> {
        Ok(Value::Text(format!("backend {primitive}")))
    }

    fn transcript(&self) -> Vec<String> {
        Vec::new()
    }

    fn session(&self) -> Session {
        Session::default()
    }

    fn reset(&self) {}
}

fn construct_shadowed() -> easyviz::Result<Box<dyn Backend>> {
    CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
    Ok(Box::new(Shadowed))
}

fn shadowed_registry() -> Registry {
    let mut registry = Registry::builtin();
    registry
        .register(BackendEntry {
            key: "shadowed",
            display: "Shadowed",
            description: "collides with the peaks utility",
            requires: None,
            available: true,
            constructor: construct_shadowed,
        })
        .expect("new key");
    registry
}

#[test]
fn utilities_win_name_collisions() {
    let registry = shadowed_registry();

    let before = CONSTRUCTED.load(Ordering::SeqCst);
    let err = Facade::initialize(&Config::new("shadow"), &registry, &mut io::sink()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), before);

    let facade = Facade::initialize(&Config::new("shadowed"), &registry, &mut io::sink())
        .expect("custom backend loads");
    assert!(CONSTRUCTED.load(Ordering::SeqCst) > before);
    assert!(matches!(facade.resolve("peaks"), Some(Symbol::Utility(_))));
    assert!(matches!(facade.resolve("plot"), Some(Symbol::Primitive(_))));

    let z = facade.call("peaks", &[3.0.into()]).expect("utility runs");
    assert_eq!(z.as_array().map(|a| a.shape().to_vec()), Some(vec![3, 3]));
    assert_eq!(
        facade.call("plot", &[]).expect("primitive runs"),
        Value::Text("backend plot".into())
    );
}

#[test]
fn verbosity_is_monotonic() {
    let mut previous: Vec<String> = Vec::new();
    for verbosity in [
        Verbosity::Silent,
        Verbosity::Backend,
        Verbosity::Imports,
        Verbosity::Timing,
    ] {
        let (_, lines) = init_capture("matplotlib", verbosity);
        assert!(lines.len() > previous.len() || verbosity == Verbosity::Silent);
        for line in &previous {
            if line.starts_with("easyviz import times:") {
                continue;
            }
            assert!(lines.contains(line), "{line:?} missing at {verbosity}");
        }
        previous = lines;
    }
    let (_, silent) = init_capture("matplotlib", Verbosity::Silent);
    assert!(silent.is_empty());
}

#[test]
fn report_lines_per_level() {
    let (_, lines) = init_capture("gnuplot", Verbosity::Backend);
    assert_eq!(lines, vec!["easyviz backend is gnuplot"]);

    let (_, lines) = init_capture("gnuplot", Verbosity::Timing);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "import backend gnuplot");
    assert!(lines[1].starts_with("import utilities (peaks, "));
    assert!(lines[2].starts_with("easyviz import times: config="));
    assert!(lines[2].contains(" gnuplot="));
    assert!(lines[2].contains(" utils="));
}

#[test]
fn alias_with_imports_reported() {
    let (gnuplot, lines) = init_capture("gnuplot-like", Verbosity::Imports);
    assert!(lines.len() >= 2);
    assert_eq!(lines.last().map(String::as_str), Some("easyviz backend is gnuplot"));

    let matplotlib = init(&Config::new("matplotlib")).expect("matplotlib loads");
    assert_ne!(
        gnuplot.get_active_backend().name(),
        matplotlib.get_active_backend().name()
    );

    gnuplot.call("plot", &[vec![1.0, 2.0].into()]).expect("plot");
    assert_ne!(
        gnuplot.get_active_backend().transcript(),
        matplotlib.get_active_backend().transcript()
    );
}

#[test]
fn facades_keep_separate_state() {
    let a = init(&Config::new("template")).expect("template");
    let b = init(&Config::new("template")).expect("template");
    a.call("title", &["a".into()]).expect("title");
    assert_eq!(a.get_active_backend().transcript().len(), 1);
    assert!(b.get_active_backend().transcript().is_empty());
    a.get_active_backend().reset();
    assert!(a.get_active_backend().transcript().is_empty());
}
