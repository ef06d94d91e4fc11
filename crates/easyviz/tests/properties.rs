//! Property-based tests for identifier resolution and reporting.

#![allow(missing_docs, clippy::tests_outside_test_module)]

use std::io;

use easyviz::{Config, Facade, Registry, Verbosity, registry};
use proptest::prelude::*;

fn available_key() -> impl Strategy<Value = &'static str> {
    let keys: Vec<&'static str> = registry::REGISTRY
        .iter()
        .filter(|e| e.available)
        .map(|e| e.key)
        .collect();
    prop::sample::select(keys)
}

/// Randomly upper-case the ASCII letters of `key`.
fn mixed_case(key: &str, mask: u64) -> String {
    key.chars()
        .enumerate()
        .map(|(i, c)| {
            if (mask >> (i % 64)) & 1 == 1 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Whitespace, case and a trailing underscore or `-like` never change
    /// which backend is selected.
    #[test]
    fn spelling_variants_resolve(
        key in available_key(),
        mask in any::<u64>(),
        pad in "[ \t]{0,3}",
        suffix in prop::sample::select(vec!["", "_", "-like", "-LIKE"]),
    ) {
        let name = format!("{pad}{}{suffix}{pad}", mixed_case(key, mask));
        prop_assert_eq!(registry::normalize(&name), key);
        let facade = Facade::initialize(&Config::new(name), &Registry::builtin(), &mut io::sink())
            .expect("variant resolves");
        prop_assert_eq!(facade.get_active_backend().name(), key);
    }

    /// Identifiers outside the registry are rejected before anything loads.
    #[test]
    fn unknown_identifiers_are_rejected(name in "[a-z]{1,12}") {
        prop_assume!(!registry::BACKEND_NAMES.contains(&registry::normalize(&name).as_str()));
        let err = registry::lookup(&name).unwrap_err();
        prop_assert_eq!(err.kind(), easyviz::ErrorKind::Configuration);
    }

    /// Each level prints at least as many lines as the one below it.
    #[test]
    fn report_grows_with_verbosity(key in available_key(), level in 0i64..3) {
        let count = |level: i64| {
            let mut out = Vec::new();
            let verbosity = Verbosity::try_from(level).expect("valid level");
            let config = Config::new(key).with_verbosity(verbosity);
            Facade::initialize(&config, &Registry::builtin(), &mut out).expect("initialise");
            out.iter().filter(|&&b| b == b'\n').count()
        };
        prop_assert!(count(level) < count(level + 1));
    }
}
