#![allow(missing_docs, clippy::tests_outside_test_module)]

use std::{fs, path::Path, process::Command};

use assert_cmd::{
    assert::{Assert, OutputAssertExt},
    cargo::CommandCargoExt,
};
use tempfile::tempdir;

/// Run the binary inside `dir` with no configuration leaking in from the
/// environment or the real home directory.
#[allow(deprecated)]
fn run(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> Assert {
    let mut cmd = Command::cargo_bin("easyviz").expect("binary exists");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("EASYVIZ_BACKEND")
        .env_remove("EASYVIZ_VERBOSE")
        .args(args);
    for (k, v) in env {
        cmd.env(k, v);
    }
    cmd.assert()
}

fn stdout(assert: &Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8")
}

#[test]
fn lists_backends() {
    let td = tempdir().expect("tmp");
    let out = stdout(&run(td.path(), &["backends"], &[]).success());
    for key in ["gnuplot", "matplotlib", "template", "vtk"] {
        assert!(out.contains(&format!("- {key}: ")), "{key} missing in {out}");
    }
}

#[test]
fn default_backend_is_gnuplot() {
    let td = tempdir().expect("tmp");
    let out = stdout(&run(td.path(), &["info"], &[]).success());
    assert!(out.contains("backend: gnuplot (Gnuplot)"));
    assert!(out.contains("utilities: "));
    assert!(!out.contains("easyviz backend is"));
}

#[test]
fn verbose_flag_reports_backend() {
    let td = tempdir().expect("tmp");
    let out = stdout(&run(td.path(), &["-vv", "--easyviz", "matplotlib", "info"], &[]).success());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "import backend matplotlib");
    assert!(lines[1].starts_with("import utilities ("));
    assert_eq!(lines[2], "easyviz backend is matplotlib");
}

#[test]
fn config_file_then_environment() {
    let td = tempdir().expect("tmp");
    fs::write(
        td.path().join(".easyviz.toml"),
        "[easyviz]\nbackend = \"matplotlib\"\n",
    )
    .expect("write config");

    let out = stdout(&run(td.path(), &["info"], &[]).success());
    assert!(out.contains("backend: matplotlib"));

    let out = stdout(&run(td.path(), &["info"], &[("EASYVIZ_BACKEND", "template")]).success());
    assert!(out.contains("backend: template"));

    let out = stdout(
        &run(
            td.path(),
            &["--easyviz", "gnuplot_", "info"],
            &[("EASYVIZ_BACKEND", "template")],
        )
        .success(),
    );
    assert!(out.contains("backend: gnuplot"));
}

#[test]
fn explicit_config_path() {
    let td = tempdir().expect("tmp");
    let path = td.path().join("custom.toml");
    fs::write(&path, "[easyviz]\nbackend = \"template\"\n[modes]\nverbose = 1\n")
        .expect("write config");
    let out = stdout(
        &run(
            td.path(),
            &["--config", path.to_str().expect("utf8 path"), "info"],
            &[],
        )
        .success(),
    );
    assert!(out.starts_with("easyviz backend is template\n"));
}

#[test]
fn demo_writes_transcript() {
    let td = tempdir().expect("tmp");
    let file = td.path().join("line.txt");
    run(
        td.path(),
        &[
            "--easyviz",
            "template",
            "demo",
            "line",
            "-o",
            file.to_str().expect("utf8 path"),
        ],
        &[],
    )
    .success();
    let transcript = fs::read_to_string(&file).expect("transcript written");
    assert!(transcript.contains("plot(x, y; n=50, spec='b-')"));
    assert!(transcript.contains("legend('sin(t)', 'cos(t)')"));
}

#[test]
fn demo_to_stdout_in_gnuplot() {
    let td = tempdir().expect("tmp");
    let out = stdout(&run(td.path(), &["demo", "quiver"], &[]).success());
    assert!(out.starts_with("# generated by easyviz (gnuplot backend)\n"));
    assert!(out.contains("plot '-' with vectors notitle"));
    assert!(out.contains("set size ratio -1"));
}

#[test]
fn unknown_backend_is_rejected() {
    let td = tempdir().expect("tmp");
    run(td.path(), &["--easyviz", "pyx", "info"], &[]).failure();

    let assert = run(td.path(), &["info"], &[("EASYVIZ_BACKEND", "pyx")]).failure();
    let err = String::from_utf8(assert.get_output().stderr.clone()).expect("utf8");
    assert!(err.contains("unknown easyviz backend 'pyx'"));
}

#[test]
fn invalid_verbosity_is_rejected() {
    let td = tempdir().expect("tmp");
    run(td.path(), &["info"], &[("EASYVIZ_VERBOSE", "5")]).failure();
}

#[cfg(not(feature = "vtk"))]
#[test]
fn vtk_needs_the_feature() {
    let td = tempdir().expect("tmp");
    let assert = run(td.path(), &["--easyviz", "vtk", "info"], &[]).failure();
    let err = String::from_utf8(assert.get_output().stderr.clone()).expect("utf8");
    assert!(err.contains("`vtk` feature"));
}
