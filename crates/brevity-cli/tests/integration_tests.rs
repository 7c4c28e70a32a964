//! Integration tests for the brevity binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Library, spec, destination and an empty config file under one temp dir.
struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new(generator: &str, templates: &[(&str, &str)], spec: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let lib = temp.path().join("lib/cli");
        fs::create_dir_all(lib.join("templates")).unwrap();
        fs::write(lib.join("generator.brief"), generator).unwrap();
        for (name, content) in templates {
            let path = lib.join("templates").join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        fs::write(temp.path().join("app.brief"), spec).unwrap();
        fs::create_dir_all(temp.path().join("out")).unwrap();
        fs::write(temp.path().join("config.toml"), "").unwrap();
        Self { temp }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    /// `brevity` isolated from the user's config and environment.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("brevity").unwrap();
        cmd.env_remove("BREVITY_LIB")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .arg("--config")
            .arg(self.path("config.toml"));
        cmd
    }

    fn generate(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("generate")
            .arg(self.path("app.brief"))
            .arg(self.path("out"))
            .arg("--lib")
            .arg(self.path("lib"));
        cmd
    }
}

const MAIN_GENERATOR: &str = "\
generator
    templates
        template:main element:cli file:main.txt
    actions
";

fn hello_fixture() -> Fixture {
    Fixture::new(
        MAIN_GENERATOR,
        &[("main.tmpl", "hello {{parent.name}}")],
        "brevity\n    project:demo\n        cli\n",
    )
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_help_flag() {
    Command::cargo_bin("brevity")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("expand"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("brevity")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_generate_writes_project() {
    let fixture = hello_fixture();
    fixture
        .generate()
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 1 project(s): demo"));

    assert_eq!(read(&fixture.path("out/demo/main.txt")), "hello demo");
}

#[test]
fn test_generate_json_report() {
    let fixture = hello_fixture();
    fixture
        .generate()
        .args(["--output-format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"step\": \"file\""))
        .stdout(predicate::str::contains("\"projects\""));
}

#[test]
fn test_library_from_config_file() {
    let fixture = hello_fixture();
    fs::write(
        fixture.path("config.toml"),
        format!("[library]\npath = {:?}\n", fixture.path("lib").display().to_string()),
    )
    .unwrap();

    fixture
        .cmd()
        .arg("generate")
        .arg(fixture.path("app.brief"))
        .arg(fixture.path("out"))
        .assert()
        .success();
    assert!(fixture.path("out/demo/main.txt").exists());
}

#[test]
fn test_render_mode_skips_actions() {
    let fixture = Fixture::new(
        "generator\n    templates\n    actions\n        action:init element:cli exec:\"brevity-missing-tool init {{parent.name}}\"\n",
        &[],
        "brevity\n    project:demo\n        cli\n",
    );
    fixture
        .generate()
        .arg("--render")
        .assert()
        .success()
        .stdout(predicate::str::contains("render brevity-missing-tool init demo"));
}

#[test]
fn test_missing_action_program_fails() {
    let fixture = Fixture::new(
        "generator\n    templates\n    actions\n        action:init element:cli exec:\"brevity-missing-tool init\"\n",
        &[],
        "brevity\n    project:demo\n        cli\n",
    );
    fixture
        .generate()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to start 'brevity-missing-tool'"));
}

#[cfg(unix)]
#[test]
fn test_failing_action_reports_output() {
    let fixture = Fixture::new(
        "generator\n    templates\n    actions\n        action:check element:cli exec:\"sh -c 'echo boom; exit 3'\"\n",
        &[],
        "brevity\n    project:demo\n        cli\n",
    );
    fixture
        .generate()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("action check failed (exit code 3)"))
        .stderr(predicate::str::contains("boom"));
}

#[test]
fn test_missing_destination_exits_not_found() {
    let fixture = hello_fixture();
    fixture
        .cmd()
        .arg("generate")
        .arg(fixture.path("app.brief"))
        .arg(fixture.path("nowhere"))
        .arg("--lib")
        .arg(fixture.path("lib"))
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("destination not found"));
}

#[test]
fn test_unnamed_project_is_a_spec_error() {
    let fixture = Fixture::new(
        MAIN_GENERATOR,
        &[("main.tmpl", "x")],
        "brevity\n    project\n        cli\n",
    );
    fixture.generate().assert().failure().code(2);
    assert!(!fixture.path("out/main.txt").exists());
}

#[test]
fn test_missing_library_is_configuration_error() {
    let fixture = hello_fixture();
    fixture
        .cmd()
        .arg("generate")
        .arg(fixture.path("app.brief"))
        .arg(fixture.path("out"))
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("--lib"));
}

#[test]
fn test_expand_prints_merged_document() {
    let fixture = Fixture::new(
        MAIN_GENERATOR,
        &[("main.tmpl", "x")],
        "brevity\n    project:demo\n        api:users\n        cli\n",
    );
    let api = fixture.path("lib/api/templates");
    fs::create_dir_all(&api).unwrap();
    fs::write(api.join("@macro.api.tmpl"), "service:{{name}} port:8080\n").unwrap();

    fixture
        .cmd()
        .arg("expand")
        .arg(fixture.path("app.brief"))
        .arg("--lib")
        .arg(fixture.path("lib"))
        .assert()
        .success()
        .stdout(predicate::str::contains("service:users port:8080"))
        .stdout(predicate::str::contains("api:users").not());
}

#[test]
fn test_list_shows_sections_as_json() {
    let fixture = Fixture::new(
        MAIN_GENERATOR,
        &[("cobra/main.tmpl", "x"), ("flags/main.tmpl", "y")],
        "brevity\n",
    );
    fixture
        .cmd()
        .args(["list", "--format", "json", "--lib"])
        .arg(fixture.path("lib"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"cli\""))
        .stdout(predicate::str::contains("\"cobra\""))
        .stdout(predicate::str::contains("\"has_generator\": true"));
}

#[test]
fn test_init_then_config_get() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("nested/config.toml");

    Command::cargo_bin("brevity")
        .unwrap()
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .success();
    assert!(read(&config).contains("[output]"));

    Command::cargo_bin("brevity")
        .unwrap()
        .env("NO_COLOR", "1")
        .env_remove("BREVITY_OUTPUT__FORMAT")
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "output.format"])
        .assert()
        .success()
        .stdout(predicate::str::contains("human"));
}

#[test]
fn test_completions_bash() {
    Command::cargo_bin("brevity")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("brevity"));
}
