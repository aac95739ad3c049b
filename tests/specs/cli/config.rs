//! Settings file specs

use crate::prelude::*;

#[test]
fn missing_config_file_fails() {
    let project = Project::empty();
    project
        .agora()
        .args(["--config", "nope.toml", "routes"])
        .fails()
        .stderr_has("Failed to load config nope.toml");
}

#[test]
fn unknown_key_fails_with_suggestion() {
    let project = Project::empty();
    project.file("agora.toml", "[bus]\nretries = 3\n");
    project
        .agora()
        .args(["--config", "agora.toml", "routes"])
        .fails()
        .stderr_has("unknown field")
        .stderr_has("[bus] and [log]");
}

#[test]
fn zero_cascade_limit_is_invalid() {
    let project = Project::empty();
    project.file("agora.toml", "[bus]\nmax_cascade = 0\n");
    project
        .agora()
        .args(["--config", "agora.toml", "routes"])
        .fails()
        .stderr_has("max_cascade must be at least 1");
}

#[test]
fn config_is_read_from_environment() {
    let project = Project::empty();
    let path = project.file("env.toml", "[bus]\nmax_cascade = 0\n");
    project
        .agora()
        .env("AGORA_CONFIG", &path)
        .args(["routes"])
        .fails()
        .stderr_has("max_cascade");
}

#[test]
fn config_in_user_dir_is_picked_up() {
    let project = Project::empty();
    project.file(".config/agora/config.toml", "[bus]\nmax_cascade = 0\n");
    project
        .agora()
        .args(["routes"])
        .fails()
        .stderr_has("max_cascade");
}

#[test]
fn cascade_limit_from_config_drops_nested_events() {
    let project = Project::empty();
    project.file("agora.toml", "[bus]\nmax_cascade = 2\n");
    project
        .agora()
        .args([
            "--config",
            "agora.toml",
            "publish",
            "pinpanclub.match.finished",
            "--payload",
            r#"{"match_id": "m-1", "winner_id": "ana", "loser_id": "ben"}"#,
        ])
        .passes()
        .stdout_has("dropped 1 nested event(s)");
}

#[test]
fn log_file_receives_handler_failures() {
    let project = Project::empty();
    project.file(
        "agora.toml",
        "[log]\nlevel = \"info\"\nfile = \"logs/agora.log\"\n",
    );
    project
        .agora()
        .args([
            "--config",
            "agora.toml",
            "publish",
            "auth.user.login",
            "--payload",
            r#"{"user_id": "ghost"}"#,
        ])
        .passes();

    let log = std::fs::read_to_string(project.path().join("logs/agora.log")).unwrap();
    assert!(log.contains("handler failed"), "{log}");
    assert!(log.contains("auth.record_login"), "{log}");
}
