//! Replay specs for `agora run`

use crate::prelude::*;
use crate::prelude::assert_eq;

const SESSION: &str = r#"# a small day on the platform
{"event_type": "auth.user.registered", "source": "auth", "payload": {"user_id": "u-1", "email": "ana@example.com"}}
{"event_type": "auth.user.login", "source": "auth", "payload": {"user_id": "u-1"}}
{"event_type": "community.post.created", "source": "community", "payload": {"post_id": "post-1", "author_id": "u-1", "title": "Ladder night", "featured": true}}
"#;

#[test]
fn replays_events_in_order() {
    let project = Project::empty();
    project.file("session.jsonl", SESSION);

    let out = project.agora().args(["run", "session.jsonl"]).passes();
    let registered = out.stdout.find("auth.user.registered").unwrap();
    let login = out.stdout.find("auth.user.login").unwrap();
    let post = out.stdout.find("community.post.created").unwrap();
    assert!(registered < login && login < post, "{}", out.stdout);

    out.stdout_has("auth.record_login [auth.user.login] ok")
        .stdout_has("notifications.featured_post [community.post.created] ok")
        .stdout_has("stats: published=3 dispatched=3");
}

#[test]
fn stats_count_failures() {
    let project = Project::empty();
    project.file(
        "bad.jsonl",
        "{\"event_type\": \"auth.user.login\", \"payload\": {\"user_id\": \"ghost\"}}\n",
    );
    project
        .agora()
        .args(["run", "bad.jsonl"])
        .passes()
        .stdout_has("failures=1");
}

#[test]
fn invalid_line_aborts_before_publishing() {
    let project = Project::empty();
    project.file(
        "broken.jsonl",
        "{\"event_type\": \"auth.user.login\"}\n{\"event_type\": \"auth..login\"}\n",
    );
    project
        .agora()
        .args(["run", "broken.jsonl"])
        .fails()
        .stderr_has("broken.jsonl:2: invalid event line");
}

#[test]
fn missing_file_fails() {
    let project = Project::empty();
    project
        .agora()
        .args(["run", "absent.jsonl"])
        .fails()
        .stderr_has("failed to read absent.jsonl");
}

#[test]
fn json_summary_has_reports_and_stats() {
    let project = Project::empty();
    project.file("session.jsonl", SESSION);
    let out = project
        .agora()
        .args(["--format", "json", "run", "session.jsonl"])
        .passes();

    let json = out.json();
    assert_eq!(json["reports"].as_array().unwrap().len(), 3);
    assert_eq!(json["stats"]["published"], 3);
    assert_eq!(json["stats"]["failures"], 0);
}
