//! Pattern matching specs

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn prefix_pattern_matches_on_segment_boundary() {
    let project = Project::empty();
    project
        .agora()
        .args([
            "match",
            "auth.*",
            "auth.user.login",
            "authentication.start",
            "auth",
        ])
        .passes()
        .stdout_eq("auth.user.login: match\nauthentication.start: no match\nauth: no match\n");
}

#[test]
fn exact_and_global_patterns() {
    let project = Project::empty();
    project
        .agora()
        .args(["match", "auth.user.login", "auth.user.login", "auth.user.logout"])
        .passes()
        .stdout_eq("auth.user.login: match\nauth.user.logout: no match\n");

    project
        .agora()
        .args(["match", "*", "a.b", "community.post.created"])
        .passes()
        .stdout_eq("a.b: match\ncommunity.post.created: match\n");
}

#[test]
fn embedded_wildcard_is_rejected() {
    let project = Project::empty();
    project
        .agora()
        .args(["match", "auth.*.created", "auth.post.created"])
        .fails()
        .stderr_has("Invalid pattern 'auth.*.created'");
}

#[test]
fn json_output_lists_verdicts() {
    let project = Project::empty();
    let out = project
        .agora()
        .args(["--format", "json", "match", "community.*", "community.post.created"])
        .passes();
    let rows = out.json();
    assert_eq!(rows[0]["event_type"], "community.post.created");
    assert_eq!(rows[0]["matched"], true);
}

#[test]
fn match_does_not_boot_the_platform() {
    let project = Project::empty();
    project
        .agora()
        .env("RUST_LOG", "debug")
        .args(["match", "auth.*", "auth.user.login"])
        .passes()
        .stdout_eq("auth.user.login: match\n")
        .stderr_lacks("platform ready");
    project
        .agora()
        .env("RUST_LOG", "debug")
        .args(["routes"])
        .passes()
        .stderr_has("platform ready");
}
