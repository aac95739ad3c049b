//! Publish specs
//!
//! The CLI boots every module, so a published event reaches the same handlers
//! it would inside the platform.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn registration_reaches_auth_notifications_and_audit() {
    let project = Project::empty();
    project
        .agora()
        .args([
            "publish",
            "auth.user.registered",
            "--payload",
            r#"{"user_id": "u-1", "email": "ana@example.com"}"#,
            "--source",
            "auth",
        ])
        .passes()
        .stdout_has("auth.user.registered (source: auth, priority: normal, handlers: 3)")
        .stdout_has("  - auth.store_user [auth.user.registered] ok")
        .stdout_has("  - notifications.welcome [auth.user.registered] ok")
        .stdout_has("  - audit.record [*] ok");
}

#[test]
fn event_without_subscribers_still_reaches_audit() {
    let project = Project::empty();
    project
        .agora()
        .args(["publish", "store.order.placed"])
        .passes()
        .stdout_has("handlers: 1")
        .stdout_has("audit.record [*] ok");
}

#[test]
fn failing_handler_is_reported_but_publish_succeeds() {
    let project = Project::empty();
    project
        .agora()
        .args([
            "publish",
            "auth.user.login",
            "--payload",
            r#"{"user_id": "ghost"}"#,
        ])
        .passes()
        .stdout_has("auth.record_login [auth.user.login] failed: unknown user ghost")
        .stdout_has("audit.record [*] ok");
}

#[test]
fn malformed_payload_fails_only_the_typed_handler() {
    let project = Project::empty();
    project
        .agora()
        .args([
            "publish",
            "community.post.created",
            "--payload",
            r#"{"title": "no ids"}"#,
        ])
        .passes()
        .stdout_has("notifications.featured_post [community.post.created] failed: invalid payload")
        .stdout_has("audit.record [*] ok");
}

#[test]
fn nested_events_are_indented_under_their_cause() {
    let project = Project::empty();
    project
        .agora()
        .args([
            "publish",
            "pinpanclub.match.finished",
            "--payload",
            r#"{"match_id": "m-1", "winner_id": "ana", "loser_id": "ben"}"#,
        ])
        .passes()
        .stdout_has("pinpanclub.match.finished (source: cli")
        .stdout_has("  - pinpanclub.update_ladder [pinpanclub.match.finished] ok")
        .stdout_has(" pinpanclub.ranking.updated (source: pinpanclub, priority: normal, handlers: 2)")
        .stdout_has("    - notifications.rank_changed [pinpanclub.ranking.updated] ok")
        .stdout_lacks("dropped");
}

#[test]
fn json_output_carries_outcomes() {
    let project = Project::empty();
    let out = project
        .agora()
        .args([
            "--format",
            "json",
            "publish",
            "auth.user.login",
            "--priority",
            "high",
            "--meta",
            "ip=10.0.0.1",
            "--payload",
            r#"{"user_id": "ghost"}"#,
        ])
        .passes();

    let json = out.json();
    assert_eq!(json["outcome"], "dispatched");
    let root = &json["events"][0];
    assert_eq!(root["event_type"], "auth.user.login");
    assert_eq!(root["priority"], "high");
    assert_eq!(root["depth"], 0);
    assert_eq!(root["outcomes"][0]["handler"], "auth.record_login");
    assert_eq!(root["outcomes"][0]["status"]["status"], "failed");
    assert_eq!(root["outcomes"][1]["status"]["status"], "succeeded");
}
