//! Routes specs

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn routes_list_every_module_subscription() {
    let project = Project::empty();
    project
        .agora()
        .args(["routes"])
        .passes()
        .stdout_has("PATTERN")
        .stdout_has("auth.store_user")
        .stdout_has("auth.record_login")
        .stdout_has("notifications.welcome")
        .stdout_has("notifications.featured_post")
        .stdout_has("notifications.rank_changed")
        .stdout_has("pinpanclub.update_ladder")
        .stdout_has("audit.record");
}

#[test]
fn routes_json_is_sorted_by_pattern() {
    let project = Project::empty();
    let out = project
        .agora()
        .args(["--format", "json", "routes"])
        .passes();

    let rows = out.json();
    let patterns: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["pattern"].as_str().unwrap())
        .collect();
    assert_eq!(patterns.len(), 7);
    assert_eq!(patterns[0], "*");
    let mut sorted = patterns.clone();
    sorted.sort();
    assert_eq!(patterns, sorted);
}
