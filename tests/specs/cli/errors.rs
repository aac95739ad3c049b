//! User error specs
//!
//! Bad input exits non-zero with a message, context and suggestions.

use crate::prelude::*;

#[test]
fn invalid_event_type_is_rejected() {
    let project = Project::empty();
    project
        .agora()
        .args(["publish", "auth..login"])
        .fails()
        .stderr_has("error: Invalid event type 'auth..login'")
        .stderr_has("suggestions:");
}

#[test]
fn wildcard_event_type_is_rejected() {
    let project = Project::empty();
    project
        .agora()
        .args(["publish", "auth.*"])
        .fails()
        .stderr_has("Invalid event type");
}

#[test]
fn non_object_payload_is_rejected() {
    let project = Project::empty();
    project
        .agora()
        .args(["publish", "auth.user.login", "--payload", "[1, 2]"])
        .fails()
        .stderr_has("Payload is not a JSON object");
}

#[test]
fn unknown_priority_is_rejected() {
    let project = Project::empty();
    project
        .agora()
        .args(["publish", "auth.user.login", "--priority", "urgent"])
        .fails()
        .stderr_has("unknown priority");
}

#[test]
fn malformed_meta_is_rejected() {
    let project = Project::empty();
    project
        .agora()
        .args(["publish", "auth.user.login", "--meta", "ip"])
        .fails()
        .stderr_has("invalid key=value");
}
