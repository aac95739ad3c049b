//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let project = Project::empty();
    project
        .agora()
        .args(["--help"])
        .passes()
        .stdout_has("publish")
        .stdout_has("run")
        .stdout_has("match")
        .stdout_has("routes");
}

#[test]
fn version_is_printed() {
    let project = Project::empty();
    project
        .agora()
        .args(["--version"])
        .passes()
        .stdout_has("agora ");
}

#[test]
fn missing_command_fails() {
    let project = Project::empty();
    project.agora().fails().stderr_has("Usage");
}
