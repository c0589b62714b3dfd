//! Plan trace translation.
//!
//! Turns a planner trace (one action per line, e.g. `(move r1 room1
//! room3)`) into a line-oriented English explanation. Only `move` actions
//! are narrated; comments and anything unrecognised are silently skipped,
//! so an empty result is a valid outcome, not an error.

use std::path::Path;

use crate::error::{CoreResult, Failure};

/// The action name the translator narrates.
pub const MOVE_ACTION: &str = "move";

/// A move needs at least action, robot, from, and to.
const MIN_ACTION_TOKENS: usize = 4;

/// Translate a plan trace into explanation text.
///
/// For each non-empty, non-comment line (`;` starts a comment) containing
/// a parenthesized group, the group is split on whitespace; groups of at
/// least four tokens whose first token is [`MOVE_ACTION`] become
/// `Robot <r> moves from <a> to <b>.` lines, in source order. Everything
/// else produces nothing.
pub fn explain_plan_content(plan: &str) -> String {
    let mut lines = Vec::new();

    for line in plan.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        let Some(open) = line.find('(') else { continue };
        let Some(close) = line.find(')') else { continue };
        if close < open {
            continue;
        }

        let tokens: Vec<&str> = line[open + 1..close].split_whitespace().collect();
        if tokens.len() >= MIN_ACTION_TOKENS && tokens[0] == MOVE_ACTION {
            lines.push(format!(
                "Robot {} moves from {} to {}.",
                tokens[1], tokens[2], tokens[3]
            ));
        }
    }

    lines.join("\n")
}

/// Translate a plan file and write the explanation next to it.
///
/// Returns the explanation text that was written.
pub fn explain_plan_file(plan_path: &Path, explanation_path: &Path) -> CoreResult<String> {
    let plan = std::fs::read_to_string(plan_path).map_err(|e| {
        Failure::file_io(format!("could not read plan file {}", plan_path.display()))
            .with_source(e)
    })?;

    let explanation = explain_plan_content(&plan);

    std::fs::write(explanation_path, &explanation).map_err(|e| {
        Failure::file_io(format!(
            "could not write explanation file {}",
            explanation_path.display()
        ))
        .with_source(e)
    })?;

    tracing::info!(explanation = %explanation_path.display(), "explanation written");
    Ok(explanation)
}
