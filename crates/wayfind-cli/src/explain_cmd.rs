//! `wayfind explain`: translate a plan trace into English.

use std::path::Path;

use anyhow::{Context, Result};

use wayfind_core::explain::{explain_plan_content, explain_plan_file};

pub fn run_explain(plan: &Path, output: Option<&Path>) -> Result<()> {
    match output {
        Some(out) => {
            explain_plan_file(plan, out)
                .with_context(|| format!("failed to explain {}", plan.display()))?;
            println!("Explanation written to {}", out.display());
        }
        None => {
            let trace = std::fs::read_to_string(plan)
                .with_context(|| format!("failed to read plan file {}", plan.display()))?;
            println!("{}", explain_plan_content(&trace));
        }
    }
    Ok(())
}
