//! `flowstate validate` -- offline checks for a definition file.
//!
//! Runs the same checks the server applies at registration, plus the
//! initial-state check that otherwise only fails when an instance is
//! created.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use flowstate_core::transition;
use flowstate_types::workflow::WorkflowDefinition;

/// Result of checking one definition.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub id: String,
    pub valid: bool,
    pub initial_state: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check a parsed definition.
pub fn check_definition(def: &WorkflowDefinition) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Err(e) = transition::validate_definition(def) {
        errors.push(e.to_string());
    }

    let initial_state = match transition::pick_initial_state(def) {
        Ok(state) => Some(state.id.clone()),
        Err(e) => {
            errors.push(e.to_string());
            None
        }
    };

    let initial_count = def.states.iter().filter(|s| s.is_initial).count();
    if let (true, Some(first)) = (initial_count > 1, &initial_state) {
        warnings.push(format!(
            "{initial_count} states are marked initial; '{first}' will be used"
        ));
    }
    if !def.states.iter().any(|s| s.is_final) {
        warnings.push("no state is marked final".to_string());
    }

    ValidationReport {
        id: def.id.clone(),
        valid: errors.is_empty(),
        initial_state,
        errors,
        warnings,
    }
}

/// Whether a report is shown; `--quiet` keeps only failing reports.
fn should_print(report: &ValidationReport, quiet: bool) -> bool {
    !quiet || !report.valid
}

/// Read, parse, and check a definition file, printing the report.
///
/// Returns an error when the file cannot be read or parsed, or when the
/// definition is invalid, so the process exits non-zero.
pub async fn validate_file(path: &Path, json: bool, quiet: bool) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let def: WorkflowDefinition = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {} as a workflow definition", path.display()))?;

    let report = check_definition(&def);

    if should_print(&report, quiet) {
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
    }

    if !report.valid {
        anyhow::bail!("definition '{}' is invalid", report.id);
    }
    Ok(())
}

fn print_report(report: &ValidationReport) {
    println!();
    if report.valid {
        println!(
            "  {} Definition '{}' is valid",
            console::style("✓").green(),
            console::style(&report.id).cyan()
        );
    } else {
        println!(
            "  {} Definition '{}' is invalid",
            console::style("✗").red(),
            console::style(&report.id).cyan()
        );
    }
    if let Some(initial) = &report.initial_state {
        println!("    initial state: {initial}");
    }
    for error in &report.errors {
        println!("  {} {error}", console::style("error:").red().bold());
    }
    for warning in &report.warnings {
        println!("  {} {warning}", console::style("warning:").yellow());
    }
    println!();
}
