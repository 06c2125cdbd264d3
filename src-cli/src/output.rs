use csprop::{OutcomeStatus, ReconcileReport};

pub fn print_report(report: &ReconcileReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for outcome in &report.outcomes {
        let scope = outcome
            .cib
            .as_deref()
            .map(|c| format!(" [{}]", c))
            .unwrap_or_default();
        let action = outcome
            .action
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        match &outcome.status {
            OutcomeStatus::Unchanged => println!("  = {}{}", outcome.name, scope),
            OutcomeStatus::Applied => println!("  ✓ {}{}: {}", outcome.name, scope, action),
            OutcomeStatus::Planned => println!("  ~ {}{}: {}", outcome.name, scope, action),
            OutcomeStatus::Failed { error } => {
                println!("  ✗ {}{}: {}", outcome.name, scope, error)
            }
        }
    }
    println!("{}", report);
    Ok(())
}

pub fn print_error(msg: &str) {
    eprintln!("error: {}", msg);
}
