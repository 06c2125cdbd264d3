mod cli;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use csprop::logging::{self, LoggingConfig};
use csprop::{
    dependencies, ConfigLoader, ConfigValidator, InMemoryCib, LoadedConfig, PropertyReconciler,
    ReconcileMode, ReconcileReport,
};
use output::{print_error, print_report};

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            print_error(&format!("{e:#}"));
            std::process::exit(1);
        }
    }
}

/// Returns false when the command completed but reported failures.
fn run() -> Result<bool> {
    let cli = Cli::parse();

    logging::init(&LoggingConfig {
        json: cli.log_json,
        ..Default::default()
    })?;

    let manifest_dir = resolve_manifest_dir(cli.manifests.clone())?;

    match &cli.command {
        Commands::Validate => {
            let config = load_validated(&manifest_dir)?;
            println!(
                "{} properties and {} shadows in {} are valid",
                config.properties.len(),
                config.shadows.len(),
                manifest_dir.display()
            );
            Ok(true)
        }
        Commands::Deps => {
            let config = load_validated(&manifest_dir)?;
            let mut edges = serde_json::Map::new();
            for desc in config.descriptors()? {
                let deps = dependencies(&desc);
                if cli.json {
                    edges.insert(desc.name().to_string(), serde_json::to_value(&deps)?);
                } else {
                    let list: Vec<String> = deps.iter().map(ToString::to_string).collect();
                    println!("{} <- {}", desc.name(), list.join(", "));
                }
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&edges)?);
            }
            Ok(true)
        }
        Commands::Plan(args) => reconcile(&cli, &manifest_dir, &args.snapshot, ReconcileMode::Plan),
        Commands::Apply(args) => {
            reconcile(&cli, &manifest_dir, &args.snapshot, ReconcileMode::Apply)
        }
        Commands::Commit(args) => {
            let cib = InMemoryCib::load(&args.snapshot.snapshot)?;
            cib.commit_shadow(&args.shadow)
                .with_context(|| format!("cannot commit shadow '{}'", args.shadow))?;
            cib.save(&args.snapshot.snapshot)?;
            println!("Committed shadow CIB '{}'", args.shadow);
            Ok(true)
        }
    }
}

fn reconcile(
    cli: &Cli,
    manifest_dir: &std::path::Path,
    snapshot: &std::path::Path,
    mode: ReconcileMode,
) -> Result<bool> {
    let config = load_validated(manifest_dir)?;
    let cib = InMemoryCib::load(snapshot)?;

    let report = run_pass(&config, &cib, mode)?;

    if mode == ReconcileMode::Apply {
        cib.save(snapshot)?;
    }

    print_report(&report, cli.json)?;
    Ok(report.is_success())
}

/// Runs one pass over the loaded manifests.
///
/// Declared shadow CIBs are created before any property staged in them is
/// touched. A plan works on a throwaway copy of `cib` so it sees the same
/// shadows an apply would, without modifying `cib`.
fn run_pass(
    config: &LoadedConfig,
    cib: &InMemoryCib,
    mode: ReconcileMode,
) -> Result<ReconcileReport> {
    let descriptors = config.descriptors()?;
    let settings = config.settings_spec();

    let scratch;
    let target = match mode {
        ReconcileMode::Apply => cib,
        ReconcileMode::Plan => {
            scratch = InMemoryCib::from_snapshot(cib.snapshot());
            &scratch
        }
    };

    for shadow in &config.shadows {
        let name = &shadow.resource.metadata.name;
        if target.create_shadow(name) {
            match mode {
                ReconcileMode::Apply => log::info!("Created shadow CIB '{}'", name),
                ReconcileMode::Plan => log::info!("Shadow CIB '{}' would be created", name),
            }
        }
    }

    let reconciler = PropertyReconciler::new(target, target)
        .with_comparison(settings.value_comparison)
        .with_parallel(settings.parallel);
    Ok(reconciler.run(&descriptors, mode))
}

fn load_validated(manifest_dir: &std::path::Path) -> Result<LoadedConfig> {
    let config = ConfigLoader::new(manifest_dir).load()?;
    let mut validator = ConfigValidator::new();
    validator.validate(&config)?;
    Ok(config)
}

fn resolve_manifest_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    dirs::config_dir()
        .map(|d| d.join("csprop").join("manifests"))
        .context("cannot determine a default manifest directory; pass --manifests")
}
