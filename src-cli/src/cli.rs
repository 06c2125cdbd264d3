use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "csprop")]
#[command(about = "Reconcile Pacemaker cluster properties against declared manifests")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Manifest directory (defaults to <config dir>/csprop/manifests)
    #[arg(short, long, global = true, env = "CSPROP_MANIFESTS")]
    pub manifests: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "CSPROP_LOG_JSON")]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and validate the manifests
    Validate,
    /// Show the ordering dependencies of every property
    Deps,
    /// Show what a pass would change, without writing
    Plan(SnapshotArgs),
    /// Run a pass and write the result back to the snapshot
    Apply(SnapshotArgs),
    /// Commit a shadow CIB into the live properties
    Commit(CommitArgs),
}

#[derive(clap::Args)]
pub struct SnapshotArgs {
    /// YAML snapshot of the CIB properties
    #[arg(short, long, env = "CSPROP_SNAPSHOT")]
    pub snapshot: PathBuf,
}

#[derive(clap::Args)]
pub struct CommitArgs {
    /// Name of the shadow CIB
    pub shadow: String,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}
