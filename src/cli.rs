//! Assay CLI argument surface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Assay - functional-test harness for cluster model-defaults
#[derive(Parser, Debug)]
#[command(name = "assay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a harness configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Orchestrator binary to drive (overrides configuration)
    #[arg(long, global = true)]
    pub binary: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full suite: controller scenario, then region scenario
    Run {
        /// Key under test
        #[arg(long)]
        key: Option<String>,

        /// Override value to apply at each scope
        #[arg(long)]
        value: Option<String>,

        /// Cloud for the region scenario (must be paired with --region)
        #[arg(long)]
        cloud: Option<String>,

        /// Region for the region scenario
        #[arg(long)]
        region: Option<String>,

        /// Bootstrap a fresh session and tear it down afterwards
        #[arg(long)]
        bootstrap: bool,

        /// Charm to deploy before assessing
        #[arg(long)]
        charm: Option<String>,
    },

    /// Run the controller-scope scenario only
    Controller {
        /// Key under test
        #[arg(long)]
        key: Option<String>,

        /// Override value to apply
        #[arg(long)]
        value: Option<String>,
    },

    /// Run the region-scope scenario only
    Region {
        /// Key under test
        #[arg(long)]
        key: Option<String>,

        /// Override value to apply
        #[arg(long)]
        value: Option<String>,

        /// Cloud of the target region (must be paired with --region)
        #[arg(long)]
        cloud: Option<String>,

        /// Target region
        #[arg(long)]
        region: Option<String>,
    },

    /// List every model default visible at a scope
    List {
        /// Cloud to scope the listing to (must be paired with --region)
        #[arg(long)]
        cloud: Option<String>,

        /// Region to scope the listing to
        #[arg(long)]
        region: Option<String>,
    },
}
