//! Assay CLI - functional-test harness for cluster model-defaults
//!
//! Usage: assay <COMMAND>
//!
//! Commands:
//!   run         Full suite (controller scenario, then region scenario)
//!   controller  Controller-scope scenario only
//!   region      Region-scope scenario only
//!   list        Print every model default visible at a scope

use anyhow::Result;
use clap::Parser;

use assay::assess::{self, Outcome, Plan, ScenarioResult};
use assay::cli::{Cli, Commands};
use assay::client::{self, ProcessRunner};
use assay::config;
use assay::scope::Scope;
use assay::session::{BootedContext, ProcessSession, Session};
use assay::ui::{self, Reporter};

/// Controller name used when the harness bootstraps its own session
const SESSION_CONTROLLER: &str = "assay-test";

fn main() -> Result<()> {
    let cli = Cli::parse();
    if !run(cli)? {
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<bool> {
    let (mut config, warnings) = config::load_or_default(cli.config.as_deref())?;
    if let Some(binary) = &cli.binary {
        config.cli.binary = binary.clone();
    }

    let verbosity = config.output.verbosity.bump(cli.verbose);
    let reporter = Reporter::new(verbosity, cli.json);
    reporter.config_warnings(&warnings);

    let runner = ProcessRunner::new(&config.cli.binary);

    match cli.command {
        Commands::Run {
            key,
            value,
            cloud,
            region,
            bootstrap,
            charm,
        } => {
            let key = key.unwrap_or_else(|| config.model.key.clone());
            let value = value.unwrap_or_else(|| config.model.value.clone());
            let cloud = cloud.or_else(|| config.scope.cloud.clone());
            let region = region.or_else(|| config.scope.region.clone());
            let charm = charm.or_else(|| config.workload.charm.clone());

            let region_scope = match (&cloud, &region) {
                (None, None) => None,
                _ => Some(Scope::new(cloud.as_deref(), region.as_deref())?),
            };
            let plan = Plan {
                key,
                value,
                region_scope,
            };

            let session = ProcessSession::new(&runner, SESSION_CONTROLLER);
            let _guard = if bootstrap {
                reporter.info(&format!("bootstrapping {}", SESSION_CONTROLLER));
                Some(BootedContext::establish(&session)?)
            } else {
                None
            };

            if let Some(charm) = &charm {
                reporter.info(&format!("deploying {}", charm));
                session.deploy(charm)?;
                session.wait_until_ready()?;
            }

            reporter.verbose(&format!(
                "assessing '{}' with value '{}'",
                plan.key, plan.value
            ));
            let report = assess::assess_model_defaults(&runner, &plan);
            for scenario in &report.scenarios {
                reporter.scenario_result(scenario);
            }
            reporter.summary(&report);
            Ok(report.passed())
        }

        Commands::Controller { key, value } => {
            let key = key.unwrap_or_else(|| config.model.key.clone());
            let value = value.unwrap_or_else(|| config.model.value.clone());

            reporter.scenario_started("controller");
            let result = ScenarioResult::from_run(
                "controller",
                assess::assess_controller(&runner, &key, &value),
            );
            reporter.scenario_result(&result);
            Ok(result.outcome == Outcome::Pass)
        }

        Commands::Region {
            key,
            value,
            cloud,
            region,
        } => {
            let key = key.unwrap_or_else(|| config.model.key.clone());
            let value = value.unwrap_or_else(|| config.model.value.clone());
            let cloud = cloud.or_else(|| config.scope.cloud.clone());
            let region = region.or_else(|| config.scope.region.clone());
            let scope = Scope::new(cloud.as_deref(), region.as_deref())?;

            let name = format!("region:{}", scope);
            reporter.scenario_started(&name);
            let result = ScenarioResult::from_run(
                &name,
                assess::assess_region(&runner, &key, &value, &scope),
            );
            reporter.scenario_result(&result);
            Ok(result.outcome == Outcome::Pass)
        }

        Commands::List { cloud, region } => {
            let scope = Scope::new(cloud.as_deref(), region.as_deref())?;
            let all = client::list_model_defaults(&runner, &scope)?;
            for entry in &all {
                if cli.json {
                    ui::emit(serde_json::json!({
                        "event": "default",
                        "entry": entry.to_mapping()?,
                    }))?;
                } else {
                    println!("{}", entry);
                }
            }
            Ok(true)
        }
    }
}
