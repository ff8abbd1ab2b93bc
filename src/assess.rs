//! Scenario driver for the model-defaults surface
//!
//! Each scenario follows the same four-step protocol: read the baseline
//! value, set a new override at the target scope, assert the freshly read
//! value equals the baseline's default recombined with the override, then
//! reset and assert the value returns to the baseline exactly.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_yaml_ng::Value;

use crate::client::{self, CommandRunner};
use crate::error::{AssayError, AssayResult};
use crate::models::ModelDefault;
use crate::scope::Scope;

/// Compare two model defaults, raising a structured mismatch on failure
///
/// The error carries the message and both compared values so a failing
/// run shows exactly what diverged.
pub fn assert_defaults_equal(
    message: &str,
    expected: &ModelDefault,
    actual: &ModelDefault,
) -> AssayResult<()> {
    if expected != actual {
        return Err(AssayError::Mismatch {
            message: message.to_string(),
            expected: expected.clone(),
            actual: actual.clone(),
        });
    }
    Ok(())
}

/// Assess set/unset of a key at controller scope
///
/// Verifies the controller layer changes while `default` stays fixed,
/// and that reset is a true inverse of set.
pub fn assess_controller(runner: &dyn CommandRunner, key: &str, value: &str) -> AssayResult<()> {
    let scope = Scope::Controller;
    let baseline = client::get_model_defaults(runner, key, &scope)?;
    let default = baseline.default().cloned();

    client::set_model_defaults(runner, key, value, &scope)?;
    assert_defaults_equal(
        "model-defaults: mismatch on setting controller",
        &ModelDefault::assemble(
            key,
            default,
            Some(Value::String(value.to_string())),
            Vec::new(),
        ),
        &client::get_model_defaults(runner, key, &scope)?,
    )?;

    client::unset_model_defaults(runner, key, &scope)?;
    assert_defaults_equal(
        "model-defaults: mismatch after resetting controller",
        &baseline,
        &client::get_model_defaults(runner, key, &scope)?,
    )
}

/// Assess set/unset of a key at region scope
///
/// The scope must carry a region; its name keys the expected `regions`
/// entry in the assembled post-set value.
pub fn assess_region(
    runner: &dyn CommandRunner,
    key: &str,
    value: &str,
    scope: &Scope,
) -> AssayResult<()> {
    let region = match scope.region() {
        Some(region) => region.to_string(),
        None => {
            return Err(AssayError::MissingRegion {
                scope: scope.to_string(),
            })
        }
    };

    let baseline = client::get_model_defaults(runner, key, scope)?;
    let default = baseline.default().cloned();

    client::set_model_defaults(runner, key, value, scope)?;
    assert_defaults_equal(
        "model-defaults: mismatch on setting region",
        &ModelDefault::assemble(
            key,
            default,
            None,
            vec![(region, Value::String(value.to_string()))],
        ),
        &client::get_model_defaults(runner, key, scope)?,
    )?;

    client::unset_model_defaults(runner, key, scope)?;
    assert_defaults_equal(
        "model-defaults: mismatch after resetting region",
        &baseline,
        &client::get_model_defaults(runner, key, scope)?,
    )
}

/// Outcome of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

/// One scenario's name, outcome, and failure rendering
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl ScenarioResult {
    /// Fold a scenario's result into a named outcome
    pub fn from_run(name: &str, run: AssayResult<()>) -> Self {
        match run {
            Ok(()) => Self {
                name: name.to_string(),
                outcome: Outcome::Pass,
                failure: None,
            },
            Err(err) => Self {
                name: name.to_string(),
                outcome: Outcome::Fail,
                failure: Some(err.to_string()),
            },
        }
    }
}

/// Full suite report with UTC timestamps, serializable for `--json` mode
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub scenarios: Vec<ScenarioResult>,
}

impl RunReport {
    /// True when every scenario passed
    pub fn passed(&self) -> bool {
        self.scenarios
            .iter()
            .all(|scenario| scenario.outcome == Outcome::Pass)
    }
}

/// What the suite should exercise
#[derive(Debug, Clone)]
pub struct Plan {
    /// Key under test
    pub key: String,
    /// Override value to apply at each scope
    pub value: String,
    /// Scope for the region scenario; `None` skips it
    pub region_scope: Option<Scope>,
}

/// Run the full suite: controller scenario, then region scenario
///
/// A failing scenario does not short-circuit the remaining ones; every
/// outcome lands in the report.
pub fn assess_model_defaults(runner: &dyn CommandRunner, plan: &Plan) -> RunReport {
    let started_at = Utc::now();
    let mut scenarios = Vec::new();

    scenarios.push(ScenarioResult::from_run(
        "controller",
        assess_controller(runner, &plan.key, &plan.value),
    ));

    if let Some(scope) = &plan.region_scope {
        scenarios.push(ScenarioResult::from_run(
            &format!("region:{}", scope),
            assess_region(runner, &plan.key, &plan.value, scope),
        ));
    }

    RunReport {
        started_at,
        finished_at: Utc::now(),
        scenarios,
    }
}
