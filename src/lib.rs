//! Assay - functional-test harness for cluster model-defaults
//!
//! Assay drives the model-defaults surface of a cluster-orchestration
//! CLI: read a key's layered value (default / controller / per-region
//! overrides), set an override at a scope, verify the freshly reported
//! layers, reset, and verify the baseline is restored exactly.

pub mod assess;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod scope;
pub mod session;
pub mod ui;

// Re-exports for convenience
pub use assess::{
    assess_controller, assess_model_defaults, assess_region, assert_defaults_equal, Outcome, Plan,
    RunReport, ScenarioResult,
};
pub use client::{
    get_model_defaults, list_model_defaults, set_model_defaults, unset_model_defaults,
    CommandRunner, ProcessRunner,
};
pub use config::{Config, Verbosity};
pub use error::{AssayError, AssayResult};
pub use models::{Layers, ModelDefault, RegionDefault};
pub use scope::Scope;
pub use session::{BootedContext, ProcessSession, Session};
