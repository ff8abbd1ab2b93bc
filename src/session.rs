//! Cluster session lifecycle port
//!
//! The scenario core assumes a pre-established session. This module is
//! the boundary for runs that bootstrap their own: a `Session` trait, an
//! implementation over the orchestrator CLI's lifecycle subcommands, and
//! a guard that tears the session down on every exit path.

use crate::client::CommandRunner;
use crate::error::AssayResult;

/// Cluster session lifecycle operations
///
/// Implementations:
/// - `ProcessSession` - the orchestrator CLI's lifecycle subcommands
/// - test fakes recording call order
pub trait Session {
    /// Acquire a running cluster session
    fn bootstrap(&self) -> AssayResult<()>;

    /// Provision a workload into the session
    fn deploy(&self, charm_id: &str) -> AssayResult<()>;

    /// Block until deployed workloads report ready
    fn wait_until_ready(&self) -> AssayResult<()>;

    /// Release the session and everything in it
    fn teardown(&self) -> AssayResult<()>;
}

/// Session backed by the orchestrator CLI
pub struct ProcessSession<'a> {
    runner: &'a dyn CommandRunner,
    controller: String,
}

impl<'a> ProcessSession<'a> {
    /// Create a session manager for the named controller
    pub fn new(runner: &'a dyn CommandRunner, controller: impl Into<String>) -> Self {
        Self {
            runner,
            controller: controller.into(),
        }
    }
}

impl Session for ProcessSession<'_> {
    fn bootstrap(&self) -> AssayResult<()> {
        self.runner.run("bootstrap", &[self.controller.clone()])
    }

    fn deploy(&self, charm_id: &str) -> AssayResult<()> {
        self.runner.run("deploy", &[charm_id.to_string()])
    }

    fn wait_until_ready(&self) -> AssayResult<()> {
        self.runner.run("wait-for", &[])
    }

    fn teardown(&self) -> AssayResult<()> {
        self.runner.run(
            "destroy-controller",
            &["--destroy-all-models".to_string(), self.controller.clone()],
        )
    }
}

/// Guard over a booted session; tears down on drop
///
/// Teardown failures are reported to stderr rather than panicking, so a
/// failing scenario still unwinds cleanly through the guard.
pub struct BootedContext<'a> {
    session: &'a dyn Session,
}

impl<'a> BootedContext<'a> {
    /// Bootstrap the session and return the teardown guard
    pub fn establish(session: &'a dyn Session) -> AssayResult<Self> {
        session.bootstrap()?;
        Ok(Self { session })
    }
}

impl Drop for BootedContext<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.session.teardown() {
            eprintln!("warning: session teardown failed: {}", err);
        }
    }
}
