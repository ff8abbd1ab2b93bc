//! Common test utilities for Assay scenario tests.
//!
//! This module provides `FakeController`: an in-memory model-defaults
//! backend implementing `CommandRunner`. It parses the same argument
//! vectors the client adapter builds, applies layer semantics to an
//! explicit store owned by the test, and answers reads with the YAML
//! the real CLI would print. No process-wide state.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use serde_yaml_ng::Value;

use assay::client::CommandRunner;
use assay::error::{AssayError, AssayResult};
use assay::models::{Layers, RegionDefault};

/// In-memory layered model-defaults store behind the CLI surface
pub struct FakeController {
    store: Mutex<BTreeMap<String, Layers>>,
    /// Region names the fake recognizes as scope arguments
    regions: HashSet<String>,
    /// Every invocation, for argument-vector assertions
    log: Mutex<Vec<(String, Vec<String>)>>,
    /// When set, mutations are accepted but never applied
    drop_writes: bool,
}

#[allow(dead_code)] // Not every test binary uses every helper.
impl FakeController {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(BTreeMap::new()),
            regions: ["localhost".to_string()].into_iter().collect(),
            log: Mutex::new(Vec::new()),
            drop_writes: false,
        }
    }

    /// Seed `{key: {default: value}}`, the usual baseline shape
    pub fn with_default(key: &str, default: Value) -> Self {
        let fake = Self::new();
        fake.seed(
            key,
            Layers {
                default: Some(default),
                ..Layers::default()
            },
        );
        fake
    }

    /// Teach the fake an extra region name
    pub fn with_region(mut self, region: &str) -> Self {
        self.regions.insert(region.to_string());
        self
    }

    /// Accept mutations without applying them (failure-path tests)
    pub fn dropping_writes(mut self) -> Self {
        self.drop_writes = true;
        self
    }

    /// Insert a key with explicit layers
    pub fn seed(&self, key: &str, layers: Layers) {
        self.store
            .lock()
            .unwrap()
            .insert(key.to_string(), layers);
    }

    /// Snapshot of the layers currently stored for a key
    pub fn layers(&self, key: &str) -> Option<Layers> {
        self.store.lock().unwrap().get(key).cloned()
    }

    /// Every invocation seen so far
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.log.lock().unwrap().clone()
    }

    /// Treat an argument as a scope when it names a known region or a
    /// cloud/region pair; returns the region part.
    fn scope_region(&self, arg: &str) -> Option<String> {
        if let Some((_cloud, region)) = arg.split_once('/') {
            return Some(region.to_string());
        }
        if self.regions.contains(arg) {
            Some(arg.to_string())
        } else {
            None
        }
    }

    /// Split a leading scope argument off the positional args
    fn split_scope<'a>(&self, args: &'a [String]) -> (Option<String>, &'a [String]) {
        match args.split_first() {
            Some((head, tail)) => match self.scope_region(head) {
                Some(region) => (Some(region), tail),
                None => (None, args),
            },
            None => (None, args),
        }
    }

    fn render<T: serde::Serialize>(map: &T) -> AssayResult<String> {
        Ok(serde_yaml_ng::to_string(map)?)
    }
}

impl CommandRunner for FakeController {
    fn get_output(&self, command: &str, args: &[String]) -> AssayResult<String> {
        self.log
            .lock()
            .unwrap()
            .push((command.to_string(), args.to_vec()));

        if command != "model-defaults" {
            return Err(AssayError::CommandFailed {
                command: command.to_string(),
                status: 2,
                stderr: format!("unknown read command '{}'", command),
            });
        }

        let mut rest: &[String] = args;
        if rest.first().map(String::as_str) == Some("--format") && rest.len() >= 2 {
            rest = &rest[2..];
        }
        let (_region, rest) = self.split_scope(rest);

        let store = self.store.lock().unwrap();
        match rest.split_first() {
            None => Self::render(&*store),
            Some((key, _)) => {
                let mut single = BTreeMap::new();
                if let Some(layers) = store.get(key) {
                    single.insert(key.clone(), layers.clone());
                }
                Self::render(&single)
            }
        }
    }

    fn run(&self, command: &str, args: &[String]) -> AssayResult<()> {
        self.log
            .lock()
            .unwrap()
            .push((command.to_string(), args.to_vec()));

        if command != "model-defaults" {
            // Lifecycle commands (bootstrap, deploy, ...) are accepted
            // silently; the log records them for assertions.
            return Ok(());
        }
        if self.drop_writes {
            return Ok(());
        }

        let (region, rest) = self.split_scope(args);
        let mut store = self.store.lock().unwrap();

        match rest {
            [flag, key] if flag == "--reset" => {
                if let Some(layers) = store.get_mut(key.as_str()) {
                    match &region {
                        None => layers.controller = None,
                        Some(region) => layers.regions.retain(|entry| entry.name != *region),
                    }
                }
                Ok(())
            }
            [pair] if pair.contains('=') => {
                let (key, value) = pair
                    .split_once('=')
                    .expect("checked for '=' above");
                let layers = store.entry(key.to_string()).or_default();
                let value = Value::String(value.to_string());
                match &region {
                    None => layers.controller = Some(value),
                    Some(region) => {
                        match layers.regions.iter_mut().find(|entry| entry.name == *region) {
                            Some(existing) => existing.value = value,
                            None => layers.regions.push(RegionDefault {
                                name: region.clone(),
                                value,
                            }),
                        }
                    }
                }
                Ok(())
            }
            _ => Err(AssayError::CommandFailed {
                command: format!("model-defaults {}", args.join(" ")),
                status: 2,
                stderr: "unrecognized mutation".to_string(),
            }),
        }
    }
}
