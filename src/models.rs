//! Core data model for Assay
//!
//! Defines `ModelDefault`, the layered value of a single model-defaults
//! key as reported by the orchestrator CLI:
//! - `default`: the fallback value, used when no override applies
//! - `controller`: an optional controller-scope override
//! - `regions`: ordered per-region overrides
//!
//! Values are constructed fresh from each CLI response (`from_mapping`)
//! or synthesized by the scenario driver to express an expected
//! post-mutation state (`assemble`); they are never mutated in place.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml_ng::{Mapping, Value};

use crate::error::{AssayError, AssayResult};

/// One region's override within a model default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDefault {
    /// Region name (e.g. "localhost", "us-east-1")
    pub name: String,

    /// Override value applied in that region
    pub value: Value,
}

/// The recognized layers of one model-defaults key
///
/// Every layer is explicitly optional: a controller value of `false` is a
/// different state from an unset controller layer. Fields the CLI reports
/// beyond these three are ignored on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Layers {
    /// Fallback value when no override applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Controller-scope override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<Value>,

    /// Ordered region overrides. At most one entry per distinct name;
    /// duplicates are a caller error and are not validated here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<RegionDefault>,
}

/// Layered value of a single model-defaults key
///
/// Equality is structural over the key and all layers and is
/// order-sensitive for `regions`: two values differing only in region
/// order compare unequal. Callers assembling expected values must use the
/// order the CLI reports.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefault {
    key: String,
    layers: Layers,
}

impl ModelDefault {
    /// Create a value from a key and explicit layers
    pub fn new(key: impl Into<String>, layers: Layers) -> Self {
        Self {
            key: key.into(),
            layers,
        }
    }

    /// Decode a value from a single-entry response mapping `{key: layers}`
    ///
    /// The mapping must contain exactly one top-level entry; zero or
    /// several entries is a decode error rather than an arbitrary pick.
    pub fn from_mapping(doc: Value) -> AssayResult<Self> {
        let map = match doc {
            Value::Mapping(map) => map,
            _ => return Err(AssayError::NotAMapping),
        };
        if map.len() > 1 {
            return Err(AssayError::AmbiguousDefaults { count: map.len() });
        }
        let (key, layers) = map.into_iter().next().ok_or(AssayError::EmptyDefaults)?;
        let key = match key {
            Value::String(key) => key,
            _ => return Err(AssayError::KeyNotString),
        };
        let layers: Layers = serde_yaml_ng::from_value(layers)?;
        Ok(Self { key, layers })
    }

    /// Encode back to the single-entry mapping `{key: layers}`
    ///
    /// Inverse of [`from_mapping`](Self::from_mapping); lossless for all
    /// recognized fields. Absent layers stay absent in the output.
    pub fn to_mapping(&self) -> AssayResult<Value> {
        let mut map = Mapping::new();
        map.insert(
            Value::String(self.key.clone()),
            serde_yaml_ng::to_value(&self.layers)?,
        );
        Ok(Value::Mapping(map))
    }

    /// Build an expected value from its parts
    ///
    /// `controller` is present iff `Some`; `regions` is present iff
    /// non-empty, with entries in the order given (no sorting).
    pub fn assemble(
        key: impl Into<String>,
        default: Option<Value>,
        controller: Option<Value>,
        regions: Vec<(String, Value)>,
    ) -> Self {
        let regions = regions
            .into_iter()
            .map(|(name, value)| RegionDefault { name, value })
            .collect();
        Self {
            key: key.into(),
            layers: Layers {
                default,
                controller,
                regions,
            },
        }
    }

    /// The configuration key this value describes
    pub fn key(&self) -> &str {
        &self.key
    }

    /// All layers of this value
    pub fn layers(&self) -> &Layers {
        &self.layers
    }

    /// The `default` layer, if set
    pub fn default(&self) -> Option<&Value> {
        self.layers.default.as_ref()
    }

    /// The `controller` layer, if set
    pub fn controller(&self) -> Option<&Value> {
        self.layers.controller.as_ref()
    }

    /// The override for the named region, if present
    ///
    /// Linear scan; first match by name wins.
    pub fn region(&self, name: &str) -> Option<&Value> {
        self.layers
            .regions
            .iter()
            .find(|region| region.name == name)
            .map(|region| &region.value)
    }
}

impl fmt::Display for ModelDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {{", self.key)?;
        let mut sep = "";
        if let Some(value) = &self.layers.default {
            write!(f, "default: ")?;
            fmt_value(value, f)?;
            sep = ", ";
        }
        if let Some(value) = &self.layers.controller {
            write!(f, "{}controller: ", sep)?;
            fmt_value(value, f)?;
            sep = ", ";
        }
        if !self.layers.regions.is_empty() {
            write!(f, "{}regions: [", sep)?;
            let mut inner = "";
            for region in &self.layers.regions {
                write!(f, "{}{}: ", inner, region.name)?;
                fmt_value(&region.value, f)?;
                inner = ", ";
            }
            write!(f, "]")?;
        }
        write!(f, "}}")
    }
}

/// Render a YAML value on one line, quoting strings so that a boolean
/// `false` and the string `"false"` stay distinguishable in diagnostics.
fn fmt_value(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::Null => write!(f, "null"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Number(n) => write!(f, "{}", n),
        Value::String(s) => write!(f, "\"{}\"", s),
        other => match serde_yaml_ng::to_string(other) {
            Ok(rendered) => write!(f, "{}", rendered.trim_end()),
            Err(_) => write!(f, "<unrenderable>"),
        },
    }
}
