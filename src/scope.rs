//! Scope value object - where a model-defaults operation applies
//!
//! - `Controller` scope: no positional argument, the controller default
//! - `Region` scope: a bare region name
//! - `CloudRegion` scope: a `cloud/region` pair
//!
//! A cloud without a region is invalid and is rejected at construction,
//! before any command is issued.

use std::fmt;

use crate::error::{AssayError, AssayResult};

/// Target scope of a model-defaults read or mutation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// Controller level; no positional scope argument
    #[default]
    Controller,
    /// A single region of the controller's cloud
    Region(String),
    /// An explicit cloud/region pair
    CloudRegion(String, String),
}

impl Scope {
    /// Build a scope from optional cloud and region names
    pub fn new(cloud: Option<&str>, region: Option<&str>) -> AssayResult<Self> {
        match (cloud, region) {
            (None, None) => Ok(Scope::Controller),
            (None, Some(region)) => Ok(Scope::Region(region.to_string())),
            (Some(cloud), Some(region)) => {
                Ok(Scope::CloudRegion(cloud.to_string(), region.to_string()))
            }
            (Some(cloud), None) => Err(AssayError::CloudWithoutRegion {
                cloud: cloud.to_string(),
            }),
        }
    }

    /// Render the zero-or-one positional CLI argument for this scope
    pub fn to_args(&self) -> Vec<String> {
        match self {
            Scope::Controller => Vec::new(),
            Scope::Region(region) => vec![region.clone()],
            Scope::CloudRegion(cloud, region) => vec![format!("{}/{}", cloud, region)],
        }
    }

    /// The region this scope names, if any
    pub fn region(&self) -> Option<&str> {
        match self {
            Scope::Controller => None,
            Scope::Region(region) => Some(region),
            Scope::CloudRegion(_, region) => Some(region),
        }
    }

    /// Returns true if this is the controller scope
    pub fn is_controller(&self) -> bool {
        matches!(self, Scope::Controller)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Controller => write!(f, "controller"),
            Scope::Region(region) => write!(f, "{}", region),
            Scope::CloudRegion(cloud, region) => write!(f, "{}/{}", cloud, region),
        }
    }
}
