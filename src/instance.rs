//! Input catalogs as produced by the instance generator.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InstanceError, PlanError};
use crate::geometry::Euclidean;
use crate::model::{Client, Vehicle, Warehouse};
use crate::planner::{plan, Plan, PlanOptions};

/// Warehouses, clients and vehicles of one planning run.
///
/// Unknown top-level keys in the JSON document are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(default)]
    pub warehouses: Vec<Warehouse>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

impl Instance {
    pub fn from_json(text: &str) -> Result<Self, InstanceError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, InstanceError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Plan with straight-line distances.
    pub fn plan(&self, options: PlanOptions) -> Result<Plan, PlanError> {
        plan(&self.warehouses, &self.clients, &self.vehicles, &Euclidean, options)
    }
}
