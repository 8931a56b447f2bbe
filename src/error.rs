//! Error types for planning and catalog loading.

use std::fmt::{self, Display};

use crate::model::{ClientId, VehicleId, WarehouseId};

/// Route construction for one vehicle could not finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// A full unload-and-reload cycle served nobody. The listed clients can
    /// never fit in the vehicle.
    InfeasibleClient {
        vehicle: VehicleId,
        clients: Vec<ClientId>,
    },
}

impl RouteError {
    pub fn vehicle(&self) -> &VehicleId {
        match self {
            Self::InfeasibleClient { vehicle, .. } => vehicle,
        }
    }
}

impl Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InfeasibleClient { vehicle, clients } => {
                let ids = clients.iter().map(ClientId::as_str).collect::<Vec<_>>().join(", ");
                write!(f, "Vehicle {} cannot serve clients [{}] within its capacity", vehicle, ids)
            }
        }
    }
}

impl std::error::Error for RouteError {}

/// The catalogs are unusable; reported before any clustering.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    EmptyFleet,
    EmptyWarehouses,
    UnknownWarehouse {
        vehicle: VehicleId,
        warehouse: WarehouseId,
    },
    InvalidCapacity {
        vehicle: VehicleId,
        capacity: f64,
    },
    DuplicateId {
        kind: &'static str,
        id: String,
    },
}

impl Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFleet => write!(f, "No vehicles to plan for"),
            Self::EmptyWarehouses => write!(f, "No warehouses to plan from"),
            Self::UnknownWarehouse { vehicle, warehouse } => {
                write!(f, "Vehicle {} is based at unknown warehouse {}", vehicle, warehouse)
            }
            Self::InvalidCapacity { vehicle, capacity } => {
                write!(f, "Vehicle {} has invalid capacity {}", vehicle, capacity)
            }
            Self::DuplicateId { kind, id } => write!(f, "Duplicate {} id '{}'", kind, id),
        }
    }
}

impl std::error::Error for PlanError {}

/// Failure to read an instance catalog.
#[derive(Debug)]
pub enum InstanceError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for InstanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for InstanceError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for InstanceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
