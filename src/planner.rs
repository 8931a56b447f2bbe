//! Routing planner: cluster clients among vehicles, then build one
//! capacity-aware route per vehicle.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use rayon::prelude::*;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::cluster::{Assignment, SpatialClusterer};
use crate::error::{PlanError, RouteError};
use crate::model::{Client, Point, Vehicle, VehicleId, Warehouse, WarehouseId};
use crate::route::{CapacityRouteBuilder, Route};
use crate::traits::DistanceMetric;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanOptions {
    /// Upper bound on clustering iterations.
    pub max_iterations: usize,
    /// Clustering stops once the summed center movement drops below this.
    pub tolerance: f64,
    /// Build vehicle routes on the rayon pool.
    pub parallel: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tolerance: 1e-2,
            parallel: true,
        }
    }
}

/// How the clustering phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClusterReport {
    pub iterations: usize,
    /// Summed center movement in the last iteration.
    pub total_shift: f64,
    /// False when the iteration cap was hit first.
    pub converged: bool,
}

/// Vehicle id to route, ordered by vehicle id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    routes: BTreeMap<VehicleId, Route>,
}

impl Solution {
    pub fn get(&self, vehicle_id: &VehicleId) -> Option<&Route> {
        self.routes.get(vehicle_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VehicleId, &Route)> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Bare point sequence per vehicle.
    pub fn points(&self) -> BTreeMap<VehicleId, Vec<Point>> {
        self.routes.iter().map(|(id, route)| (id.clone(), route.points())).collect()
    }
}

struct PointList<'a>(&'a Route);

impl Serialize for PointList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.stops.len()))?;
        for stop in &self.0.stops {
            seq.serialize_element(&[stop.location.x, stop.location.y])?;
        }
        seq.end()
    }
}

/// Serializes as `{vehicle_id: [[x, y], ...]}`.
impl Serialize for Solution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.routes.len()))?;
        for (id, route) in &self.routes {
            map.serialize_entry(id, &PointList(route))?;
        }
        map.end()
    }
}

#[derive(Debug, Clone)]
pub struct Plan {
    /// Routes of every vehicle that finished construction.
    pub solution: Solution,
    /// Final clustering assignment.
    pub assignment: Assignment,
    /// Vehicles whose construction aborted; they have no route.
    pub failures: Vec<RouteError>,
    pub clustering: ClusterReport,
}

pub fn plan<M>(
    warehouses: &[Warehouse],
    clients: &[Client],
    vehicles: &[Vehicle],
    metric: &M,
    options: PlanOptions,
) -> Result<Plan, PlanError>
where
    M: DistanceMetric,
{
    let warehouse_index = validate(warehouses, clients, vehicles)?;
    info!(
        vehicles = vehicles.len(),
        clients = clients.len(),
        warehouses = warehouses.len(),
        "planning routes"
    );

    let homes: BTreeMap<VehicleId, Point> = vehicles
        .iter()
        .map(|vehicle| (vehicle.id.clone(), warehouse_index[&vehicle.warehouse_id].location))
        .collect();

    let (assignment, clustering) = cluster(clients, &homes, metric, &options);

    let client_index: HashMap<_, _> = clients.iter().map(|client| (&client.id, client)).collect();
    let build_one = |vehicle: &Vehicle| -> Result<Route, RouteError> {
        let home = warehouse_index[&vehicle.warehouse_id];
        let assigned: Vec<&Client> = assignment
            .get(&vehicle.id)
            .map(|ids| ids.iter().filter_map(|id| client_index.get(id).copied()).collect())
            .unwrap_or_default();

        CapacityRouteBuilder::new(vehicle, home, warehouses, metric).build(&assigned)
    };

    let results: Vec<Result<Route, RouteError>> = if options.parallel {
        vehicles.par_iter().map(build_one).collect()
    } else {
        vehicles.iter().map(build_one).collect()
    };

    let mut solution = Solution::default();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(route) => {
                solution.routes.insert(route.vehicle_id.clone(), route);
            }
            Err(err) => {
                warn!(vehicle = %err.vehicle(), error = %err, "route construction failed");
                failures.push(err);
            }
        }
    }
    failures.sort_by(|a, b| a.vehicle().cmp(b.vehicle()));

    Ok(Plan {
        solution,
        assignment,
        failures,
        clustering,
    })
}

/// Run assign/update rounds until the centers settle or the cap is hit.
/// At least one round always runs.
fn cluster<M: DistanceMetric>(
    clients: &[Client],
    homes: &BTreeMap<VehicleId, Point>,
    metric: &M,
    options: &PlanOptions,
) -> (Assignment, ClusterReport) {
    let clusterer = SpatialClusterer::new(clients, homes, metric);
    let max_iterations = options.max_iterations.max(1);

    let mut centers = clusterer.seed();
    let mut assignment = Assignment::new();
    let mut report = ClusterReport {
        iterations: 0,
        total_shift: f64::INFINITY,
        converged: false,
    };

    for iteration in 0..max_iterations {
        assignment = clusterer.assign(&centers);
        let (next, shift) = clusterer.update_centers(&assignment, &centers);
        centers = next;

        report.iterations = iteration + 1;
        report.total_shift = shift;
        debug!(iteration, shift, "clustering iteration");

        if shift < options.tolerance {
            report.converged = true;
            break;
        }
    }

    if !report.converged {
        warn!(
            iterations = report.iterations,
            shift = report.total_shift,
            tolerance = options.tolerance,
            "clustering did not converge, using last assignment"
        );
    }

    (assignment, report)
}

fn validate<'a>(
    warehouses: &'a [Warehouse],
    clients: &[Client],
    vehicles: &[Vehicle],
) -> Result<HashMap<&'a WarehouseId, &'a Warehouse>, PlanError> {
    if vehicles.is_empty() {
        return Err(PlanError::EmptyFleet);
    }
    if warehouses.is_empty() {
        return Err(PlanError::EmptyWarehouses);
    }

    check_unique("warehouse", warehouses.iter().map(|w| &w.id))?;
    check_unique("client", clients.iter().map(|c| &c.id))?;
    check_unique("vehicle", vehicles.iter().map(|v| &v.id))?;

    let index: HashMap<_, _> = warehouses.iter().map(|w| (&w.id, w)).collect();
    for vehicle in vehicles {
        if !vehicle.capacity.is_finite() || vehicle.capacity <= 0.0 {
            return Err(PlanError::InvalidCapacity {
                vehicle: vehicle.id.clone(),
                capacity: vehicle.capacity,
            });
        }
        if !index.contains_key(&vehicle.warehouse_id) {
            return Err(PlanError::UnknownWarehouse {
                vehicle: vehicle.id.clone(),
                warehouse: vehicle.warehouse_id.clone(),
            });
        }
    }

    Ok(index)
}

fn check_unique<'a, T, I>(kind: &'static str, ids: I) -> Result<(), PlanError>
where
    T: Eq + Hash + ToString + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(PlanError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
