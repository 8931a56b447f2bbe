//! Capacity-aware route construction for a single vehicle.
//!
//! The builder walks the vehicle's clients nearest-feasible-first while
//! tracking a per-good inventory. When nobody can be served it drops by
//! the nearest warehouse, unloads everything and restocks for the
//! deliveries that still fit, then for the delivered goods of mostly-pickup
//! clients.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::RouteError;
use crate::inventory::{self, Inventory};
use crate::model::{Client, ClientId, Demand, Point, Vehicle, VehicleId, Warehouse, WarehouseId};
use crate::traits::DistanceMetric;

/// What happens at a stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StopKind {
    /// Start, end, or mid-route reload at a warehouse.
    Depot(WarehouseId),
    Client(ClientId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub kind: StopKind,
    pub location: Point,
    /// Load on board when leaving the stop.
    pub load: Inventory,
}

/// Ordered stops of one vehicle, starting and ending at its home warehouse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub vehicle_id: VehicleId,
    pub stops: Vec<Stop>,
}

impl Route {
    /// Bare point sequence, warehouse revisits included.
    pub fn points(&self) -> Vec<Point> {
        self.stops.iter().map(|stop| stop.location).collect()
    }

    /// Clients in visiting order.
    pub fn client_ids(&self) -> impl Iterator<Item = &ClientId> {
        self.stops.iter().filter_map(|stop| match &stop.kind {
            StopKind::Client(id) => Some(id),
            StopKind::Depot(_) => None,
        })
    }

    /// Number of warehouse stops strictly between the start and the end.
    pub fn reloads(&self) -> usize {
        let inner = self.stops.len().saturating_sub(2);
        self.stops
            .iter()
            .skip(1)
            .take(inner)
            .filter(|stop| matches!(stop.kind, StopKind::Depot(_)))
            .count()
    }

    /// Travelled length under the given metric.
    pub fn distance<M: DistanceMetric>(&self, metric: &M) -> f64 {
        self.stops
            .windows(2)
            .map(|pair| metric.distance(pair[0].location, pair[1].location))
            .sum()
    }
}

fn by_distance_then_id(a: &(usize, f64, &ClientId), b: &(usize, f64, &ClientId)) -> Ordering {
    a.1.total_cmp(&b.1).then_with(|| a.2.cmp(b.2))
}

fn lightest_delivery_first(a: &&Client, b: &&Client) -> Ordering {
    a.demand
        .delivery_weight()
        .total_cmp(&b.demand.delivery_weight())
        .then_with(|| a.id.cmp(&b.id))
}

/// Builds one vehicle's route from the clients assigned to it.
pub struct CapacityRouteBuilder<'a, M: DistanceMetric> {
    vehicle: &'a Vehicle,
    home: &'a Warehouse,
    warehouses: &'a [Warehouse],
    metric: &'a M,
}

/// Working state for one build.
struct RouteState<'a> {
    unserved: Vec<&'a Client>,
    inventory: Inventory,
    location: Point,
    stops: Vec<Stop>,
}

impl<'a, M: DistanceMetric> CapacityRouteBuilder<'a, M> {
    pub fn new(vehicle: &'a Vehicle, home: &'a Warehouse, warehouses: &'a [Warehouse], metric: &'a M) -> Self {
        Self {
            vehicle,
            home,
            warehouses,
            metric,
        }
    }

    pub fn build(&self, clients: &[&'a Client]) -> Result<Route, RouteError> {
        let vehicle_id = &self.vehicle.id;
        info!(vehicle = %vehicle_id, clients = clients.len(), "building route");

        let mut wanted = Demand::new();
        for client in clients {
            for (good, quantity) in client.demand.iter() {
                if quantity > 0.0 {
                    wanted[good] += quantity;
                }
            }
        }

        let inventory = Inventory::preload(self.vehicle.capacity, &wanted);
        debug!(vehicle = %vehicle_id, load = %inventory, headroom = inventory.headroom(), "initial load");

        let mut unserved = clients.to_vec();
        unserved.sort_by(|a, b| a.id.cmp(&b.id));

        let mut state = RouteState {
            unserved,
            inventory,
            location: self.home.location,
            stops: vec![Stop {
                kind: StopKind::Depot(self.home.id.clone()),
                location: self.home.location,
                load: inventory,
            }],
        };

        // The preload counts as a stocking pass of its own
        let mut served_since_reload = true;

        while !state.unserved.is_empty() {
            if let Some(index) = self.nearest_feasible(&state) {
                if self.try_serve(&mut state, index) {
                    served_since_reload = true;
                    continue;
                }
            }

            let Some(nearest_client) = self.nearest_unserved(&state) else {
                break;
            };
            let (warehouse, warehouse_dist) = self.nearest_warehouse(state.location);
            let client_dist = self
                .metric
                .distance(state.location, state.unserved[nearest_client].location);

            // Only succeeds if `can_serve` and `try_apply` ever disagree
            if client_dist < warehouse_dist && self.try_serve(&mut state, nearest_client) {
                served_since_reload = true;
                continue;
            }

            if !served_since_reload {
                let stranded = self.stranded(&state.unserved);
                warn!(vehicle = %vehicle_id, stranded = stranded.len(), "no progress after reload");
                return Err(RouteError::InfeasibleClient {
                    vehicle: vehicle_id.clone(),
                    clients: stranded,
                });
            }

            self.reload(&mut state, warehouse);
            served_since_reload = false;
        }

        if state.location != self.home.location {
            state.stops.push(Stop {
                kind: StopKind::Depot(self.home.id.clone()),
                location: self.home.location,
                load: state.inventory,
            });
        }

        Ok(Route {
            vehicle_id: vehicle_id.clone(),
            stops: state.stops,
        })
    }

    /// Index of the nearest servable client; ties go to the lowest id.
    fn nearest_feasible(&self, state: &RouteState<'_>) -> Option<usize> {
        state
            .unserved
            .iter()
            .enumerate()
            .filter(|(_, client)| state.inventory.can_serve(&client.demand))
            .map(|(i, client)| (i, self.metric.between(&state.location, *client), &client.id))
            .min_by(by_distance_then_id)
            .map(|(i, _, _)| i)
    }

    fn nearest_unserved(&self, state: &RouteState<'_>) -> Option<usize> {
        state
            .unserved
            .iter()
            .enumerate()
            .map(|(i, client)| (i, self.metric.between(&state.location, *client), &client.id))
            .min_by(by_distance_then_id)
            .map(|(i, _, _)| i)
    }

    /// Nearest warehouse of any vehicle; ties go to the lowest id. Falls back
    /// to home when the catalog is empty.
    fn nearest_warehouse(&self, from: Point) -> (&'a Warehouse, f64) {
        self.warehouses
            .iter()
            .map(|warehouse| (warehouse, self.metric.between(&from, warehouse)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)))
            .unwrap_or_else(|| (self.home, self.metric.between(&from, self.home)))
    }

    /// Visit `unserved[index]` if its whole demand fits. Returns whether the
    /// client was served.
    fn try_serve(&self, state: &mut RouteState<'a>, index: usize) -> bool {
        let client = state.unserved[index];
        if !state.inventory.try_apply(&client.demand) {
            return false;
        }
        state.unserved.remove(index);

        state.location = client.location;
        state.stops.push(Stop {
            kind: StopKind::Client(client.id.clone()),
            location: client.location,
            load: state.inventory,
        });

        let action = if client.is_pickup() { "picked up" } else { "delivered" };
        debug!(
            vehicle = %self.vehicle.id,
            client = %client.id,
            load = %state.inventory,
            "{action}"
        );
        true
    }

    /// Unload everything at `warehouse`, then restock for the lightest
    /// deliveries that fit. Leftover room goes to the delivered goods of
    /// mostly-pickup clients, keeping enough headroom that each one stocked
    /// for can still take its pickup. Pure pickups are never stocked for.
    fn reload(&self, state: &mut RouteState<'a>, warehouse: &Warehouse) {
        state.inventory.unload();

        let (mut deliveries, mut mixed): (Vec<&Client>, Vec<&Client>) = state
            .unserved
            .iter()
            .copied()
            .filter(|c| c.demand.delivery_weight() > 0.0)
            .partition(|c| !c.is_pickup());
        deliveries.sort_by(lightest_delivery_first);
        mixed.sort_by(lightest_delivery_first);

        let mut cap_left = self.vehicle.capacity;
        let mut stocked = Vec::new();
        for client in deliveries {
            let weight = client.demand.delivery_weight();
            if inventory::fits(weight, cap_left) {
                state.inventory.stock_for(&client.demand);
                cap_left -= weight;
                stocked.push(client.id.as_str());
            }
        }

        // Largest net pickup among the mixed clients stocked so far
        let mut growth: f64 = 0.0;
        for client in mixed {
            let weight = client.demand.delivery_weight();
            let next_growth = growth.max(-client.demand.net());
            if inventory::fits(weight + next_growth, cap_left) {
                state.inventory.stock_for(&client.demand);
                cap_left -= weight;
                growth = next_growth;
                stocked.push(client.id.as_str());
            }
        }

        state.location = warehouse.location;
        state.stops.push(Stop {
            kind: StopKind::Depot(warehouse.id.clone()),
            location: warehouse.location,
            load: state.inventory,
        });

        info!(
            vehicle = %self.vehicle.id,
            warehouse = %warehouse.id,
            stocked = ?stocked,
            load = %state.inventory,
            "reloaded"
        );
    }

    /// Clients that cannot fit on this vehicle on their own, or every
    /// unserved client when none of them is individually too large.
    fn stranded(&self, unserved: &[&Client]) -> Vec<ClientId> {
        let capacity = self.vehicle.capacity;
        let oversized: Vec<ClientId> = unserved
            .iter()
            .filter(|c| {
                c.demand.delivery_weight() > capacity
                    || c.demand.pickup_weight() > capacity
                    || c.demand.max_magnitude() > capacity
            })
            .map(|c| c.id.clone())
            .collect();

        if oversized.is_empty() {
            unserved.iter().map(|c| c.id.clone()).collect()
        } else {
            oversized
        }
    }
}
