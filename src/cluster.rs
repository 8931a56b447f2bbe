//! Spatial partition of clients among vehicles.
//!
//! Lloyd's-style iteration: every client goes to the vehicle with the
//! nearest center, then each center moves to the centroid of its clients
//! plus its home warehouse. Centers are plain values passed in and returned,
//! so one iteration can be exercised on its own.

use std::collections::{BTreeMap, HashMap};

use crate::geometry::centroid;
use crate::model::{Client, ClientId, Point, VehicleId};
use crate::traits::DistanceMetric;

/// Working point per vehicle.
pub type Centers = BTreeMap<VehicleId, Point>;

/// Clients currently nearest to each vehicle's center, in catalog order.
/// Every vehicle has an entry, possibly empty.
pub type Assignment = BTreeMap<VehicleId, Vec<ClientId>>;

#[derive(Debug)]
pub struct SpatialClusterer<'a, M: DistanceMetric> {
    clients: &'a [Client],
    index: HashMap<&'a ClientId, &'a Client>,
    homes: &'a BTreeMap<VehicleId, Point>,
    metric: &'a M,
}

impl<'a, M: DistanceMetric> SpatialClusterer<'a, M> {
    /// `homes` maps each vehicle to its home warehouse location.
    pub fn new(clients: &'a [Client], homes: &'a BTreeMap<VehicleId, Point>, metric: &'a M) -> Self {
        let index = clients.iter().map(|client| (&client.id, client)).collect();
        Self {
            clients,
            index,
            homes,
            metric,
        }
    }

    /// Initial centers: every vehicle starts at its home warehouse.
    pub fn seed(&self) -> Centers {
        self.homes.clone()
    }

    /// Give every client to the vehicle whose center is nearest. Ties go to
    /// the lowest vehicle id.
    pub fn assign(&self, centers: &Centers) -> Assignment {
        let mut assignment: Assignment = centers.keys().map(|id| (id.clone(), Vec::new())).collect();

        for client in self.clients {
            let mut best: Option<(&VehicleId, f64)> = None;
            for (vehicle_id, center) in centers {
                let dist = self.metric.distance(client.location, *center);
                // Strict comparison keeps the first (lowest) id on ties
                if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                    best = Some((vehicle_id, dist));
                }
            }

            if let Some((vehicle_id, _)) = best {
                if let Some(clients) = assignment.get_mut(vehicle_id) {
                    clients.push(client.id.clone());
                }
            }
        }

        assignment
    }

    /// Move each center to the centroid of its assigned clients plus its
    /// home warehouse. Returns the new centers and the summed movement.
    pub fn update_centers(&self, assignment: &Assignment, centers: &Centers) -> (Centers, f64) {
        let mut new_centers = Centers::new();
        let mut total_shift = 0.0;

        for (vehicle_id, client_ids) in assignment {
            let Some(home) = self.homes.get(vehicle_id).copied() else {
                continue;
            };

            let points = client_ids
                .iter()
                .filter_map(|id| self.index.get(id))
                .map(|client| client.location)
                .chain(std::iter::once(home));
            // The home point is always present, so the centroid exists
            let center = centroid(points).unwrap_or(home);

            let previous = centers.get(vehicle_id).copied().unwrap_or(home);
            total_shift += self.metric.distance(previous, center);
            new_centers.insert(vehicle_id.clone(), center);
        }

        (new_centers, total_shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Euclidean;
    use crate::model::Demand;

    fn client(id: &str, x: f64, y: f64) -> Client {
        Client::new(id, x, y, Demand::new())
    }

    fn homes(entries: &[(&str, f64, f64)]) -> BTreeMap<VehicleId, Point> {
        entries
            .iter()
            .map(|(id, x, y)| (VehicleId::new(*id), Point::new(*x, *y)))
            .collect()
    }

    #[test]
    fn test_assign_to_nearest_center() {
        let clients = vec![client("C0", 1.0, 0.0), client("C1", 9.0, 0.0), client("C2", 6.0, 0.0)];
        let homes = homes(&[("V0", 0.0, 0.0), ("V1", 10.0, 0.0)]);
        let clusterer = SpatialClusterer::new(&clients, &homes, &Euclidean);

        let assignment = clusterer.assign(&clusterer.seed());

        assert_eq!(assignment[&VehicleId::new("V0")], vec![ClientId::new("C0")]);
        assert_eq!(
            assignment[&VehicleId::new("V1")],
            vec![ClientId::new("C1"), ClientId::new("C2")]
        );
    }

    #[test]
    fn test_assign_tie_goes_to_lowest_vehicle_id() {
        let clients = vec![client("C0", 5.0, 0.0)];
        let homes = homes(&[("V1", 10.0, 0.0), ("V0", 0.0, 0.0)]);
        let clusterer = SpatialClusterer::new(&clients, &homes, &Euclidean);

        let assignment = clusterer.assign(&clusterer.seed());

        assert_eq!(assignment[&VehicleId::new("V0")], vec![ClientId::new("C0")]);
        assert!(assignment[&VehicleId::new("V1")].is_empty());
    }

    #[test]
    fn test_update_includes_home_point() {
        let clients = vec![client("C0", 6.0, 0.0), client("C1", 0.0, 6.0)];
        let homes = homes(&[("V0", 0.0, 0.0)]);
        let clusterer = SpatialClusterer::new(&clients, &homes, &Euclidean);

        let centers = clusterer.seed();
        let assignment = clusterer.assign(&centers);
        let (new_centers, shift) = clusterer.update_centers(&assignment, &centers);

        let center = new_centers[&VehicleId::new("V0")];
        assert!((center.x - 2.0).abs() < 1e-12);
        assert!((center.y - 2.0).abs() < 1e-12);
        assert!((shift - 8.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_cluster_returns_home() {
        let clients = vec![client("C0", 1.0, 1.0)];
        let homes = homes(&[("V0", 0.0, 0.0), ("V1", 50.0, 50.0)]);
        let clusterer = SpatialClusterer::new(&clients, &homes, &Euclidean);

        let mut centers = clusterer.seed();
        centers.insert(VehicleId::new("V1"), Point::new(40.0, 50.0));
        let assignment = clusterer.assign(&centers);
        let (new_centers, shift) = clusterer.update_centers(&assignment, &centers);

        assert_eq!(new_centers[&VehicleId::new("V1")], Point::new(50.0, 50.0));
        // V1 moved back 10, V0 moved half-way to C0
        let expected = 10.0 + 0.5_f64.hypot(0.5);
        assert!((shift - expected).abs() < 1e-12);
    }

    #[test]
    fn test_fixed_point_has_zero_shift() {
        let clients = vec![client("C0", 2.0, 0.0)];
        let homes = homes(&[("V0", 0.0, 0.0)]);
        let clusterer = SpatialClusterer::new(&clients, &homes, &Euclidean);

        let centers = clusterer.seed();
        let (centers, _) = clusterer.update_centers(&clusterer.assign(&centers), &centers);
        let (_, shift) = clusterer.update_centers(&clusterer.assign(&centers), &centers);

        assert_eq!(shift, 0.0);
    }
}
