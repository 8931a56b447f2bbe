//! Domain records: points, warehouses, goods, clients and vehicles.
//!
//! The record shapes follow the catalogs handed over by the instance
//! generator. Identifiers may arrive as strings or integers on the wire.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::traits::Located;

/// A point on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Located for Point {
    fn location(&self) -> Point {
        *self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl RawId {
    fn into_text(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_text()))
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Warehouse identifier.
    WarehouseId
);
string_id!(
    /// Client identifier.
    ClientId
);
string_id!(
    /// Vehicle identifier.
    VehicleId
);

/// Commodity kinds shared by every client and vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoodType {
    Oranges,
    Uranium,
    Tuna,
}

impl GoodType {
    pub const COUNT: usize = 3;

    /// Fixed enumeration order used for preloading.
    pub const ALL: [GoodType; Self::COUNT] = [GoodType::Oranges, GoodType::Uranium, GoodType::Tuna];

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for GoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GoodType::Oranges => "oranges",
            GoodType::Uranium => "uranium",
            GoodType::Tuna => "tuna",
        };
        f.write_str(name)
    }
}

/// Signed quantity per good.
///
/// Positive entries are deliveries (the vehicle hands goods over), negative
/// entries are pickups (the vehicle takes goods on board). Goods missing
/// from the wire map are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<GoodType, f64>", into = "BTreeMap<GoodType, f64>")]
pub struct Demand([f64; GoodType::COUNT]);

impl Demand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, good: GoodType, quantity: f64) -> Self {
        self[good] = quantity;
        self
    }

    /// Iterate `(good, quantity)` in enumeration order, zero entries included.
    pub fn iter(&self) -> impl Iterator<Item = (GoodType, f64)> + '_ {
        GoodType::ALL.into_iter().map(|good| (good, self[good]))
    }

    /// Sum of all signed entries.
    pub fn net(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Total quantity to hand over to the client.
    pub fn delivery_weight(&self) -> f64 {
        self.0.iter().filter(|q| **q > 0.0).sum()
    }

    /// Total quantity to take from the client.
    pub fn pickup_weight(&self) -> f64 {
        self.0.iter().filter(|q| **q < 0.0).map(|q| -q).sum()
    }

    /// Largest single-good magnitude.
    pub fn max_magnitude(&self) -> f64 {
        self.0.iter().fold(0.0, |acc, q| acc.max(q.abs()))
    }
}

impl Index<GoodType> for Demand {
    type Output = f64;

    fn index(&self, good: GoodType) -> &f64 {
        &self.0[good.index()]
    }
}

impl IndexMut<GoodType> for Demand {
    fn index_mut(&mut self, good: GoodType) -> &mut f64 {
        &mut self.0[good.index()]
    }
}

impl From<BTreeMap<GoodType, f64>> for Demand {
    fn from(map: BTreeMap<GoodType, f64>) -> Self {
        let mut demand = Demand::default();
        for (good, quantity) in map {
            demand[good] = quantity;
        }
        demand
    }
}

impl From<Demand> for BTreeMap<GoodType, f64> {
    fn from(demand: Demand) -> Self {
        demand.iter().filter(|(_, q)| *q != 0.0).collect()
    }
}

/// A depot vehicles start from, end at, and reload at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    #[serde(flatten)]
    pub location: Point,
}

impl Warehouse {
    pub fn new(id: impl Into<WarehouseId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            location: Point::new(x, y),
        }
    }
}

impl Located for Warehouse {
    fn location(&self) -> Point {
        self.location
    }
}

/// A pickup or delivery request served in a single visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    #[serde(flatten)]
    pub location: Point,
    #[serde(alias = "goods", default)]
    pub demand: Demand,
}

impl Client {
    pub fn new(id: impl Into<ClientId>, x: f64, y: f64, demand: Demand) -> Self {
        Self {
            id: id.into(),
            location: Point::new(x, y),
            demand,
        }
    }

    /// True when serving the client adds load to the vehicle overall.
    pub fn is_pickup(&self) -> bool {
        self.demand.net() < 0.0
    }
}

impl Located for Client {
    fn location(&self) -> Point {
        self.location
    }
}

/// A capacity-constrained vehicle based at a home warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    /// Informational label (e.g. "green", "blue", "red").
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Total capacity across all goods.
    pub capacity: f64,
    pub warehouse_id: WarehouseId,
}

impl Vehicle {
    pub fn new(id: impl Into<VehicleId>, capacity: f64, warehouse_id: impl Into<WarehouseId>) -> Self {
        Self {
            id: id.into(),
            kind: String::new(),
            capacity,
            warehouse_id: warehouse_id.into(),
        }
    }

    pub fn kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demand_weights() {
        let demand = Demand::new()
            .with(GoodType::Oranges, 40.0)
            .with(GoodType::Uranium, -15.0)
            .with(GoodType::Tuna, 5.0);

        assert_eq!(demand.net(), 30.0);
        assert_eq!(demand.delivery_weight(), 45.0);
        assert_eq!(demand.pickup_weight(), 15.0);
        assert_eq!(demand.max_magnitude(), 40.0);
    }

    #[test]
    fn test_client_direction_follows_net_demand() {
        let pickup = Client::new("C0", 0.0, 0.0, Demand::new().with(GoodType::Tuna, -10.0));
        let delivery = Client::new("C1", 0.0, 0.0, Demand::new().with(GoodType::Tuna, 10.0));
        assert!(pickup.is_pickup());
        assert!(!delivery.is_pickup());
    }

    #[test]
    fn test_ids_accept_integers() {
        let warehouse: Warehouse = serde_json::from_str(r#"{"id": 7, "x": 1, "y": 2.5}"#).unwrap();
        assert_eq!(warehouse.id.as_str(), "7");
        assert_eq!(warehouse.location, Point::new(1.0, 2.5));
    }

    #[test]
    fn test_client_accepts_generator_shape() {
        let json = r#"{"id": "C3", "x": 10, "y": 20, "type": "pickup",
                       "goods": {"tuna": -60, "oranges": -40}}"#;
        let client: Client = serde_json::from_str(json).unwrap();

        assert_eq!(client.id.as_str(), "C3");
        assert_eq!(client.demand[GoodType::Tuna], -60.0);
        assert_eq!(client.demand[GoodType::Oranges], -40.0);
        assert_eq!(client.demand[GoodType::Uranium], 0.0);
        assert!(client.is_pickup());
    }

    #[test]
    fn test_vehicle_record() {
        let json = r#"{"id": "V1", "type": "blue", "capacity": 1500, "warehouse_id": "W2"}"#;
        let vehicle: Vehicle = serde_json::from_str(json).unwrap();

        assert_eq!(vehicle.kind, "blue");
        assert_eq!(vehicle.capacity, 1500.0);
        assert_eq!(vehicle.warehouse_id, WarehouseId::new("W2"));
    }

    #[test]
    fn test_ids_sort_by_text() {
        let mut ids = vec![VehicleId::new("V2"), VehicleId::new("V0"), VehicleId::new("V1")];
        ids.sort();
        assert_eq!(ids, vec![VehicleId::new("V0"), VehicleId::new("V1"), VehicleId::new("V2")]);
    }
}
