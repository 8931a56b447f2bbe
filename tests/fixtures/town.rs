//! A deterministic town: three warehouses, four vehicles, two dozen clients.
//!
//! Shaped like the generator's catalogs (0..=100 grid, weights 100..=200
//! split across goods, mixed pickups and deliveries) but with no randomness
//! so tests can compare runs.

use depot_router::model::{Client, Demand, GoodType, Vehicle, Warehouse};
use depot_router::Instance;

pub const CLIENT_COUNT: usize = 24;

pub fn warehouses() -> Vec<Warehouse> {
    vec![
        Warehouse::new("W0", 10.0, 10.0),
        Warehouse::new("W1", 85.0, 20.0),
        Warehouse::new("W2", 50.0, 90.0),
    ]
}

pub fn vehicles() -> Vec<Vehicle> {
    vec![
        Vehicle::new("V0", 1000.0, "W0").kind("green"),
        Vehicle::new("V1", 1500.0, "W1").kind("blue"),
        Vehicle::new("V2", 2000.0, "W2").kind("red"),
        Vehicle::new("V3", 1000.0, "W0").kind("green"),
    ]
}

/// Spread `weight` over the first `parts` goods.
fn split(weight: f64, parts: usize, sign: f64) -> Demand {
    let mut demand = Demand::new();
    let share = (weight / parts as f64).floor();
    let mut left = weight;
    for (i, good) in GoodType::ALL.iter().take(parts).enumerate() {
        let amount = if i + 1 == parts { left } else { share };
        demand[*good] = sign * amount;
        left -= amount;
    }
    demand
}

pub fn clients() -> Vec<Client> {
    (0..CLIENT_COUNT)
        .map(|i| {
            let x = ((i * 37 + 11) % 101) as f64;
            let y = ((i * 53 + 7) % 101) as f64;
            let weight = (100 + (i * 29) % 101) as f64;
            let sign = if i % 3 == 0 { -1.0 } else { 1.0 };
            let parts = i % GoodType::COUNT + 1;
            Client::new(format!("C{:02}", i).as_str(), x, y, split(weight, parts, sign))
        })
        .collect()
}

pub fn town() -> Instance {
    Instance {
        warehouses: warehouses(),
        clients: clients(),
        vehicles: vehicles(),
    }
}

/// Single-good client.
pub fn client(id: &str, x: f64, y: f64, quantity: f64) -> Client {
    Client::new(id, x, y, Demand::new().with(GoodType::Oranges, quantity))
}
