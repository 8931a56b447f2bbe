//! Per-good vehicle load.
//!
//! A vehicle's load only changes through [`Inventory::try_apply`], which
//! checks the whole demand vector before touching any entry. Moves that
//! would leave a good negative or the total over capacity are rejected.

use std::fmt;

use serde::Serialize;

use crate::model::{Demand, GoodType};

/// Slack for float accumulation when comparing quantities.
const EPSILON: f64 = 1e-9;

/// Whether `quantity` fits into `room`, within float slack.
pub(crate) fn fits(quantity: f64, room: f64) -> bool {
    quantity <= room + EPSILON
}

/// Quantity of each good currently on board, plus the vehicle's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Inventory {
    load: [f64; GoodType::COUNT],
    #[serde(skip)]
    capacity: f64,
}

impl Inventory {
    /// An empty inventory for a vehicle of the given capacity.
    pub fn empty(capacity: f64) -> Self {
        Self {
            load: [0.0; GoodType::COUNT],
            capacity,
        }
    }

    /// Load goods in enumeration order until each good's demand is met or
    /// the capacity runs out.
    pub fn preload(capacity: f64, wanted: &Demand) -> Self {
        let mut inventory = Self::empty(capacity);
        let mut cap_left = capacity;

        for good in GoodType::ALL {
            let want = wanted[good];
            if want <= 0.0 {
                continue;
            }
            let to_load = want.min(cap_left);
            inventory.load[good.index()] = to_load;
            cap_left -= to_load;
            if cap_left <= 0.0 {
                break;
            }
        }

        inventory
    }

    pub fn get(&self, good: GoodType) -> f64 {
        self.load[good.index()]
    }

    pub fn total(&self) -> f64 {
        self.load.iter().sum()
    }

    pub fn headroom(&self) -> f64 {
        self.capacity - self.total()
    }

    /// Load after serving `demand`, or `None` if the visit is infeasible.
    fn after(&self, demand: &Demand) -> Option<[f64; GoodType::COUNT]> {
        let mut next = self.load;
        for (good, quantity) in demand.iter() {
            next[good.index()] -= quantity;
            if next[good.index()] < -EPSILON {
                return None;
            }
        }

        let total: f64 = next.iter().sum();
        if !fits(total, self.capacity) {
            return None;
        }

        Some(next)
    }

    /// Whether a client with this demand can be served right now.
    pub fn can_serve(&self, demand: &Demand) -> bool {
        self.after(demand).is_some()
    }

    /// Serve a client atomically. Returns `false` and leaves the load
    /// untouched when the visit is infeasible.
    pub fn try_apply(&mut self, demand: &Demand) -> bool {
        match self.after(demand) {
            Some(next) => {
                self.load = next;
                true
            }
            None => false,
        }
    }

    /// Drop everything on board.
    pub fn unload(&mut self) {
        self.load = [0.0; GoodType::COUNT];
    }

    /// Take on the goods a client expects to receive. Callers ensure the
    /// result fits in capacity.
    pub(crate) fn stock_for(&mut self, demand: &Demand) {
        for (good, quantity) in demand.iter() {
            if quantity > 0.0 {
                self.load[good.index()] += quantity;
            }
        }
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, good) in GoodType::ALL.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:.1}", good, self.get(*good))?;
        }
        write!(f, "}}")
    }
}
