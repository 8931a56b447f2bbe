//! depot-router
//!
//! Splits pickup/delivery clients among warehouse-based vehicles and builds
//! a capacity-feasible route for each vehicle.

pub mod traits;
pub mod model;
pub mod geometry;
pub mod inventory;
pub mod cluster;
pub mod route;
pub mod planner;
pub mod instance;
pub mod error;

pub use error::{InstanceError, PlanError, RouteError};
pub use instance::Instance;
pub use planner::{plan, Plan, PlanOptions, Solution};
