//! Test fixtures for depot-router.
//!
//! Provides:
//! - A fixed town layout shaped like the generator's output
//! - Builders for clients and small hand-made instances

pub mod town;

pub use town::*;
