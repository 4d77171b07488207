//! Patch-hierarchy geometry and field reductions for AMR cosmological snapshots.
//!
//! Data flows strictly forward:
//! levels → hierarchy/position → clean/mask → reduce → radius.

pub mod clean;
pub mod hierarchy;
pub mod levels;
pub mod mask;
pub mod position;
pub mod radius;
pub mod reduce;
