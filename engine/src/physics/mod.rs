//! Physics module
//!
//! The locomotion core does not implement a physics engine; it consumes a
//! small query interface (sphere overlap, raycast, sweep move) defined in
//! [`query`] and ships a from-scratch AABB implementation in [`world`] so
//! everything is testable standalone.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout): distances in meters,
//! velocities in m/s, accelerations in m/s².

pub mod query;
pub mod world;

pub use query::{
    Contact, Hit, IceParams, SurfaceEffect, SurfaceId, SurfaceQuery, SweepResult, layers,
};
pub use world::StaticWorld;
