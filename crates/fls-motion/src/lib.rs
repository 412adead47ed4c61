//! `fls-motion` — how units move along their curves.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`quadrature`]  | Adaptive Gauss–Kronrod integrator                             |
//! | [`kinematics`]  | `Kinematics` — velocity (finite difference) and arc length    |
//! | [`offsets`]     | `OffsetTable` — per-segment base offsets + JSON loader        |
//! | [`state`]       | `UnitRunState` — one unit's clock, position, and distances    |
//! | [`store`]       | `UnitStore` — arena of `UnitRunState` indexed by `UnitId`     |
//! | [`error`]       | `MotionError`, `MotionResult<T>`                              |
//!
//! # Movement model
//!
//! A unit's world position at parameter `t` is the segment transform at `t`
//! applied to the unit's base offset.  Velocity is a one-sided finite
//! difference of that position; the distance covered between two parameter
//! values is the integral of the velocity magnitude.
//!
//! Two distances are accumulated per unit:
//!
//! - `total_distance_traveled` integrates over the unit's own logical clock,
//!   i.e. what the unit actually flew;
//! - `total_distance` integrates over the nominal frame timeline, i.e. what a
//!   drift-free unit would have flown by the same tick.
//!
//! Under the neutral drift policy the two are equal.

pub mod error;
pub mod kinematics;
pub mod offsets;
pub mod quadrature;
pub mod state;
pub mod store;


pub use error::{MotionError, MotionResult};
pub use kinematics::Kinematics;
pub use offsets::{OffsetTable, load_offsets_json, load_offsets_reader};
pub use quadrature::{Estimate, Tolerance, integrate};
pub use state::{FrameStep, UnitPhase, UnitRunState};
pub use store::UnitStore;
