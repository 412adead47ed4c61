//! `fls-drift` — how each unit's logical clock advances per driver tick.
//!
//! # Crate layout
//!
//! | Module           | Contents                                              |
//! |------------------|-------------------------------------------------------|
//! | [`policy`]       | `DriftPolicy` trait, `policy_for(DriftModel)`         |
//! | [`neutral`]      | `NeutralDrift` — one frame per tick, no skew          |
//! | [`split_rate`]   | `SplitRateDrift` — odd units fast, even units slow    |
//!
//! # Design notes
//!
//! Policies are stateless: anything a policy needs to remember per unit
//! (such as the even units' tick counter) lives in that unit's
//! [`LogicalClock`](fls_core::LogicalClock).  A policy is therefore
//! `Send + Sync` and one instance serves the whole swarm, including from
//! several worker threads at once.

pub mod neutral;
pub mod policy;
pub mod split_rate;


pub use neutral::NeutralDrift;
pub use policy::{DriftPolicy, policy_for};
pub use split_rate::SplitRateDrift;
