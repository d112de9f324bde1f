//! Domain logic shared by the MineTrack API server and the inspect tool.
//!
//! Everything in this crate is pure: no I/O, no database access. The
//! persistence layer (`minetrack-db`) and the HTTP layer (`minetrack-api`)
//! build on these types and validation rules.

pub mod downtime;
pub mod equipment;
pub mod error;
pub mod metrics;
pub mod roles;
pub mod search;
pub mod status;
pub mod types;
