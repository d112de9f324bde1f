//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and patches
//! - A `Serialize` response struct shaping the row for API consumers

pub mod downtime;
pub mod equipment;
pub mod user;
