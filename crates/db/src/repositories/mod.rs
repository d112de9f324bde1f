//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod downtime_repo;
pub mod equipment_repo;
pub mod user_repo;

pub use downtime_repo::DowntimeRepo;
pub use equipment_repo::EquipmentRepo;
pub use user_repo::UserRepo;
