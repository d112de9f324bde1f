pub mod auth;
pub mod dashboard;
pub mod downtime;
pub mod equipment;
