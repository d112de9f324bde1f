//! Mine personnel signed in to the system.

use minetrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    /// Employee (ZP) number; unique per person.
    pub zp_number: String,
    pub name: String,
    pub role: String,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or refreshing a user at sign-in.
#[derive(Debug, Clone)]
pub struct UpsertUser {
    pub zp_number: String,
    pub name: String,
    pub role: String,
}
