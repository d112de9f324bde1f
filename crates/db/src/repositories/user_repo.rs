//! Repository for the `users` table.

use minetrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{UpsertUser, User};

const COLUMNS: &str = "id, zp_number, name, role, last_login_at, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Create the user on first sign-in, otherwise refresh name and role.
    ///
    /// Uses `ON CONFLICT (zp_number)` so each employee number maps to
    /// exactly one row. `last_login_at` is stamped either way.
    pub async fn upsert_login(pool: &PgPool, input: &UpsertUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (zp_number, name, role, last_login_at) \
             VALUES ($1, $2, $3, NOW()) \
             ON CONFLICT (zp_number) DO UPDATE \
             SET name = EXCLUDED.name, \
                 role = EXCLUDED.role, \
                 last_login_at = EXCLUDED.last_login_at \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.zp_number.trim())
            .bind(input.name.trim())
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_zp_number(
        pool: &PgPool,
        zp_number: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE zp_number = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(zp_number.trim())
            .fetch_optional(pool)
            .await
    }
}
