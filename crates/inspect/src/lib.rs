//! Equipment inspection tool.
//!
//! Loads every equipment row through the repository layer, serializes the
//! rows with the same [`EquipmentResponse`] serializer the API uses, and
//! renders a plain-text report for eyeballing the response format:
//!
//! ```text
//! Equipment Response Format:
//! [ <first serialized record> ]
//!
//! Total equipment: <N>
//!
//! All equipment:
//! [ <all serialized records> ]
//! ```

use std::io::Write;

use minetrack_db::models::equipment::{serialize_many, EquipmentResponse};
use minetrack_db::repositories::EquipmentRepo;
use minetrack_db::DbPool;

/// Database used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/mine_track";

/// Number of records shown in the "response format" preview.
pub const PREVIEW_LEN: usize = 1;

#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Tool configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectConfig {
    pub database_url: String,
}

impl InspectConfig {
    /// Load configuration from the environment.
    ///
    /// | Env Var        | Default                                 |
    /// |----------------|-----------------------------------------|
    /// | `DATABASE_URL` | `postgres://localhost:5432/mine_track`  |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        Self { database_url }
    }
}

/// Read all equipment and serialize it in registration order.
pub async fn load_equipment(pool: &DbPool) -> Result<Vec<EquipmentResponse>, sqlx::Error> {
    let rows = EquipmentRepo::list(pool).await?;
    tracing::debug!(count = rows.len(), "Loaded equipment rows");
    Ok(serialize_many(rows))
}

/// Render the inspection report for already-serialized equipment.
pub fn render_report(equipment: &[EquipmentResponse]) -> Result<String, serde_json::Error> {
    let preview = &equipment[..equipment.len().min(PREVIEW_LEN)];
    let mut out = String::new();
    out.push_str("Equipment Response Format:\n");
    out.push_str(&serde_json::to_string_pretty(preview)?);
    out.push('\n');
    out.push_str(&format!("\nTotal equipment: {}\n", equipment.len()));
    out.push_str("\nAll equipment:\n");
    out.push_str(&serde_json::to_string_pretty(equipment)?);
    out.push('\n');
    Ok(out)
}

/// Load, serialize, and write the report to `out`.
///
/// Returns the number of records written.
pub async fn run(pool: &DbPool, out: &mut impl Write) -> Result<usize, InspectError> {
    let equipment = load_equipment(pool).await?;
    let report = render_report(&equipment)?;
    out.write_all(report.as_bytes())?;
    out.flush()?;
    Ok(equipment.len())
}
