//! List filtering and pagination helpers shared by the API handlers.

/// Case-insensitive equipment search over name, machine type, and section.
///
/// An empty (or whitespace-only) query matches everything.
pub fn matches_equipment_search(
    name: &str,
    machine_type: &str,
    section: &str,
    query: &str,
) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [name, machine_type, section]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Clamp a user-provided limit to `1..=max`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
