//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role lacks
//! the named permission in [`RoleAccess`](minetrack_core::roles::RoleAccess).
//! Use these in route handlers to enforce authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use minetrack_core::error::CoreError;
use minetrack_core::roles::Permission;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Resolve the caller and check a single permission.
async fn require(
    parts: &mut Parts,
    state: &AppState,
    permission: Permission,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !user.access().allows(permission) {
        tracing::debug!(
            user_id = user.user_id,
            role = %user.role,
            ?permission,
            "Permission denied"
        );
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Role '{}' is not allowed to {}",
            user.role.label(),
            permission.describe()
        ))));
    }
    Ok(user)
}

macro_rules! permission_extractor {
    ($(#[$meta:meta])* $name:ident => $permission:expr) => {
        $(#[$meta])*
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                require(parts, state, $permission).await.map($name)
            }
        }
    };
}

permission_extractor!(
    /// Dashboard metrics.
    RequireViewDashboard => Permission::ViewDashboard
);
permission_extractor!(
    /// Equipment list and detail.
    RequireViewEquipment => Permission::ViewEquipment
);
permission_extractor!(
    /// Submitting a breakdown report.
    RequireReportDowntime => Permission::ReportDowntime
);
permission_extractor!(
    /// Downtime list and detail.
    RequireViewDowntimes => Permission::ViewDowntimes
);
permission_extractor!(
    /// Moving an open downtime to in-progress.
    RequireStartRepair => Permission::StartRepair
);
permission_extractor!(
    /// Closing an in-progress downtime.
    RequireCloseDowntime => Permission::CloseDowntime
);
permission_extractor!(
    /// Registering, editing, and removing equipment.
    RequireManageEquipment => Permission::ManageEquipment
);

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for use in
/// route definitions where the intent "this route requires authentication"
/// should be self-documenting.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
