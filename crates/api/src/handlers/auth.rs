//! Handlers for sign-in and the role catalogue.

use axum::extract::State;
use axum::Json;
use minetrack_core::equipment::validate_required_field;
use minetrack_core::error::CoreError;
use minetrack_core::roles::{parse_role, RoleAccess, UserRole};
use minetrack_core::types::{DbId, Timestamp};
use minetrack_db::models::user::{UpsertUser, User};
use minetrack_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub role: String,
    pub zp_number: String,
}

/// Successful sign-in response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
    pub access: RoleAccess,
}

/// Public user info embedded in auth responses.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub name: String,
    pub zp_number: String,
    pub role: String,
    pub role_label: &'static str,
    pub last_login_at: Option<Timestamp>,
}

impl UserInfo {
    fn new(user: User, role: UserRole) -> Self {
        Self {
            id: user.id,
            name: user.name,
            zp_number: user.zp_number,
            role: user.role,
            role_label: role.label(),
            last_login_at: user.last_login_at,
        }
    }
}

/// Body of `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserInfo,
    pub access: RoleAccess,
}

/// One entry of `GET /roles`.
#[derive(Debug, Serialize)]
pub struct RoleInfo {
    pub name: &'static str,
    pub label: &'static str,
    pub access: RoleAccess,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Sign in with name, role, and ZP number. The user row is created on first
/// sign-in and refreshed on later ones.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_required_field("name", &input.name)?;
    validate_required_field("zp_number", &input.zp_number)?;
    let role = parse_role(input.role.trim())?;

    let user = UserRepo::upsert_login(
        &state.pool,
        &UpsertUser {
            zp_number: input.zp_number,
            name: input.name,
            role: role.as_str().to_string(),
        },
    )
    .await?;

    let jwt = &state.config.jwt;
    let access_token = generate_access_token(user.id, role.as_str(), &user.name, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, role = %role, "User signed in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: jwt.access_token_expiry_mins * 60,
        user: UserInfo::new(user, role),
        access: role.access(),
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    Ok(Json(DataResponse {
        data: MeResponse {
            user: UserInfo::new(user, auth.role),
            access: auth.access(),
        },
    }))
}

/// GET /api/v1/roles
///
/// Public; the sign-in form needs the list before a token exists.
pub async fn list_roles() -> Json<DataResponse<Vec<RoleInfo>>> {
    let roles = UserRole::ALL
        .iter()
        .map(|&role| RoleInfo {
            name: role.as_str(),
            label: role.label(),
            access: role.access(),
        })
        .collect();
    Json(DataResponse { data: roles })
}
