//! Admin login, logout and profile.

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{ApiError, CommerceError},
    middleware::session::{AdminIdentity, AdminSession, clear_session_cookie, session_cookie},
    password::verify_password_blocking,
    state::AppState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub username: String,
    pub permissions: Vec<String>,
    pub is_super_admin: bool,
}

impl From<&AdminIdentity> for AdminProfile {
    fn from(identity: &AdminIdentity) -> Self {
        AdminProfile {
            username: identity.username.clone(),
            permissions: identity
                .permissions
                .names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            is_super_admin: identity.is_super_admin,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
}

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookie set", body = AdminProfile),
        (status = 401, description = "Invalid credentials")
    )
)]
#[tracing::instrument(name = "POST /admin/login", skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AdminProfile>), ApiError> {
    let admin = state.admins.find_admin(request.username.trim()).await?;
    let stored_hash = admin.as_ref().map(|admin| admin.password_hash.clone());
    let verified = verify_password_blocking(request.password, stored_hash).await;

    let admin = admin
        .filter(|_| verified)
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    let token = state
        .sessions
        .sign(&admin.username)
        .map_err(|e| ApiError::internal(format!("Failed to sign session: {}", e)))?;
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        session_cookie(&state.config.session_cookie, &token, state.sessions.ttl())?,
    );

    let identity = AdminIdentity::from(admin);
    tracing::info!("Admin logged in");
    Ok((headers, Json(AdminProfile::from(&identity))))
}

/// Clears the session cookie. Succeeds with or without a session.
#[utoipa::path(
    post,
    path = "/admin/logout",
    tag = "admin",
    responses(
        (status = 200, description = "Session cookie cleared", body = LogoutResponse)
    )
)]
#[tracing::instrument(name = "POST /admin/logout", skip(state))]
pub async fn logout(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<LogoutResponse>), ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, clear_session_cookie(&state.config.session_cookie)?);
    Ok((headers, Json(LogoutResponse { success: true })))
}

#[utoipa::path(
    get,
    path = "/admin/profile",
    tag = "admin",
    responses(
        (status = 200, description = "Current admin", body = AdminProfile),
        (status = 401, description = "No admin session")
    )
)]
#[tracing::instrument(name = "GET /admin/profile", skip(session))]
pub async fn profile(
    Extension(session): Extension<AdminSession>,
) -> Result<Json<AdminProfile>, ApiError> {
    let identity = session.admin().ok_or(CommerceError::Unauthorized)?;
    Ok(Json(AdminProfile::from(identity)))
}
