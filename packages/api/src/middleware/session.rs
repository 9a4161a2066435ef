use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use hyper::header::{AUTHORIZATION, COOKIE};

use crate::{
    entity::admin_user,
    error::{ApiError, CommerceError},
    permission::{AdminPermission, CapabilityTable, Operation, has_admin_permission},
    state::AppState,
};

/// The admin behind a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub username: String,
    pub permissions: AdminPermission,
    pub is_super_admin: bool,
}

impl From<admin_user::Model> for AdminIdentity {
    fn from(model: admin_user::Model) -> Self {
        AdminIdentity {
            permissions: AdminPermission::from_list(&model.permissions),
            username: model.username,
            is_super_admin: model.is_super_admin,
        }
    }
}

/// Request extension set by [`session_middleware`] on every request.
#[derive(Debug, Clone)]
pub enum AdminSession {
    Admin(Arc<AdminIdentity>),
    Anonymous,
}

impl AdminSession {
    pub fn admin(&self) -> Option<&AdminIdentity> {
        match self {
            AdminSession::Admin(identity) => Some(identity),
            AdminSession::Anonymous => None,
        }
    }

    /// Checks `operation` against the capability table.
    ///
    /// Handlers call this before touching any store.
    pub fn authorize(
        &self,
        table: &CapabilityTable,
        operation: Operation,
    ) -> Result<&AdminIdentity, CommerceError> {
        let identity = self.admin().ok_or(CommerceError::Unauthorized)?;
        if identity.is_super_admin {
            return Ok(identity);
        }

        let required = table.required(operation);
        if has_admin_permission(&identity.permissions, required) {
            Ok(identity)
        } else {
            tracing::warn!(
                username = %identity.username,
                ?operation,
                "Admin lacks capability"
            );
            Err(CommerceError::Forbidden(required.name()))
        }
    }
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

pub(crate) fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    cookie_value(headers, cookie_name).or_else(|| bearer_token(headers))
}

pub fn session_cookie(name: &str, token: &str, ttl: Duration) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        name,
        token,
        ttl.as_secs()
    ))
    .map_err(|e| ApiError::internal(format!("Invalid session cookie: {}", e)))
}

pub fn clear_session_cookie(name: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        name
    ))
    .map_err(|e| ApiError::internal(format!("Invalid session cookie: {}", e)))
}

/// Public routes run behind this too, so lookup failures degrade to anonymous.
async fn resolve_session(state: &AppState, headers: &HeaderMap) -> AdminSession {
    let Some(token) = session_token(headers, &state.config.session_cookie) else {
        return AdminSession::Anonymous;
    };

    let claims = match state.sessions.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "Ignoring invalid admin session token");
            return AdminSession::Anonymous;
        }
    };

    match state.admins.find_admin(&claims.sub).await {
        Ok(Some(model)) => AdminSession::Admin(Arc::new(model.into())),
        Ok(None) => {
            tracing::warn!(username = %claims.sub, "Session names an unknown admin");
            AdminSession::Anonymous
        }
        Err(err) => {
            metrics::counter!("admin_session_lookup_failed_total").increment(1);
            tracing::error!(
                username = %claims.sub,
                error = %err,
                "Admin lookup failed, treating request as anonymous"
            );
            AdminSession::Anonymous
        }
    }
}

pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response<Body> {
    let session = resolve_session(&state, request.headers()).await;
    request.extensions_mut().insert::<AdminSession>(session);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn table() -> CapabilityTable {
        let names: HashMap<Operation, String> = [
            (Operation::ListOrders, "orders.read"),
            (Operation::ViewOrder, "orders.read"),
            (Operation::UpdateOrderStatus, "orders.write"),
            (Operation::ListNotifications, "notifications.read"),
            (Operation::UpdateNotifications, "notifications.write"),
            (Operation::ManageCatalog, "catalog.write"),
        ]
        .into_iter()
        .map(|(op, name)| (op, name.to_string()))
        .collect();
        CapabilityTable::from_names(&names).unwrap()
    }

    fn admin(permissions: AdminPermission, is_super_admin: bool) -> AdminSession {
        AdminSession::Admin(Arc::new(AdminIdentity {
            username: "ops".into(),
            permissions,
            is_super_admin,
        }))
    }

    #[test]
    fn anonymous_is_unauthorized() {
        let err = AdminSession::Anonymous
            .authorize(&table(), Operation::ListOrders)
            .unwrap_err();
        assert!(matches!(err, CommerceError::Unauthorized));
    }

    #[test]
    fn missing_capability_is_forbidden() {
        let session = admin(AdminPermission::OrdersRead, false);
        assert!(session.authorize(&table(), Operation::ListOrders).is_ok());
        let err = session
            .authorize(&table(), Operation::UpdateOrderStatus)
            .unwrap_err();
        assert!(matches!(err, CommerceError::Forbidden(ref cap) if cap == "orders.write"));
    }

    #[test]
    fn super_admin_bypasses_table() {
        let session = admin(AdminPermission::empty(), true);
        for operation in Operation::ALL {
            assert!(session.authorize(&table(), operation).is_ok());
        }
    }

    #[test]
    fn cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; admin_session=abc"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers, "admin_session"), Some("abc"));

        headers.remove(COOKIE);
        assert_eq!(session_token(&headers, "admin_session"), Some("xyz"));

        headers.remove(AUTHORIZATION);
        assert_eq!(session_token(&headers, "admin_session"), None);
    }
}
