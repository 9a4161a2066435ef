//! Customer self-service signup.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{ApiError, CommerceError},
    password::{PasswordError, hash_password_blocking},
    state::AppState,
    store::NewCustomer,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/signup", post(signup))
}

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Customer account created", body = CustomerProfile),
        (status = 400, description = "Invalid email or password too short"),
        (status = 409, description = "Email already registered")
    )
)]
#[tracing::instrument(name = "POST /auth/signup", skip(state, request))]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<CustomerProfile>), ApiError> {
    let email = request.email.trim();
    if !is_plausible_email(email) {
        return Err(crate::bad_request!("Invalid email address"));
    }

    let password_hash = hash_password_blocking(request.password)
        .await
        .map_err(|err| match err {
            PasswordError::TooShort => ApiError::from(CommerceError::Validation(err.to_string())),
            other => ApiError::internal(other.to_string()),
        })?;

    let customer = state
        .customers
        .create_customer(NewCustomer {
            email: email.to_string(),
            name: request
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            password_hash,
        })
        .await?;

    tracing::info!(customer_id = %customer.id, "Customer signed up");
    Ok((
        StatusCode::CREATED,
        Json(CustomerProfile {
            id: customer.id,
            email: customer.email,
            name: customer.name,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_plausibility() {
        assert!(is_plausible_email("ada@example.com"));
        assert!(!is_plausible_email("ada.example.com"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("ada@localhost"));
        assert!(!is_plausible_email("ada lovelace@example.com"));
    }
}
