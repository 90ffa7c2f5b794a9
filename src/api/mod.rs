//! API handlers for the Bookclub REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;
pub mod reviews;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication(
                "Invalid authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        // Validate JWT token using the secret from configuration
        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::Authentication("Invalid or expired token".to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Success envelope wrapping a single payload: `{status: "success", data}`
#[derive(Serialize, ToSchema)]
pub struct DataResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Always "success"
    pub status: &'static str,
    pub data: T,
}

impl<T> DataResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// Success envelope for collections:
/// `{status: "success", results, totalResults?, data}`
#[derive(Serialize, ToSchema)]
pub struct ListResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Always "success"
    pub status: &'static str,
    /// Number of items in this response
    pub results: usize,
    /// Total matching rows regardless of pagination, when paginated
    #[serde(rename = "totalResults", skip_serializing_if = "Option::is_none")]
    pub total_results: Option<i64>,
    pub data: Vec<T>,
}

impl<T> ListResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(data: Vec<T>) -> Self {
        Self {
            status: "success",
            results: data.len(),
            total_results: None,
            data,
        }
    }

    pub fn paginated(data: Vec<T>, total: i64) -> Self {
        Self {
            status: "success",
            results: data.len(),
            total_results: Some(total),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::author::Author;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn data_envelope_shape() {
        let author = Author {
            id: Uuid::new_v4(),
            name: "Ursula K. Le Guin".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(DataResponse::new(author)).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["name"], "Ursula K. Le Guin");
    }

    #[test]
    fn list_envelope_omits_total_when_not_paginated() {
        let json = serde_json::to_value(ListResponse::<Author>::new(vec![])).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["results"], 0);
        assert!(json.get("totalResults").is_none());
    }

    #[test]
    fn list_envelope_reports_full_total_when_paginated() {
        let json = serde_json::to_value(ListResponse::<Author>::paginated(vec![], 42)).unwrap();
        assert_eq!(json["totalResults"], 42);
    }
}
