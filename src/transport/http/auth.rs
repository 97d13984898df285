use {
    super::errors::ApiError,
    crate::domain::payment::CustomerContact,
    axum::{extract::FromRequestParts, http::request::Parts},
    uuid::Uuid,
};

/// Identity injected by the upstream auth proxy. Authentication itself is
/// outside this service; these headers are trusted within the perimeter.
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
}

impl AuthUser {
    pub fn contact(&self) -> CustomerContact {
        CustomerContact {
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let id = header("x-user-id")
            .and_then(|v| Uuid::parse_str(&v).ok())
            .ok_or(ApiError::Unauthorized)?;
        let email = header("x-user-email").ok_or(ApiError::Unauthorized)?;

        Ok(AuthUser {
            id,
            email,
            phone: header("x-user-phone"),
        })
    }
}
