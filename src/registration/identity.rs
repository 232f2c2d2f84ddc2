//! Caller identity as supplied by the upstream authentication layer.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

/// Trusted request headers carrying the authenticated identity.
pub mod headers {
    pub const USER_ID: &str = "x-user-id";
    pub const DISPLAY_NAME: &str = "x-user-name";
    pub const EMAIL: &str = "x-user-email";
    pub const PHOTO_URL: &str = "x-user-photo";
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            email: None,
            photo_url: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// Read the identity from trusted headers. `None` without a non-empty user id.
    pub fn from_headers(map: &HeaderMap) -> Option<Self> {
        let read = |name: &str| {
            map.get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Some(Self {
            id: read(headers::USER_ID)?,
            display_name: read(headers::DISPLAY_NAME),
            email: read(headers::EMAIL),
            photo_url: read(headers::PHOTO_URL),
        })
    }
}

/// Extractor for the optional caller identity. Never rejects.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Identity::from_headers(&parts.headers)))
    }
}
