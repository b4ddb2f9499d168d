use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::{error, warn};

use super::{claims::TokenKind, jwt::JwtKeys};
use crate::web::html::found;

/// Browser-session key holding the id of the logged-in user.
pub const SESSION_USER_KEY: &str = "user_id";

/// The authenticated user id, resolved once per request and handed to handlers.
///
/// A bearer access token wins; otherwise the browser session is consulted.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i64);

#[derive(Debug)]
pub enum AuthRejection {
    /// A credential was presented and is unusable.
    Unauthorized(&'static str),
    /// No credential at all; browsers are sent to the login page.
    LoginRequired,
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthRejection::LoginRequired => found("/login"),
            AuthRejection::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(header) = parts.headers.get(axum::http::header::AUTHORIZATION) {
            let header = header
                .to_str()
                .map_err(|_| AuthRejection::Unauthorized("Invalid Authorization header"))?;
            let token = header
                .strip_prefix("Bearer ")
                .or_else(|| header.strip_prefix("bearer "))
                .ok_or(AuthRejection::Unauthorized("Invalid Authorization header"))?;

            let keys = JwtKeys::from_ref(state);
            let claims = keys.verify(token).map_err(|_| {
                warn!("invalid or expired token");
                AuthRejection::Unauthorized("Invalid or expired token")
            })?;
            if claims.kind != TokenKind::Access {
                return Err(AuthRejection::Unauthorized("Access token required"));
            }
            return Ok(AuthUser(claims.sub));
        }

        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| {
                error!(error = msg, "browser session layer missing");
                AuthRejection::Internal
            })?;
        match session.get::<i64>(SESSION_USER_KEY).await {
            Ok(Some(user_id)) => Ok(AuthUser(user_id)),
            Ok(None) => Err(AuthRejection::LoginRequired),
            Err(e) => {
                error!(error = %e, "browser session load failed");
                Err(AuthRejection::Internal)
            }
        }
    }
}
