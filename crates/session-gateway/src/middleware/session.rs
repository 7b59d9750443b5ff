//! Session middleware for protected routes.
//!
//! Requests whose path starts with the configured protected prefix must carry
//! a valid, authoritative session token cookie. On success the validated
//! claims are stored in request extensions as a [`SessionContext`]; if the
//! gateway renewed the token, the new cookies are appended to the response.
//! Other paths pass through untouched.

use crate::auth::Claims;
use crate::errors::GatewayError;
use crate::gateway::AuthenticationGateway;
use axum::{
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::instrument;

/// State for the session middleware.
#[derive(Clone)]
pub struct SessionAuthState {
    /// Gateway making the per-request decision.
    pub gateway: Arc<AuthenticationGateway>,
}

/// Validated session attached to a request for downstream handlers.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Claims of the token the request is authorized under.
    pub claims: Claims,
    /// True if this request caused the token to be reissued.
    pub renewed: bool,
}

/// Session middleware.
///
/// # Response
///
/// - 401 Unauthorized if the token is missing, invalid, expired, bound to a
///   different device, or no longer authoritative
/// - 503 Service Unavailable if the session cache cannot be reached
/// - Otherwise the inner handler's response, plus `Set-Cookie` headers when
///   the token was renewed
#[instrument(skip_all, name = "session.middleware.require_session")]
pub async fn require_session(
    State(state): State<Arc<SessionAuthState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    if !state.gateway.config().is_protected_path(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let authorization = state.gateway.authenticate(req.headers()).await?;

    req.extensions_mut().insert(SessionContext {
        claims: authorization.claims,
        renewed: authorization.renewed.is_some(),
    });

    let mut response = next.run(req).await;

    if let Some(renewed) = authorization.renewed {
        tracing::debug!(target: "session.middleware", "Emitting renewed session cookies");
        for value in renewed.set_cookie_headers {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    Ok(response)
}

/// Extension trait for reading the session context from a request.
pub trait SessionContextExt {
    /// Returns `None` if the session middleware did not run for this request.
    fn session(&self) -> Option<&SessionContext>;
}

impl<B> SessionContextExt for axum::http::Request<B> {
    fn session(&self) -> Option<&SessionContext> {
        self.extensions().get::<SessionContext>()
    }
}
