use std::sync::Arc;

use auth::JwtError;
use auth::TokenIssuer;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::account::models::AccountId;
use crate::inbound::http::handlers::ApiError;

/// Extension type holding the verified caller of a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
    pub email: String,
    pub username: String,
    pub role: String,
    /// The bearer token as presented; logout uses it to find the session.
    pub token: String,
}

/// Middleware that validates the access token and adds the caller to request extensions
pub async fn authenticate(
    State(token_issuer): State<Arc<TokenIssuer>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(req.headers())?;
    let identity = resolve_identity(&token_issuer, token)?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Like [`authenticate`] but never rejects; the identity is attached only
/// when a well-formed, valid token is present.
pub async fn authenticate_optional(
    State(token_issuer): State<Arc<TokenIssuer>>,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = extract_bearer_token(req.headers())
        .and_then(|token| resolve_identity(&token_issuer, token))
        .ok();

    if let Some(identity) = identity {
        req.extensions_mut().insert(identity);
    }

    next.run(req).await
}

/// Roles admitted by [`require_role`].
#[derive(Debug, Clone)]
pub struct AllowedRoles(Arc<[String]>);

impl AllowedRoles {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, role: &str) -> bool {
        self.0.iter().any(|allowed| allowed == role)
    }
}

/// Must run after [`authenticate`] or [`authenticate_optional`].
pub async fn require_role(
    State(allowed): State<AllowedRoles>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = req
        .extensions()
        .get::<AuthenticatedAccount>()
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    if !allowed.allows(&identity.role) {
        tracing::warn!(
            account_id = %identity.account_id,
            role = %identity.role,
            "Role not permitted"
        );
        return Err(ApiError::Forbidden("Insufficient permissions".to_string()));
    }

    Ok(next.run(req).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Authorization header required".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    let parts: Vec<&str> = auth_str.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(token),
        _ => Err(ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )),
    }
}

fn resolve_identity(
    token_issuer: &TokenIssuer,
    token: &str,
) -> Result<AuthenticatedAccount, ApiError> {
    let claims = token_issuer.verify_access(token).map_err(|e| {
        tracing::warn!(error = %e, "Access token rejected");
        match e {
            JwtError::TokenExpired => ApiError::Unauthorized("Token has expired".to_string()),
            _ => ApiError::Unauthorized("Invalid or expired token".to_string()),
        }
    })?;

    let account_id = claims.account_id().map_err(|e| {
        tracing::error!(error = %e, "Failed to parse account ID from token");
        ApiError::Unauthorized("Invalid token format".to_string())
    })?;

    Ok(AuthenticatedAccount {
        account_id: AccountId(account_id),
        email: claims.email,
        username: claims.username,
        role: claims.role,
        token: token.to_string(),
    })
}
