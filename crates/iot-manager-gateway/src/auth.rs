//! Authentication middleware and extractors.
//!
//! [`require_identity`] decodes the bearer token of every management request
//! into an [`Identity`] request extension. Handlers then take a
//! [`ManagementUser`], which enforces that the caller is a user.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use iot_manager_app::App;
use iot_manager_auth::{AuthError, Identity, IdentityDecoder};
use iot_manager_core::TenantId;

use crate::error::ApiError;
use crate::state::GatewayState;

/// Middleware that attaches the caller's identity to the request.
///
/// # Errors
///
/// Returns `401` if the `Authorization: Bearer <token>` header is missing
/// or the token does not decode into an identity.
pub async fn require_identity<A, D>(
    State(state): State<Arc<GatewayState<A, D>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    A: App + 'static,
    D: IdentityDecoder + 'static,
{
    let token = bearer_token(request.headers())?;
    let identity = state.identity.decode(token)?;

    tracing::debug!(
        subject = %identity.subject,
        tenant_id = %identity.tenant,
        is_user = identity.is_user,
        "Authenticated request"
    );

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Extract the token of an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("non-ASCII authorization header".to_string()))?;

    match value.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
        {
            Ok(token.trim())
        }
        _ => Err(AuthError::InvalidToken("expected a bearer token".to_string())),
    }
}

/// An authenticated user allowed to use the management API.
///
/// Extracting this value applies the management authorization policy, so
/// it must precede any body extractor in a handler's arguments.
#[derive(Debug, Clone)]
pub struct ManagementUser {
    /// The caller's identity.
    pub identity: Identity,
    /// The tenant every operation of the request is scoped to.
    pub tenant: TenantId,
}

impl<S> FromRequestParts<S> for ManagementUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(ApiError::MissingAuthorization)?;

        identity.require_user()?;

        Ok(Self {
            tenant: identity.tenant_id(),
            identity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn rejects_missing_header() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingAuthorization)
        ));
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(matches!(
            bearer_token(&headers("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidToken(_))
        ));
        assert!(bearer_token(&headers("Bearer ")).is_err());
        assert!(bearer_token(&headers("Bearer")).is_err());
    }

    #[tokio::test]
    async fn management_user_requires_user_flag() {
        let (mut parts, ()) = axum::http::Request::new(()).into_parts();
        parts.extensions.insert(Identity::device("t1", "dev-1"));
        let err = ManagementUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));

        let (mut parts, ()) = axum::http::Request::new(()).into_parts();
        parts.extensions.insert(Identity::user("t1", "u1"));
        let user = ManagementUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.tenant, TenantId::new("t1"));
    }

    #[tokio::test]
    async fn management_user_requires_identity() {
        let (mut parts, ()) = axum::http::Request::new(()).into_parts();
        let err = ManagementUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingAuthorization));
    }
}
