use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AuthError;

/// Raw session token taken from `Authorization: Bearer <token>`.
/// Verification happens in the session accessor, not here.
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::Unauthorized)?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Unauthorized)?;

        Ok(BearerToken(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<BearerToken, AuthError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).expect("request").into_parts();
        BearerToken::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_bearer_scheme() {
        let BearerToken(token) = extract(Some("Bearer abc.def.ghi")).await.expect("token");
        assert_eq!(token, "abc.def.ghi");
        let BearerToken(token) = extract(Some("bearer xyz")).await.expect("token");
        assert_eq!(token, "xyz");
    }

    #[tokio::test]
    async fn rejects_missing_or_foreign_scheme() {
        assert!(matches!(extract(None).await, Err(AuthError::Unauthorized)));
        assert!(matches!(
            extract(Some("Basic dXNlcjpwYXNz")).await,
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(extract(Some("Bearer ")).await, Err(AuthError::Unauthorized)));
    }
}
