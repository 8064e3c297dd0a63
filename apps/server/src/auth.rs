//! Bearer-token identity for API requests.
//!
//! Tokens are minted by the identity platform and signed with a shared HS256
//! key. The `sub` claim is the user id and the optional `org` claim is the
//! selected organization. When `org` is absent the caller's stored active
//! organization is used, provided they are still a member of it.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use adscout_core::{Error as CoreError, RequestContext};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthManager {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Signs a token the way the identity platform does. Used by tooling and tests.
    pub fn issue_token(
        &self,
        user_id: &str,
        organization_id: Option<&str>,
        ttl: Duration,
    ) -> ApiResult<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| ApiError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            org: organization_id.map(str::to_string),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, CoreError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!("Rejected bearer token: {:?}", err.kind());
                CoreError::NotAuthenticated
            })
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() != 32 {
        anyhow::bail!("JWT secret must decode to exactly 32 bytes");
    }

    Ok(decoded)
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;
    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return None;
    };
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

async fn resolve_context(state: &AppState, claims: Claims) -> ApiResult<RequestContext> {
    let ctx = RequestContext::new(claims.sub, claims.org);
    if ctx.organization_id.is_some() {
        return Ok(ctx);
    }
    let profile = state.profile_service.get_current_profile(&ctx).await?;
    let active = match profile.active_organization_id {
        Some(org) if state.organization_service.is_member(&org, &ctx.user_id)? => Some(org),
        _ => None,
    };
    Ok(RequestContext::new(ctx.user_id, active))
}

/// Validates the bearer token and stores the caller's [`RequestContext`] in
/// the request extensions. Fails with 401 before any handler runs.
pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> ApiResult<Response> {
    let token = bearer_token(&request).ok_or(CoreError::NotAuthenticated)?;
    let claims = state.auth.validate_token(token)?;
    let ctx = resolve_context(&state, claims).await?;
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn issued_token_round_trips_claims() {
        let auth = AuthManager::new(SECRET);
        let token = auth
            .issue_token("user-1", Some("org-a"), Duration::from_secs(60))
            .unwrap();
        let claims = auth.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.org.as_deref(), Some("org-a"));
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let issuer = AuthManager::new(b"ffffffffffffffffffffffffffffffff");
        let token = issuer
            .issue_token("user-1", None, Duration::from_secs(60))
            .unwrap();
        let auth = AuthManager::new(SECRET);
        assert!(matches!(
            auth.validate_token(&token),
            Err(CoreError::NotAuthenticated)
        ));
        assert!(matches!(
            auth.validate_token("not-a-jwt"),
            Err(CoreError::NotAuthenticated)
        ));
    }

    #[test]
    fn secret_accepts_base64_or_raw_ascii() {
        let encoded = BASE64.encode(SECRET);
        assert_eq!(decode_secret_key(&encoded).unwrap(), SECRET.to_vec());
        assert_eq!(
            decode_secret_key("adscout-local-dev-secret-32bytes").unwrap(),
            b"adscout-local-dev-secret-32bytes".to_vec()
        );
        assert!(decode_secret_key("").is_err());
        assert!(decode_secret_key("short").is_err());
    }

    #[test]
    fn bearer_scheme_is_required() {
        let request = Request::builder()
            .header(AUTHORIZATION, "Basic abc")
            .body(Body::empty())
            .unwrap();
        assert!(bearer_token(&request).is_none());

        let request = Request::builder()
            .header(AUTHORIZATION, "bearer  token-value ")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request), Some("token-value"));
    }
}
