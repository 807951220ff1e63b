use http::HeaderMap;

use crate::error::GatewayError;

pub trait AuthProvider: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Result<(), GatewayError>;
}

/// Accepts exactly one bearer secret.
///
/// Only the blake3 digest of the secret is kept; `blake3::Hash` equality is
/// constant-time.
#[derive(Debug, Clone)]
pub struct SharedKeyAuth {
    key_hash: blake3::Hash,
}

impl SharedKeyAuth {
    pub fn new(api_key: &str) -> Self {
        Self {
            key_hash: blake3::hash(api_key.as_bytes()),
        }
    }
}

impl AuthProvider for SharedKeyAuth {
    fn authenticate(&self, headers: &HeaderMap) -> Result<(), GatewayError> {
        let token = extract_bearer(headers)
            .ok_or_else(|| GatewayError::unauthorized("bearer token authentication required"))?;
        if blake3::hash(token.as_bytes()) != self.key_hash {
            return Err(GatewayError::invalid_api_key("invalid api key"));
        }
        Ok(())
    }
}

/// `Authorization: Bearer <token>`; anything else counts as no credential.
fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let auth = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;
    let token = auth.strip_prefix("Bearer ")?;
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use http::{HeaderValue, StatusCode};

    use super::*;
    use crate::error::ErrorCode;

    fn headers(auth: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(auth) = auth {
            headers.insert(
                http::header::AUTHORIZATION,
                HeaderValue::from_str(auth).unwrap(),
            );
        }
        headers
    }

    #[test]
    fn accepts_matching_key() {
        let auth = SharedKeyAuth::new("sk-test");
        assert!(auth.authenticate(&headers(Some("Bearer sk-test"))).is_ok());
    }

    #[test]
    fn missing_or_malformed_is_unauthorized() {
        let auth = SharedKeyAuth::new("sk-test");
        for value in [None, Some("sk-test"), Some("Basic c2stdGVzdA=="), Some("Bearer "), Some("bearer sk-test")] {
            let err = auth.authenticate(&headers(value)).unwrap_err();
            assert_eq!(err.status, StatusCode::UNAUTHORIZED, "{value:?}");
            assert_eq!(err.code, ErrorCode::Unauthorized);
        }
    }

    #[test]
    fn wrong_key_is_forbidden() {
        let auth = SharedKeyAuth::new("sk-test");
        for value in ["Bearer sk-wrong", "Bearer sk-test ", "Bearer SK-TEST"] {
            let err = auth.authenticate(&headers(Some(value))).unwrap_err();
            assert_eq!(err.status, StatusCode::FORBIDDEN, "{value:?}");
            assert_eq!(err.code, ErrorCode::InvalidApiKey);
        }
    }
}
