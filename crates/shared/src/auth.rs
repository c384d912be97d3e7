//! トークンの発行と検証
//!
//! 単一の認証情報ペアに対して HS256 署名付き JWT を発行し、
//! 保護されたリクエストごとに署名と有効期限を検証します。

use crate::config::Config;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    // 署名不一致・形式不正・期限切れを区別しない
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// JWT のペイロード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// 検証済みトークンから得られる利用者情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub username: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// ログインを受け付ける唯一の認証情報
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone)]
pub struct TokenService {
    credentials: Credentials,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, credentials: Credentials, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            credentials,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let credentials = Credentials {
            user_id: config.auth_user_id.clone(),
            username: config.auth_username.clone(),
            password: config.auth_password.clone(),
        };
        let ttl = Duration::seconds(i64::from(config.token_ttl_secs));
        Self::new(&config.app_secret, credentials, ttl)
    }

    /// 認証情報が完全一致した場合のみトークンを発行
    pub fn issue(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if username != self.credentials.username || password != self.credentials.password {
            return Err(AuthError::InvalidCredentials);
        }

        let iat = Utc::now().timestamp();
        let claims = Claims {
            user_id: self.credentials.user_id.clone(),
            username: self.credentials.username.clone(),
            iat,
            exp: iat + self.ttl.num_seconds(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| Identity::from(data.claims))
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            user_id: "1".to_string(),
            username: "admin".to_string(),
            password: "1234".to_string(),
        }
    }

    fn service() -> TokenService {
        TokenService::new("test-secret", credentials(), Duration::hours(1))
    }

    #[test]
    fn issue_then_verify_yields_identity() {
        let svc = service();

        let token = svc.issue("admin", "1234").unwrap();
        let identity = svc.verify(&token).unwrap();

        assert!(!token.is_empty());
        assert_eq!(
            identity,
            Identity {
                user_id: "1".to_string(),
                username: "admin".to_string()
            }
        );
    }

    #[test]
    fn issued_token_expires_one_hour_later() {
        let svc = service();
        let token = svc.issue("admin", "1234").unwrap();

        let data = decode::<Claims>(&token, &svc.decoding_key, &svc.validation).unwrap();
        assert_eq!(data.claims.exp - data.claims.iat, 3600);
    }

    #[test]
    fn mismatched_credentials_are_rejected() {
        let svc = service();
        for (user, pass) in [("admin", "wrong"), ("root", "1234"), ("", ""), ("Admin", "1234")] {
            assert_eq!(svc.issue(user, pass), Err(AuthError::InvalidCredentials));
        }
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = service().verify("invalidtoken").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let other = TokenService::new("other-secret", credentials(), Duration::hours(1));
        let token = other.issue("admin", "1234").unwrap();

        assert!(matches!(service().verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_invalid() {
        // 負の TTL で発行直後から期限切れのトークンを作る
        let expired = TokenService::new("test-secret", credentials(), Duration::seconds(-60));
        let token = expired.issue("admin", "1234").unwrap();

        assert!(matches!(service().verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn from_config_uses_configured_pair() {
        let config = Config::from_lookup(|key| match key {
            "APP_SECRET" => Some("k".to_string()),
            "AUTH_USERNAME" => Some("alice".to_string()),
            "AUTH_PASSWORD" => Some("pw".to_string()),
            _ => None,
        })
        .unwrap();
        let svc = TokenService::from_config(&config);

        assert_eq!(svc.issue("admin", "1234"), Err(AuthError::InvalidCredentials));
        let token = svc.issue("alice", "pw").unwrap();
        assert_eq!(svc.verify(&token).unwrap().username, "alice");
    }
}
