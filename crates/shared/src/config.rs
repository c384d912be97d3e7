use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// 起動時に注入する設定値
///
/// 認証情報とトークン署名鍵はロジックに埋め込まず、ここから渡します。
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub app_secret: String,
    pub auth_user_id: String,
    pub auth_username: String,
    pub auth_password: String,
    pub token_ttl_secs: u32,
}

// シークレットとパスワードはログに出さない
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("auth_user_id", &self.auth_user_id)
            .field("auth_username", &self.auth_username)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を組み立てる（テストで環境変数を汚さないため）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_secret = lookup("APP_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("APP_SECRET"))?;

        Ok(Config {
            host: parse_or(&lookup, "HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
            port: parse_or(&lookup, "PORT", 3000)?,
            app_secret,
            auth_user_id: lookup("AUTH_USER_ID").unwrap_or_else(|| "1".to_string()),
            auth_username: lookup("AUTH_USERNAME").unwrap_or_else(|| "admin".to_string()),
            auth_password: lookup("AUTH_PASSWORD").unwrap_or_else(|| "1234".to_string()),
            token_ttl_secs: parse_or(&lookup, "TOKEN_TTL_SECS", 3600)?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
