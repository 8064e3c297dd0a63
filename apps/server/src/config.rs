use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

use crate::auth::decode_secret_key;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: String,
    pub jwt_secret: Vec<u8>,
    /// User ids allowed to reset the global ad filter taxonomy.
    pub filter_admins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("ADSCOUT_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid ADSCOUT_LISTEN_ADDR")?;
        let db_path =
            std::env::var("ADSCOUT_DB_PATH").unwrap_or_else(|_| "./db/adscout.db".into());
        let cors_allow = split_list(
            &std::env::var("ADSCOUT_CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "*".into()),
        );
        let timeout_ms: u64 = std::env::var("ADSCOUT_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .context("Invalid ADSCOUT_REQUEST_TIMEOUT_MS")?;
        let static_dir = std::env::var("ADSCOUT_STATIC_DIR").unwrap_or_else(|_| "dist".into());
        let raw_secret = std::env::var("ADSCOUT_JWT_SECRET")
            .context("ADSCOUT_JWT_SECRET must be set to the identity platform signing key")?;
        let jwt_secret = decode_secret_key(&raw_secret).context("Invalid ADSCOUT_JWT_SECRET")?;
        let filter_admins = split_list(&std::env::var("ADSCOUT_FILTER_ADMINS").unwrap_or_default());
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            static_dir,
            jwt_secret,
            filter_admins,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_entries_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            split_list(" https://app.adscout.io, ,http://localhost:5173 "),
            vec!["https://app.adscout.io", "http://localhost:5173"]
        );
        assert_eq!(split_list("*"), vec!["*"]);
        assert!(split_list("").is_empty());
    }
}
