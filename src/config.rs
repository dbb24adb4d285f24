use std::fmt;

use anyhow::{bail, Context};
use tracing::warn;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "./static";
const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_address: String,
    pub static_dir: String,
    pub db_pool_size: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL not found")?;
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET not found")?;
        if jwt_secret.is_empty() {
            bail!("JWT_SECRET is empty");
        }

        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| {
            warn!("BIND_ADDRESS not set, using {}", DEFAULT_BIND_ADDRESS);
            DEFAULT_BIND_ADDRESS.to_string()
        });
        let static_dir =
            std::env::var("STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());
        let db_pool_size = match std::env::var("DB_POOL_SIZE") {
            Ok(size) => size
                .parse()
                .with_context(|| format!("invalid DB_POOL_SIZE '{}'", size))?,
            Err(_) => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_address,
            static_dir,
            db_pool_size,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"<redacted>")
            .field("jwt_secret", &"<redacted>")
            .field("bind_address", &self.bind_address)
            .field("static_dir", &self.static_dir)
            .field("db_pool_size", &self.db_pool_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_credentials() {
        let config = Config {
            database_url: "mysql://root:hunter2@db/turnos".to_string(),
            jwt_secret: "super-secret-signing-key".to_string(),
            bind_address: "127.0.0.1:3000".to_string(),
            static_dir: "./static".to_string(),
            db_pool_size: 10,
        };
        let out = format!("{:?}", config);
        assert!(!out.contains("hunter2"));
        assert!(!out.contains("super-secret-signing-key"));
        assert!(out.contains("127.0.0.1:3000"));
    }
}
