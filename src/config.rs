use crate::error::ConfigError;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DEVICE_STORE_PATH: &str = ".enquete_live/device.json";
pub const DEFAULT_ACTIVE_TALK_POINTER_ID: i32 = 1;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub device_store_path: PathBuf,
    pub active_talk_pointer_id: i32,
    /// Mirror the request origin when unset.
    pub allowed_origin: Option<String>,
}

impl Config {
    /// Reads configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a local `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let device_store_path = lookup("DEVICE_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DEVICE_STORE_PATH));

        let active_talk_pointer_id = match lookup("ACTIVE_TALK_POINTER_ID") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "ACTIVE_TALK_POINTER_ID",
                value: raw,
            })?,
            None => DEFAULT_ACTIVE_TALK_POINTER_ID,
        };

        let allowed_origin = lookup("ALLOWED_ORIGIN").filter(|v| !v.is_empty());

        Ok(Config {
            database_url,
            bind_addr,
            device_store_path,
            active_talk_pointer_id,
            allowed_origin,
        })
    }
}
