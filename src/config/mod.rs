//! Configuration module for the Shiftboard backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Which record store implementation backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Seeded in-memory mock data, lost on restart
    Memory,
    /// SQLite-backed table service
    Sqlite,
}

impl StoreKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mock" => Some(StoreKind::Memory),
            "sqlite" | "table" => Some(StoreKind::Sqlite),
            _ => None,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Record store implementation
    pub store: StoreKind,
    /// Path to SQLite database file (sqlite store only)
    pub db_path: PathBuf,
    /// Simulated latency for every mock store call
    pub mock_latency: Duration,
    /// Upper bound for a single table service call
    pub request_timeout: Duration,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("SHIFTBOARD_API_PSK")
            .ok()
            .filter(|psk| !psk.is_empty());

        let store = match env::var("SHIFTBOARD_STORE") {
            Ok(raw) => StoreKind::parse(&raw).ok_or_else(|| {
                AppError::Validation(format!("Invalid SHIFTBOARD_STORE value: {}", raw))
            })?,
            Err(_) => StoreKind::Memory,
        };

        let db_path = env::var("SHIFTBOARD_DB_PATH")
            .unwrap_or_else(|_| "./data/shiftboard.sqlite".to_string())
            .into();

        let mock_latency = Duration::from_millis(millis_var("SHIFTBOARD_MOCK_LATENCY_MS", 0)?);
        let request_timeout =
            Duration::from_millis(millis_var("SHIFTBOARD_REQUEST_TIMEOUT_MS", 5000)?);

        let bind_addr = env::var("SHIFTBOARD_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|_| AppError::Validation("Invalid SHIFTBOARD_BIND_ADDR format".to_string()))?;

        let log_level = env::var("SHIFTBOARD_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_psk,
            store,
            db_path,
            mock_latency,
            request_timeout,
            bind_addr,
            log_level,
        })
    }
}

fn millis_var(name: &str, default: u64) -> Result<u64, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Validation(format!("Invalid {} value: {}", name, raw))),
        Err(_) => Ok(default),
    }
}
