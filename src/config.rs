use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_EMBED_BASE_URL, DEFAULT_JWT_TTL_HOURS};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Directory holding mediamtx.yml, tokens.json, rooms.json and users.json
    pub config_dir: PathBuf,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    /// HS256 secret for login tokens
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    /// Base URL of the external viewer that consumes camera tokens
    pub embed_base_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let config_dir = env::var("CONFIG_DIR")
            .unwrap_or_else(|_| "config".to_string())
            .into();

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set to sign login tokens")?;
        if jwt_secret.is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }

        let jwt_ttl_hours = match env::var("JWT_TTL_HOURS") {
            Ok(raw) => raw
                .parse()
                .ok()
                .filter(|hours: &i64| *hours > 0)
                .ok_or("Invalid JWT_TTL_HOURS")?,
            Err(_) => DEFAULT_JWT_TTL_HOURS,
        };

        let embed_base_url = env::var("EMBED_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_EMBED_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            server_host,
            server_port,
            config_dir,
            allowed_origins,
            environment,
            jwt_secret,
            jwt_ttl_hours,
            embed_base_url,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
