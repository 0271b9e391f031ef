use std::env;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub admin: AdminBootstrapConfig,
    pub alerts: AlertPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Allowed requests per second (per IP) for auth endpoints (e.g. /api/auth/login)
    pub auth_per_second: u32,
    /// Burst size for auth endpoints
    pub auth_burst: u32,
}

/// Credentials for the superuser that is ensured at startup.
/// Both values must be present for the bootstrap to run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminBootstrapConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Thresholds used by the reminder engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AlertPolicy {
    /// Documents expiring within this many days (inclusive) raise an alert.
    pub expiry_warning_days: i64,
    /// A fuel reminder is raised once the last fill is older than this.
    pub fuel_stale_days: i64,
    /// A trip reminder is raised once the last trip is older than this.
    pub trip_stale_days: i64,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        AlertPolicy {
            expiry_warning_days: 7,
            fuel_stale_days: 15,
            trip_stale_days: 7,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = AlertPolicy::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,
                frontend_url: env::var("FRONTEND_URL")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://data/fuelpulse.db".to_string()),
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", 5),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET")
                    .map_err(|_| ConfigError::MissingEnv("JWT_SECRET".to_string()))?,
                expiration_hours: env_or("JWT_EXPIRATION_HOURS", 24),
            },
            rate_limit: RateLimitConfig {
                auth_per_second: env_or("RATE_LIMIT_AUTH_PER_SECOND", 3),
                auth_burst: env_or("RATE_LIMIT_AUTH_BURST", 10),
            },
            admin: AdminBootstrapConfig {
                username: env::var("ADMIN_USERNAME").ok().filter(|v| !v.is_empty()),
                password: env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
            },
            alerts: AlertPolicy {
                expiry_warning_days: env_or("EXPIRY_WARNING_DAYS", defaults.expiry_warning_days),
                fuel_stale_days: env_or("FUEL_STALE_DAYS", defaults.fuel_stale_days),
                trip_stale_days: env_or("TRIP_STALE_DAYS", defaults.trip_stale_days),
            },
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                frontend_url: "http://localhost:3000".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://data/fuelpulse.db".to_string(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: String::new(),
                expiration_hours: 24,
            },
            rate_limit: RateLimitConfig {
                auth_per_second: 3,
                auth_burst: 10,
            },
            admin: AdminBootstrapConfig::default(),
            alerts: AlertPolicy::default(),
        }
    }
}
