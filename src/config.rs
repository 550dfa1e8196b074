use crate::errors::AppError;

pub const DEV_ACCESS_SECRET: &str = "dev-access-secret-change-me";
pub const DEV_REFRESH_SECRET: &str = "dev-refresh-secret-change-me";

/// Ten years.
pub const MAX_LIFETIME_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub log_level: String,

    pub jwt_access_secret: String,
    pub jwt_refresh_secret: String,
    pub jwt_algorithm: String,
    pub jwt_access_ttl_seconds: i64,
    pub jwt_refresh_ttl_seconds: i64,

    /// How long a logged-out access token stays on the revocation list.
    pub revocation_retention_seconds: i64,
    pub revocation_sweep_interval_seconds: u64,

    pub max_logged_body_bytes: usize,

    pub password_hash_memory_kib: u32,
    pub password_hash_iterations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            log_level: "info".to_string(),
            jwt_access_secret: DEV_ACCESS_SECRET.to_string(),
            jwt_refresh_secret: DEV_REFRESH_SECRET.to_string(),
            jwt_algorithm: "HS256".to_string(),
            jwt_access_ttl_seconds: 15 * 60,
            jwt_refresh_ttl_seconds: 7 * 24 * 60 * 60,
            revocation_retention_seconds: 24 * 60 * 60,
            revocation_sweep_interval_seconds: 5 * 60,
            max_logged_body_bytes: 1024 * 1024,
            password_hash_memory_kib: 19 * 1024,
            password_hash_iterations: 2,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: env_or("API_SERVER_ADDR", defaults.bind_addr),
            log_level: env_or("LOG_LEVEL", defaults.log_level).to_lowercase(),
            jwt_access_secret: env_or("JWT_SECRET", defaults.jwt_access_secret),
            jwt_refresh_secret: env_or("JWT_REFRESH_SECRET", defaults.jwt_refresh_secret),
            jwt_algorithm: env_or("JWT_ALGORITHM", defaults.jwt_algorithm).to_uppercase(),
            jwt_access_ttl_seconds: env_parsed(
                "JWT_ACCESS_TTL_SECONDS",
                defaults.jwt_access_ttl_seconds,
            ),
            jwt_refresh_ttl_seconds: env_parsed(
                "JWT_REFRESH_TTL_SECONDS",
                defaults.jwt_refresh_ttl_seconds,
            ),
            revocation_retention_seconds: env_parsed(
                "REVOCATION_RETENTION_SECONDS",
                defaults.revocation_retention_seconds,
            ),
            revocation_sweep_interval_seconds: env_parsed(
                "REVOCATION_SWEEP_INTERVAL_SECONDS",
                defaults.revocation_sweep_interval_seconds,
            ),
            max_logged_body_bytes: env_parsed(
                "MAX_LOGGED_BODY_BYTES",
                defaults.max_logged_body_bytes,
            ),
            password_hash_memory_kib: env_parsed(
                "PASSWORD_HASH_MEMORY_KIB",
                defaults.password_hash_memory_kib,
            ),
            password_hash_iterations: env_parsed(
                "PASSWORD_HASH_ITERATIONS",
                defaults.password_hash_iterations,
            ),
        }
    }

    /// Rejects lifetimes that cannot be turned into timestamps: each must be
    /// positive and at most `MAX_LIFETIME_SECONDS`.
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in [
            ("JWT_ACCESS_TTL_SECONDS", self.jwt_access_ttl_seconds),
            ("JWT_REFRESH_TTL_SECONDS", self.jwt_refresh_ttl_seconds),
            ("REVOCATION_RETENTION_SECONDS", self.revocation_retention_seconds),
        ] {
            if !(1..=MAX_LIFETIME_SECONDS).contains(&value) {
                return Err(AppError::Internal(format!(
                    "{name} must be between 1 and {MAX_LIFETIME_SECONDS}, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn uses_default_secrets(&self) -> bool {
        self.jwt_access_secret == DEV_ACCESS_SECRET || self.jwt_refresh_secret == DEV_REFRESH_SECRET
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
