use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

/// API key settings shared by every `/api` route.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub api_key: String,
    pub header_name: String,
    /// Skips the API key check. Never enable outside local testing.
    pub test_mode: bool,
    /// Only loopback peers may call the API.
    pub local_only: bool,
}

#[derive(Debug, Clone)]
pub struct GmailConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub target_label: String,
    pub max_results: u32,
}

impl GmailConfig {
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty() && !self.refresh_token.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub to_file: bool,
    pub dir: String,
    pub file_name: String,
    pub max_bytes: u64,
    pub max_files: usize,
    pub default_filter: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub application_name: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub gmail: GmailConfig,
    pub kabutan_base_url: String,
    pub logging: LogConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let production = or("APP_ENV", "development").eq_ignore_ascii_case("production");

        let host = or("HOST", "127.0.0.1");
        let port: u16 = parse_or(&get, "PORT", 8001)?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                key: "HOST",
                value: host.clone(),
            })?;
        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let database = DatabaseConfig {
            url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            pool_size: parse_or(&get, "DB_POOL_SIZE", 10)?,
        };

        let test_mode = parse_bool(&get, "APP_TEST_MODE", false)?;
        let api_key = match get("API_KEY") {
            Some(key) => key,
            None if test_mode => String::new(),
            None => return Err(ConfigError::Missing("API_KEY")),
        };
        let auth = AuthConfig {
            api_key,
            header_name: or("API_KEY_HEADER", "X-Api-Key"),
            test_mode,
            local_only: parse_bool(&get, "LOCAL_ONLY", true)?,
        };

        let gmail = GmailConfig {
            client_id: or("GMAIL_CLIENT_ID", ""),
            client_secret: or("GMAIL_CLIENT_SECRET", ""),
            refresh_token: or("GMAIL_REFRESH_TOKEN", ""),
            target_label: or("GMAIL_TARGET_LABEL", "INBOX"),
            max_results: parse_or(&get, "GMAIL_MAX_RESULTS", 1)?,
        };

        let (default_file, default_max, default_filter) = if production {
            ("prd.log", 20 * 1024 * 1024, "info,tower_http=info,axum=info")
        } else {
            ("dev.log", 10 * 1024, "debug,tower_http=debug,axum=info")
        };
        let logging = LogConfig {
            to_file: parse_bool(&get, "LOG_TO_FILE", true)?,
            dir: or("LOG_DIR", "./logs"),
            file_name: or("LOG_FILE", default_file),
            max_bytes: parse_or(&get, "LOG_MAX_BYTES", default_max)?,
            max_files: parse_or(&get, "LOG_MAX_FILES", 5)?,
            default_filter: default_filter.to_string(),
        };

        Ok(Self {
            application_name: or("APPLICATION_NAME", "personal-ledger-api"),
            server: ServerConfig {
                addr,
                allowed_origins,
            },
            database,
            auth,
            gmail,
            kabutan_base_url: or("KABUTAN_BASE_URL", "https://kabutan.jp")
                .trim_end_matches('/')
                .to_string(),
            logging,
        })
    }
}

fn parse_or<G, T>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

fn parse_bool<G>(get: &G, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value: raw }),
        },
        None => Ok(default),
    }
}
