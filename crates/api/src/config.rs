use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use openpaws_ai::config as ai_defaults;
use openpaws_ai::AiConfig;
use openpaws_core::upload::UPLOADS_ROUTE;

/// A configuration value that is missing or could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3005`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default and minimum: two AI
    /// timeouts plus [`STORAGE_MARGIN_SECS`]).
    pub request_timeout_secs: u64,
    /// Directory of publicly served files; uploads go in its `uploads/` child.
    pub public_dir: PathBuf,
    /// Externally visible origin used to build image URLs.
    pub base_url: String,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Connection pool size (default: `10`).
    pub db_max_connections: u32,
    /// Chat-completion API settings.
    pub ai: AiConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                        |
    /// |------------------------|--------------------------------|
    /// | `HOST`                 | `0.0.0.0`                      |
    /// | `PORT`                 | `3005`                         |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`        |
    /// | `REQUEST_TIMEOUT_SECS` | `2 * OPENAI_TIMEOUT_SECS + 30` |
    /// | `PUBLIC_DIR`           | `public`                       |
    /// | `BASE_URL`             | `http://localhost:{PORT}`      |
    /// | `DATABASE_URL`         | required                       |
    /// | `DB_MAX_CONNECTIONS`   | `10`                           |
    /// | `OPENAI_API_KEY`       | unset                          |
    /// | `OPENAI_BASE_URL`      | `https://api.openai.com/v1`    |
    /// | `OPENAI_VISION_MODEL`  | `gpt-4.1-mini`                 |
    /// | `OPENAI_PROFILE_MODEL` | `gpt-3.5-turbo`                |
    /// | `OPENAI_TIMEOUT_SECS`  | `90`                           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or("PORT", var("PORT"), 3005)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let public_dir = PathBuf::from(var("PUBLIC_DIR").unwrap_or_else(|| "public".into()));
        let base_url = var("BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing {
            name: "DATABASE_URL",
        })?;
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS"), 10)?;

        let ai = AiConfig {
            api_key: var("OPENAI_API_KEY"),
            base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| ai_defaults::DEFAULT_BASE_URL.into()),
            vision_model: var("OPENAI_VISION_MODEL")
                .unwrap_or_else(|| ai_defaults::DEFAULT_VISION_MODEL.into()),
            profile_model: var("OPENAI_PROFILE_MODEL")
                .unwrap_or_else(|| ai_defaults::DEFAULT_PROFILE_MODEL.into()),
            timeout: Duration::from_secs(parse_or(
                "OPENAI_TIMEOUT_SECS",
                var("OPENAI_TIMEOUT_SECS"),
                ai_defaults::DEFAULT_TIMEOUT_SECS,
            )?),
        };

        let min_request_timeout = min_request_timeout_secs(ai.timeout);
        let request_timeout_secs = parse_or(
            "REQUEST_TIMEOUT_SECS",
            var("REQUEST_TIMEOUT_SECS"),
            min_request_timeout,
        )?;
        if request_timeout_secs < min_request_timeout {
            return Err(ConfigError::Invalid {
                name: "REQUEST_TIMEOUT_SECS",
                value: request_timeout_secs.to_string(),
                reason: format!(
                    "must be at least {min_request_timeout} (two AI calls of {}s plus {STORAGE_MARGIN_SECS}s)",
                    ai.timeout.as_secs()
                ),
            });
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_dir,
            base_url,
            database_url,
            db_max_connections,
            ai,
        })
    }

    /// Directory where uploaded images are written and served from.
    pub fn uploads_dir(&self) -> PathBuf {
        self.public_dir.join(UPLOADS_ROUTE)
    }
}

/// Upper bound for writing images and inserting the row once the AI
/// calls have returned.
pub const STORAGE_MARGIN_SECS: u64 = 30;

/// Smallest request timeout that never cuts off a request whose AI calls
/// each finish within `ai_timeout`. `generate-profile?analyze=true` makes
/// two calls in sequence.
pub fn min_request_timeout_secs(ai_timeout: Duration) -> u64 {
    2 * ai_timeout.as_secs() + STORAGE_MARGIN_SECS
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
