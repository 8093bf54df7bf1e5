use std::env;
use std::fmt;
use std::str::FromStr;

/// Upper bound for `JWT_EXPIRATION_HOURS`: one year.
const MAX_TOKEN_HOURS: i64 = 24 * 365;

/// Startup configuration problems. These are fatal: the server does not start.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    Missing(&'static str),
    /// A variable is present but cannot be parsed.
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "Missing required environment variable: {}", key),
            ConfigError::Invalid(key, value) => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Connection settings for the Postgres credential and task stores.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
    pub sslmode: String,
}

/// Connection settings for the Redis token cache.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

pub struct Config {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    /// Signing secret. Absence is only detected when a token is issued or checked.
    pub jwt_secret: Option<String>,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
    pub server_port: u16,
    pub server_host: String,
    pub seed_demo_tasks: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let database = DatabaseConfig {
            host: required("DB_HOST")?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            name: required("DB_NAME")?,
            port: parse("DB_PORT", &required("DB_PORT")?)?,
            sslmode: required("DB_SSLMODE")?,
        };

        let redis = RedisConfig {
            host: get("REDIS_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: get("REDIS_PORT")
                .map(|v| parse("REDIS_PORT", &v))
                .transpose()?
                .unwrap_or(6379),
            password: get("REDIS_PASSWORD"),
        };

        Ok(Self {
            database,
            redis,
            jwt_secret: get("JWT_SECRET"),
            jwt_expiration_hours: in_range(
                "JWT_EXPIRATION_HOURS",
                optional(&get, "JWT_EXPIRATION_HOURS", 24)?,
                1..=MAX_TOKEN_HOURS,
            )?,
            bcrypt_cost: in_range(
                "BCRYPT_COST",
                optional(&get, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
                4..=31,
            )?,
            server_port: optional(&get, "SERVER_PORT", 8080)?,
            server_host: get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            seed_demo_tasks: optional(&get, "SEED_DEMO_TASKS", false)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(key, value.to_string()))
}

fn optional<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => parse(key, &value),
        None => Ok(default),
    }
}

fn in_range<T>(
    key: &'static str,
    value: T,
    range: std::ops::RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    T: PartialOrd + fmt::Display,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid(key, value.to_string()))
    }
}
