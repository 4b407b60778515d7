use crate::error::ConfigError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Runtime settings, read from the environment after `.env` is loaded.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// `DATABASE_URL` wins; otherwise the url is built from `HOST`,
    /// `USERNAME`, `PASSWORD` and `DB_NAME`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let max_connections = parse_or(&lookup, "MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let host = lookup("HOST").ok_or(ConfigError::Missing("HOST"))?;
                let username = lookup("USERNAME").ok_or(ConfigError::Missing("USERNAME"))?;
                let password = lookup("PASSWORD").ok_or(ConfigError::Missing("PASSWORD"))?;
                let db_name = lookup("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?;
                format!("postgres://{}:{}@{}/{}", username, password, host, db_name)
            }
        };

        Ok(AppConfig {
            port,
            database_url,
            max_connections,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
