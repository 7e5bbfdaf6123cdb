// server/src/config.rs

use crate::errors::{AppError, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which `DocumentStore` implementation backs the collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
      "memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "pretty" | "text" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!("Invalid LOG_FORMAT '{}'", other))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  /// `None` only for the memory backend.
  pub database_url: Option<String>,
  pub db_max_connections: u32,
  pub db_connect_timeout: Duration,
  pub run_migrations: bool,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from any variable source; `from_env` passes the process environment.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let server_host = get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
    let server_port = parse_var("SERVER_PORT", get("SERVER_PORT").or_else(|| get("PORT")), 3000u16)?;

    let store_backend = match get("STORE_BACKEND") {
      Some(raw) => raw.parse::<StoreBackend>()?,
      None => StoreBackend::Postgres,
    };

    let database_url = match store_backend {
      StoreBackend::Memory => None,
      StoreBackend::Postgres => Some(match get("DATABASE_URL") {
        Some(url) => url,
        None => compose_database_url(&get)?,
      }),
    };

    let db_max_connections = parse_var("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 10u32)?;
    let db_connect_timeout = Duration::from_secs(parse_var(
      "DB_CONNECT_TIMEOUT_SECS",
      get("DB_CONNECT_TIMEOUT_SECS"),
      10u64,
    )?);
    let run_migrations = parse_var("RUN_MIGRATIONS", get("RUN_MIGRATIONS"), true)?;
    let log_format = match get("LOG_FORMAT") {
      Some(raw) => raw.parse::<LogFormat>()?,
      None => LogFormat::Pretty,
    };

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      db_max_connections,
      db_connect_timeout,
      run_migrations,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
    None => Ok(default),
  }
}

fn compose_database_url<F>(get: &F) -> Result<String>
where
  F: Fn(&str) -> Option<String>,
{
  let missing = |name: &str| AppError::Config(format!("Missing environment variable '{}' (or set DATABASE_URL)", name));
  let user = get("DB_USER").ok_or_else(|| missing("DB_USER"))?;
  let pass = get("DB_PASS").ok_or_else(|| missing("DB_PASS"))?;
  let host = get("DB_HOST").unwrap_or_else(|| "localhost".to_string());
  let name = get("DB_NAME").unwrap_or_else(|| "garments_db".to_string());
  Ok(format!("postgres://{}:{}@{}/{}", user, pass, host, name))
}
