//! vouchervote-server/src/config.rs
//!
//! Resolves the runtime configuration: command-line flags first, then environment
//! (including `.env`), then built-in defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use vouchervote_core::http::DEFAULT_CORS_ORIGINS;
use vouchervote_core::Error;

use crate::Args;

pub const DEFAULT_DB_URL: &str = "postgres://vouchervote@localhost:5432/vouchervote";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Server,
    LoadVouchers,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub mode: Mode,
    pub server_addr: SocketAddr,
    pub db_url: String,
    pub max_connections: u32,
    pub cors_origins: Vec<String>,
    pub voucher_file: Option<PathBuf>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ServerConfig {
    pub fn from_env(args: &Args) -> Result<Self, Error> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// `env` looks up a variable by name; split out so tests don't touch the process env.
    pub fn resolve(args: &Args, env: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mode = match args.mode.as_str() {
            "server" => Mode::Server,
            "load-vouchers" => Mode::LoadVouchers,
            other => {
                return Err(Error::Config(format!(
                    "invalid mode '{}'; use --mode=server or --mode=load-vouchers",
                    other
                )))
            }
        };

        let server_addr: SocketAddr = args.server_addr.parse()?;

        let db_url = args
            .db_url
            .clone()
            .or_else(|| env("DB_URL"))
            .or_else(|| env("DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DB_URL.to_string());

        let cors_origins = match args.cors_origins.clone().or_else(|| env("CORS_ORIGINS")) {
            Some(list) => split_origins(&list),
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        let expires_at = args.expires_at.as_deref().map(parse_expiry).transpose()?;

        if mode == Mode::LoadVouchers {
            if args.voucher_file.is_none() {
                return Err(Error::Config("--voucher-file is required in load-vouchers mode".into()));
            }
            if expires_at.is_none() {
                return Err(Error::Config("--expires-at is required in load-vouchers mode".into()));
            }
        }

        Ok(Self {
            mode,
            server_addr,
            db_url,
            max_connections: args.max_connections,
            cors_origins,
            voucher_file: args.voucher_file.clone(),
            expires_at,
        })
    }
}

fn split_origins(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_expiry(raw: &str) -> Result<DateTime<Utc>, Error> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| Error::Config(format!("invalid expiry date '{}'", raw)))?;
        return Ok(midnight.and_utc());
    }
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
