use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod context;
mod server;

use config::{Mode, ServerConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "vouchervote")]
#[command(author, version, about = "Voucher-based project voting API")]
pub struct Args {
    /// Mode: "server" or "load-vouchers"
    #[arg(long, default_value = "server")]
    mode: String,

    /// Address to which the HTTP server will bind
    #[arg(long, default_value = "0.0.0.0:8000")]
    server_addr: String,

    /// Postgres connection URL. Falls back to DB_URL, then DATABASE_URL.
    #[arg(long)]
    db_url: Option<String>,

    /// Maximum pooled Postgres connections
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Comma-separated allowed CORS origins. Falls back to CORS_ORIGINS.
    #[arg(long)]
    cors_origins: Option<String>,

    /// Newline-delimited voucher codes (load-vouchers mode)
    #[arg(long)]
    voucher_file: Option<PathBuf>,

    /// Expiry for loaded vouchers: YYYY-MM-DD or RFC 3339 (load-vouchers mode)
    #[arg(long)]
    expires_at: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("vouchervote=info".parse().unwrap_or_default())
        .add_directive("vouchervote_core=info".parse().unwrap_or_default())
        .add_directive("tower_http=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
    // sqlx reports through `log`.
    let _ = tracing_log::LogTracer::init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let config = ServerConfig::from_env(&args)?;
    info!("vouchervote starting. mode={:?}, addr={}", config.mode, config.server_addr);

    let result = match config.mode {
        Mode::Server => server::run_server(config).await,
        Mode::LoadVouchers => server::run_voucher_load(config).await,
    };
    if let Err(e) = &result {
        error!("Fatal error: {}", e);
    }
    result?;

    info!("Main finished. Goodbye!");
    Ok(())
}
