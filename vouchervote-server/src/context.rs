//! vouchervote-server/src/context.rs
//!
//! Wires the database handle into the repositories and services.

use std::sync::Arc;

use tracing::info;
use vouchervote_core::db::Database;
use vouchervote_core::repositories::{
    PostgresProjectRepository, PostgresVoteRepository, PostgresVoucherRepository,
};
use vouchervote_core::services::{VotingService, VoucherLoader};
use vouchervote_core::Error;

use crate::config::ServerConfig;

pub struct ServerContext {
    pub db: Database,
    pub voting: VotingService,
    pub loader: VoucherLoader,
}

impl ServerContext {
    /// Connects, applies migrations and builds the services.
    pub async fn new(config: &ServerConfig) -> Result<Self, Error> {
        let db = Database::with_max_connections(&config.db_url, config.max_connections).await?;
        db.migrate().await?;

        let pool = db.pool().clone();
        let voting = VotingService::new(
            Arc::new(PostgresProjectRepository::new(pool.clone())),
            Arc::new(PostgresVoteRepository::new(pool.clone())),
        );
        let loader = VoucherLoader::new(Arc::new(PostgresVoucherRepository::new(pool)));

        info!("Server context ready.");
        Ok(Self { db, voting, loader })
    }
}
