// File: vouchervote-core/src/repositories/postgres/votes.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use vouchervote_common::error::Error;
use vouchervote_common::models::{VoteReceipt, VoucherCode};
use vouchervote_common::traits::repository_traits::VoteRepository;

use super::projects::recompute_tally;
use super::vouchers::redeem_voucher;

#[derive(Clone)]
pub struct PostgresVoteRepository {
    pool: Pool<Postgres>,
}

impl PostgresVoteRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PostgresVoteRepository {
    async fn cast_vote(
        &self,
        code: VoucherCode,
        project_id: i32,
        at: DateTime<Utc>,
    ) -> Result<VoteReceipt, Error> {
        // Dropping `tx` on any `?` below rolls the voucher update back.
        let mut tx = self.pool.begin().await?;

        let voucher = redeem_voucher(&mut *tx, code, project_id, at).await?;
        let project = recompute_tally(&mut *tx, project_id).await?;

        tx.commit().await?;
        Ok(VoteReceipt { voucher, project })
    }
}
