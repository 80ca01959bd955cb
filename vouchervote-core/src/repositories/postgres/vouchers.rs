// File: vouchervote-core/src/repositories/postgres/vouchers.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};
use vouchervote_common::error::Error;
use vouchervote_common::models::{LoadSummary, NewVoucher, Voucher, VoucherCode};
use vouchervote_common::traits::repository_traits::VoucherRepository;

#[derive(Clone)]
pub struct PostgresVoucherRepository {
    pool: Pool<Postgres>,
}

impl PostgresVoucherRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoucherRepository for PostgresVoucherRepository {
    async fn get_voucher_by_code(&self, code: VoucherCode) -> Result<Option<Voucher>, Error> {
        let row = sqlx::query_as::<_, Voucher>(
            r#"
            SELECT "VoucherID", "Voucher", "ExpiryDate", "Used", "ProjectID"
            FROM voucher_codes
            WHERE "Voucher" = $1
            "#,
        )
            .bind(code.value())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn insert_vouchers(&self, vouchers: &[NewVoucher]) -> Result<LoadSummary, Error> {
        let mut tx = self.pool.begin().await?;
        let mut summary = LoadSummary {
            read: vouchers.len(),
            ..LoadSummary::default()
        };

        for v in vouchers {
            let result = sqlx::query(
                r#"
                INSERT INTO voucher_codes ("Voucher", "ExpiryDate", "Used")
                VALUES ($1, $2, FALSE)
                ON CONFLICT ("Voucher") DO NOTHING
                "#,
            )
                .bind(v.code.value())
                .bind(v.expiry_date)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 1 {
                summary.inserted += 1;
            } else {
                summary.skipped += 1;
            }
        }

        tx.commit().await?;
        Ok(summary)
    }
}

/// Consumes the voucher `code` for `project_id` inside the caller's transaction.
///
/// The voucher row stays locked until the transaction ends, so a second redemption of
/// the same code waits and then observes `Used = TRUE`.
pub async fn redeem_voucher(
    conn: &mut PgConnection,
    code: VoucherCode,
    project_id: i32,
    at: DateTime<Utc>,
) -> Result<Voucher, Error> {
    let mut voucher = sqlx::query_as::<_, Voucher>(
        r#"
        SELECT "VoucherID", "Voucher", "ExpiryDate", "Used", "ProjectID"
        FROM voucher_codes
        WHERE "Voucher" = $1
        FOR UPDATE
        "#,
    )
        .bind(code.value())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(Error::VoucherNotFound(code.value()))?;

    voucher.redeem(project_id, at)?;

    sqlx::query(
        r#"
        UPDATE voucher_codes
        SET "Used" = $1,
            "ProjectID" = $2,
            "ExpiryDate" = $3
        WHERE "VoucherID" = $4
        "#,
    )
        .bind(voucher.used)
        .bind(voucher.project_id)
        .bind(voucher.expiry_date)
        .bind(voucher.voucher_id)
        .execute(&mut *conn)
        .await?;

    Ok(voucher)
}
