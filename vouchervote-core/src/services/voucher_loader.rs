//! Bulk seeding of voucher codes from a newline-delimited text file.
//!
//! Every non-blank line must be a numeric code. The whole file is parsed before anything
//! is written, so a bad line leaves the table untouched. Inserting is idempotent: codes
//! already present are counted as skipped.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use crate::Error;

use vouchervote_common::models::{LoadSummary, NewVoucher, VoucherCode};
use vouchervote_common::traits::repository_traits::VoucherRepository;

pub struct VoucherLoader {
    vouchers: Arc<dyn VoucherRepository>,
}

impl VoucherLoader {
    pub fn new(vouchers: Arc<dyn VoucherRepository>) -> Self {
        Self { vouchers }
    }

    pub async fn load_file(&self, path: &Path, expiry: DateTime<Utc>) -> Result<LoadSummary, Error> {
        let text = tokio::fs::read_to_string(path).await?;
        let codes = parse_codes(&text)?;
        info!("Read {} voucher codes from {}", codes.len(), path.display());

        let summary = self.load_codes(&codes, expiry).await?;
        info!(
            "Voucher load finished: read={}, inserted={}, skipped={}",
            summary.read, summary.inserted, summary.skipped
        );
        Ok(summary)
    }

    pub async fn load_codes(&self, codes: &[VoucherCode], expiry: DateTime<Utc>) -> Result<LoadSummary, Error> {
        let vouchers: Vec<NewVoucher> = codes
            .iter()
            .map(|&code| NewVoucher { code, expiry_date: expiry })
            .collect();
        self.vouchers.insert_vouchers(&vouchers).await
    }
}

/// One code per line; blank lines are ignored.
pub fn parse_codes(text: &str) -> Result<Vec<VoucherCode>, Error> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            line.parse::<VoucherCode>()
                .map_err(|e| Error::Parse(format!("line {}: {}", idx + 1, e)))
        })
        .collect()
}
