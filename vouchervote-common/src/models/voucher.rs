// File: vouchervote-common/src/models/voucher.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::project::Project;

/// A numeric voucher code as typed by a voter. Leading zeros are not significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoucherCode(pub i64);

impl VoucherCode {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl FromStr for VoucherCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        if digits.is_empty() {
            return Err("voucher code is empty".into());
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("voucher code '{}' must contain only digits", digits).into());
        }
        digits
            .parse::<i64>()
            .map(VoucherCode)
            .map_err(|e| Error::from(format!("voucher code '{}' is out of range: {}", digits, e)))
    }
}

impl fmt::Display for VoucherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A row of `voucher_codes`.
///
/// A voucher starts unused with no project. Redemption is the only transition and it is
/// terminal: `used` becomes true, `project_id` is set and `expiry_date` moves to the
/// redemption instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Voucher {
    #[sqlx(rename = "VoucherID")]
    pub voucher_id: i32,
    #[sqlx(rename = "Voucher")]
    pub code: i64,
    #[sqlx(rename = "ExpiryDate")]
    pub expiry_date: DateTime<Utc>,
    #[sqlx(rename = "Used")]
    pub used: bool,
    #[sqlx(rename = "ProjectID")]
    pub project_id: Option<i32>,
}

impl Voucher {
    /// A voucher can be redeemed while it is unused and `now` is strictly before its expiry.
    pub fn ensure_redeemable(&self, now: DateTime<Utc>) -> Result<(), Error> {
        if self.used {
            return Err(Error::VoucherUsed(self.code));
        }
        if now >= self.expiry_date {
            return Err(Error::VoucherExpired(self.code));
        }
        Ok(())
    }

    pub fn redeem(&mut self, project_id: i32, now: DateTime<Utc>) -> Result<(), Error> {
        self.ensure_redeemable(now)?;
        self.used = true;
        self.project_id = Some(project_id);
        self.expiry_date = now;
        Ok(())
    }
}

/// A voucher as produced by the bulk loader, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVoucher {
    pub code: VoucherCode,
    pub expiry_date: DateTime<Utc>,
}

/// Outcome of a successful vote: the consumed voucher and the project with its fresh tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub voucher: Voucher,
    pub project: Project,
}

/// Counts reported after a bulk voucher load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub read: usize,
    pub inserted: usize,
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn unused(expiry: DateTime<Utc>) -> Voucher {
        Voucher {
            voucher_id: 1,
            code: 1234,
            expiry_date: expiry,
            used: false,
            project_id: None,
        }
    }

    #[test]
    fn parses_codes() {
        assert_eq!("1234".parse::<VoucherCode>().unwrap(), VoucherCode(1234));
        assert_eq!(" 0042\n".parse::<VoucherCode>().unwrap(), VoucherCode(42));
        assert!("".parse::<VoucherCode>().is_err());
        assert!("12a4".parse::<VoucherCode>().is_err());
        assert!("-12".parse::<VoucherCode>().is_err());
        assert!("99999999999999999999".parse::<VoucherCode>().is_err());
    }

    #[test]
    fn redeem_marks_voucher_used() {
        let expiry = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();
        let now = Utc::now();
        let mut v = unused(expiry);

        v.redeem(7, now).unwrap();
        assert!(v.used);
        assert_eq!(v.project_id, Some(7));
        assert_eq!(v.expiry_date, now);

        let err = v.redeem(8, now).unwrap_err();
        assert!(matches!(err, Error::VoucherUsed(1234)));
        assert_eq!(v.project_id, Some(7));
    }

    #[test]
    fn expiry_is_exclusive() {
        let now = Utc::now();
        let mut at_expiry = unused(now);
        assert!(matches!(at_expiry.redeem(1, now), Err(Error::VoucherExpired(1234))));
        assert!(!at_expiry.used);

        let past = unused(now - Duration::days(1));
        assert!(matches!(past.ensure_redeemable(now), Err(Error::VoucherExpired(_))));

        let future = unused(now + Duration::seconds(1));
        assert!(future.ensure_redeemable(now).is_ok());
    }
}
