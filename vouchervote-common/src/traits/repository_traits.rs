use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::error::Error;
use crate::models::{LoadSummary, NewProject, NewVoucher, Project, VoteReceipt, Voucher, VoucherCode};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, project: &NewProject) -> Result<Project, Error>;
    async fn get_project(&self, project_id: i32) -> Result<Option<Project>, Error>;

    /// All projects in storage order, counts included.
    async fn list_projects(&self) -> Result<Vec<Project>, Error>;
}

#[async_trait]
pub trait VoucherRepository: Send + Sync {
    async fn get_voucher_by_code(&self, code: VoucherCode) -> Result<Option<Voucher>, Error>;

    /// Inserts every voucher in one transaction. Codes that already exist are skipped.
    async fn insert_vouchers(&self, vouchers: &[NewVoucher]) -> Result<LoadSummary, Error>;
}

#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Redeems `code` for `project_id` at `at` and recomputes that project's tally,
    /// atomically. Nothing is persisted if either step fails.
    async fn cast_vote(
        &self,
        code: VoucherCode,
        project_id: i32,
        at: DateTime<Utc>,
    ) -> Result<VoteReceipt, Error>;
}
