// File: vouchervote-core/src/test_utils/memory.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use vouchervote_common::error::Error;
use vouchervote_common::models::{
    LoadSummary, NewProject, NewVoucher, Project, VoteReceipt, Voucher, VoucherCode,
};
use vouchervote_common::traits::repository_traits::{
    ProjectRepository, VoteRepository, VoucherRepository,
};

#[derive(Default)]
struct MemoryState {
    projects: Vec<Project>,
    vouchers: Vec<Voucher>,
}

/// Implements every repository trait over one mutex-guarded state. A vote holds the lock
/// for its whole duration and only writes back once both steps succeeded, which mirrors
/// the transactional Postgres implementation.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a project with an explicit id and count, bypassing id assignment.
    pub async fn put_project(&self, project: Project) {
        let mut state = self.state.lock().await;
        state.projects.retain(|p| p.project_id != project.project_id);
        state.projects.push(project);
    }

    pub async fn vouchers(&self) -> Vec<Voucher> {
        self.state.lock().await.vouchers.clone()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn create_project(&self, project: &NewProject) -> Result<Project, Error> {
        let mut state = self.state.lock().await;
        if state.projects.iter().any(|p| p.project_name == project.project_name) {
            return Err(Error::Database(sqlx::Error::Protocol(format!(
                "duplicate ProjectName '{}'",
                project.project_name
            ))));
        }

        let project_id = state.projects.iter().map(|p| p.project_id).max().unwrap_or(0) + 1;
        let created = Project {
            project_id,
            project_name: project.project_name.clone(),
            project_country: project.project_country.clone(),
            icon_code: project.icon_code.clone(),
            graph_colour: project.graph_colour.clone(),
            vote_count: None,
        };
        state.projects.push(created.clone());
        Ok(created)
    }

    async fn get_project(&self, project_id: i32) -> Result<Option<Project>, Error> {
        let state = self.state.lock().await;
        Ok(state.projects.iter().find(|p| p.project_id == project_id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, Error> {
        Ok(self.state.lock().await.projects.clone())
    }
}

#[async_trait]
impl VoucherRepository for InMemoryStore {
    async fn get_voucher_by_code(&self, code: VoucherCode) -> Result<Option<Voucher>, Error> {
        let state = self.state.lock().await;
        Ok(state.vouchers.iter().find(|v| v.code == code.value()).cloned())
    }

    async fn insert_vouchers(&self, vouchers: &[NewVoucher]) -> Result<LoadSummary, Error> {
        let mut state = self.state.lock().await;
        let mut summary = LoadSummary {
            read: vouchers.len(),
            ..LoadSummary::default()
        };

        for nv in vouchers {
            if state.vouchers.iter().any(|v| v.code == nv.code.value()) {
                summary.skipped += 1;
                continue;
            }
            let voucher_id = state.vouchers.len() as i32 + 1;
            state.vouchers.push(Voucher {
                voucher_id,
                code: nv.code.value(),
                expiry_date: nv.expiry_date,
                used: false,
                project_id: None,
            });
            summary.inserted += 1;
        }
        Ok(summary)
    }
}

#[async_trait]
impl VoteRepository for InMemoryStore {
    async fn cast_vote(
        &self,
        code: VoucherCode,
        project_id: i32,
        at: DateTime<Utc>,
    ) -> Result<VoteReceipt, Error> {
        let mut state = self.state.lock().await;

        let voucher_idx = state
            .vouchers
            .iter()
            .position(|v| v.code == code.value())
            .ok_or(Error::VoucherNotFound(code.value()))?;
        let mut voucher = state.vouchers[voucher_idx].clone();
        voucher.redeem(project_id, at)?;

        let project_idx = state
            .projects
            .iter()
            .position(|p| p.project_id == project_id)
            .ok_or(Error::ProjectNotFound(project_id))?;

        // Count as the transaction would see it: committed rows plus this voucher.
        let count = state
            .vouchers
            .iter()
            .enumerate()
            .filter(|(i, v)| *i != voucher_idx && v.project_id == Some(project_id))
            .count() as i32
            + 1;

        state.vouchers[voucher_idx] = voucher.clone();
        let project = &mut state.projects[project_idx];
        project.apply_tally(count);

        Ok(VoteReceipt {
            voucher,
            project: project.clone(),
        })
    }
}
