use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use crate::Error;

use vouchervote_common::error::ErrorKind;
use vouchervote_common::models::{ProjectVotes, VoteReceipt, VoucherCode};
use vouchervote_common::traits::repository_traits::{ProjectRepository, VoteRepository};

/// Casts votes and reads tallies. Holds the storage handles it is given; no global state.
#[derive(Clone)]
pub struct VotingService {
    projects: Arc<dyn ProjectRepository>,
    votes: Arc<dyn VoteRepository>,
}

impl VotingService {
    pub fn new(projects: Arc<dyn ProjectRepository>, votes: Arc<dyn VoteRepository>) -> Self {
        Self { projects, votes }
    }

    /// Redeems `code` for `project_id` and refreshes that project's tally.
    pub async fn vote(&self, code: VoucherCode, project_id: i32) -> Result<VoteReceipt, Error> {
        let now = Utc::now();
        match self.votes.cast_vote(code, project_id, now).await {
            Ok(receipt) => {
                info!(
                    "Voucher {} redeemed for project {} (vote_count={:?})",
                    code, project_id, receipt.project.vote_count
                );
                Ok(receipt)
            }
            Err(e) => {
                if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::InvalidState) {
                    warn!("Vote rejected for voucher {} / project {}: {}", code, project_id, e);
                }
                Err(e)
            }
        }
    }

    pub async fn votes_summary(&self) -> Result<Vec<ProjectVotes>, Error> {
        let projects = self.projects.list_projects().await?;
        Ok(projects.into_iter().map(ProjectVotes::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use mockall::mock;
    use mockall::predicate::eq;
    use vouchervote_common::models::{NewProject, Project, Voucher};

    mock! {
        ProjectRepo {}
        #[async_trait]
        impl ProjectRepository for ProjectRepo {
            async fn create_project(&self, project: &NewProject) -> Result<Project, Error>;
            async fn get_project(&self, project_id: i32) -> Result<Option<Project>, Error>;
            async fn list_projects(&self) -> Result<Vec<Project>, Error>;
        }
    }

    mock! {
        VoteRepo {}
        #[async_trait]
        impl VoteRepository for VoteRepo {
            async fn cast_vote(&self, code: VoucherCode, project_id: i32, at: DateTime<Utc>) -> Result<VoteReceipt, Error>;
        }
    }

    fn project(id: i32, name: &str, vote_count: Option<i32>) -> Project {
        Project {
            project_id: id,
            project_name: name.to_string(),
            project_country: "Peru".to_string(),
            icon_code: "tree".to_string(),
            graph_colour: "green".to_string(),
            vote_count,
        }
    }

    #[tokio::test]
    async fn vote_passes_code_and_project_through() {
        let mut votes = MockVoteRepo::new();
        votes
            .expect_cast_vote()
            .with(eq(VoucherCode(1234)), eq(7), mockall::predicate::always())
            .times(1)
            .returning(|code, project_id, at| {
                Ok(VoteReceipt {
                    voucher: Voucher {
                        voucher_id: 1,
                        code: code.value(),
                        expiry_date: at,
                        used: true,
                        project_id: Some(project_id),
                    },
                    project: project(project_id, "Reforest", Some(1)),
                })
            });

        let service = VotingService::new(Arc::new(MockProjectRepo::new()), Arc::new(votes));
        let receipt = service.vote(VoucherCode(1234), 7).await.unwrap();
        assert_eq!(receipt.voucher.project_id, Some(7));
        assert_eq!(receipt.project.vote_count, Some(1));
    }

    #[tokio::test]
    async fn vote_surfaces_repository_errors() {
        let mut votes = MockVoteRepo::new();
        votes
            .expect_cast_vote()
            .returning(|code, _, _| Err(Error::VoucherUsed(code.value())));

        let service = VotingService::new(Arc::new(MockProjectRepo::new()), Arc::new(votes));
        let err = service.vote(VoucherCode(55), 1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn summary_keeps_storage_order_and_null_counts() {
        let mut projects = MockProjectRepo::new();
        projects.expect_list_projects().times(1).returning(|| {
            Ok(vec![
                project(2, "Solar", None),
                project(1, "Wells", Some(0)),
                project(3, "Schools", Some(12)),
            ])
        });

        let service = VotingService::new(Arc::new(projects), Arc::new(MockVoteRepo::new()));
        let summary = service.votes_summary().await.unwrap();
        let names: Vec<_> = summary.iter().map(|p| p.project_name.as_str()).collect();
        assert_eq!(names, ["Solar", "Wells", "Schools"]);
        assert_eq!(summary[0].vote_count, None);
        assert_eq!(summary[1].vote_count, Some(0));
    }
}
