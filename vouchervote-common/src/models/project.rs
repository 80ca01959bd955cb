// File: vouchervote-common/src/models/project.rs

use serde::{Deserialize, Serialize};

/// A row of `project_votes`. `vote_count` caches how many vouchers have been
/// redeemed for this project; it is NULL until the first recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    #[sqlx(rename = "ProjectID")]
    pub project_id: i32,
    #[sqlx(rename = "ProjectName")]
    pub project_name: String,
    #[sqlx(rename = "ProjectCountry")]
    pub project_country: String,
    #[sqlx(rename = "IconCode")]
    pub icon_code: String,
    #[sqlx(rename = "GraphColour")]
    pub graph_colour: String,
    #[sqlx(rename = "VoteCount")]
    pub vote_count: Option<i32>,
}

impl Project {
    /// Stores `count` as the cached tally. Returns `true` when the stored value changed
    /// and the row needs to be written back.
    pub fn apply_tally(&mut self, count: i32) -> bool {
        if self.vote_count == Some(count) {
            return false;
        }
        self.vote_count = Some(count);
        true
    }
}

/// Shape returned by `GET /projects/votes-summary/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectVotes {
    pub project_name: String,
    pub project_country: String,
    pub icon_code: String,
    pub graph_colour: String,
    pub vote_count: Option<i32>,
}

impl From<Project> for ProjectVotes {
    fn from(p: Project) -> Self {
        Self {
            project_name: p.project_name,
            project_country: p.project_country,
            icon_code: p.icon_code,
            graph_colour: p.graph_colour,
            vote_count: p.vote_count,
        }
    }
}

/// Fields needed to insert a project. Ids are assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub project_name: String,
    pub project_country: String,
    pub icon_code: String,
    pub graph_colour: String,
}
