// File: vouchervote-core/src/repositories/postgres/projects.rs

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};
use vouchervote_common::error::Error;
use vouchervote_common::models::{NewProject, Project};
use vouchervote_common::traits::repository_traits::ProjectRepository;

#[derive(Clone)]
pub struct PostgresProjectRepository {
    pool: Pool<Postgres>,
}

impl PostgresProjectRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn create_project(&self, project: &NewProject) -> Result<Project, Error> {
        let created = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO project_votes (
                "ProjectName",
                "ProjectCountry",
                "IconCode",
                "GraphColour"
            )
            VALUES ($1, $2, $3, $4)
            RETURNING "ProjectID", "ProjectName", "ProjectCountry", "IconCode", "GraphColour", "VoteCount"
            "#,
        )
            .bind(&project.project_name)
            .bind(&project.project_country)
            .bind(&project.icon_code)
            .bind(&project.graph_colour)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn get_project(&self, project_id: i32) -> Result<Option<Project>, Error> {
        let row = sqlx::query_as::<_, Project>(
            r#"
            SELECT "ProjectID", "ProjectName", "ProjectCountry", "IconCode", "GraphColour", "VoteCount"
            FROM project_votes
            WHERE "ProjectID" = $1
            "#,
        )
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, Error> {
        let rows = sqlx::query_as::<_, Project>(
            r#"
            SELECT "ProjectID", "ProjectName", "ProjectCountry", "IconCode", "GraphColour", "VoteCount"
            FROM project_votes
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

/// Recounts the vouchers redeemed for `project_id` and writes the tally back when it
/// differs from the cached one.
///
/// The project row is locked for the rest of the caller's transaction, so concurrent
/// recounts for the same project run one after the other and each sees the previous
/// one's committed voucher.
pub async fn recompute_tally(conn: &mut PgConnection, project_id: i32) -> Result<Project, Error> {
    let mut project = sqlx::query_as::<_, Project>(
        r#"
        SELECT "ProjectID", "ProjectName", "ProjectCountry", "IconCode", "GraphColour", "VoteCount"
        FROM project_votes
        WHERE "ProjectID" = $1
        FOR UPDATE
        "#,
    )
        .bind(project_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(Error::ProjectNotFound(project_id))?;

    let count: i64 = sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM voucher_codes WHERE "ProjectID" = $1"#,
    )
        .bind(project_id)
        .fetch_one(&mut *conn)
        .await?;
    let count = i32::try_from(count).map_err(|e| Error::Database(sqlx::Error::Decode(Box::new(e))))?;

    if project.apply_tally(count) {
        sqlx::query(r#"UPDATE project_votes SET "VoteCount" = $1 WHERE "ProjectID" = $2"#)
            .bind(count)
            .bind(project_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(project)
}
