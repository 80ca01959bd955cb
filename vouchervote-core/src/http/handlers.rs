use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};

use vouchervote_common::error::Error;
use vouchervote_common::models::{ProjectVotes, VoucherCode};

use super::{ApiError, ApiState};

/// Query string of `POST /voucher/vote/?code=...&proj_id=...`.
/// Both fields are taken as text so a bad value becomes a 422 with a readable message.
#[derive(Debug, Deserialize)]
pub struct VoteQuery {
    code: Option<String>,
    proj_id: Option<String>,
}

impl VoteQuery {
    fn parse(&self) -> Result<(VoucherCode, i32), Error> {
        let code = self
            .code
            .as_deref()
            .ok_or_else(|| Error::from("missing query parameter 'code'"))?
            .parse::<VoucherCode>()?;

        let raw = self
            .proj_id
            .as_deref()
            .ok_or_else(|| Error::from("missing query parameter 'proj_id'"))?;
        let project_id = raw
            .trim()
            .parse::<i32>()
            .map_err(|_| Error::from(format!("proj_id '{}' is not a valid integer", raw)))?;

        Ok((code, project_id))
    }
}

pub async fn votes_summary(State(state): State<ApiState>) -> Result<Json<Vec<ProjectVotes>>, ApiError> {
    let summary = state.voting.votes_summary().await?;
    Ok(Json(summary))
}

pub async fn cast_vote(
    State(state): State<ApiState>,
    query: Result<Query<VoteQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let (code, project_id) = query.parse()?;
    state.voting.vote(code, project_id).await?;
    Ok(Json(json!({ "message": "voting successful" })))
}
