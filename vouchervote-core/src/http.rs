//! HTTP surface of the voting API.
//!
//! | method | path                       | handler                  |
//! |--------|----------------------------|--------------------------|
//! | GET    | `/projects/votes-summary/` | [`handlers::votes_summary`] |
//! | POST   | `/voucher/vote/`           | [`handlers::cast_vote`]     |
//!
//! Both paths are also served without the trailing slash.
//!
//! Errors are returned as `{"detail": "..."}` with 404 (unknown voucher or project),
//! 406 (voucher used or expired), 422 (bad query string) or 500.

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Error;
use crate::services::VotingService;

pub mod error;
pub mod handlers;

pub use error::ApiError;

/// Origins the original deployment's frontend was served from.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost.tiangolo.com",
    "https://localhost.tiangolo.com",
    "http://localhost",
    "http://localhost:8080",
    "https://localhost:8080",
];

/// Shared state for the Axum routes.
#[derive(Clone)]
pub struct ApiState {
    pub voting: VotingService,
}

pub fn router(voting: VotingService, cors: CorsLayer) -> Router {
    let state = ApiState { voting };

    Router::new()
        .route("/projects/votes-summary/", get(handlers::votes_summary))
        .route("/projects/votes-summary", get(handlers::votes_summary))
        .route("/voucher/vote/", post(handlers::cast_vote))
        .route("/voucher/vote", post(handlers::cast_vote))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Credentials are allowed, so origins must be explicit. Methods and headers are
/// mirrored from the preflight request.
pub fn cors_layer<S: AsRef<str>>(origins: &[S]) -> Result<CorsLayer, Error> {
    let origins = origins
        .iter()
        .map(|o| {
            let origin = o.as_ref().trim();
            if origin == "*" {
                return Err(Error::Config(
                    "wildcard origin cannot be combined with credentials".into(),
                ));
            }
            HeaderValue::from_str(origin)
                .map_err(|e| Error::Config(format!("invalid CORS origin '{}': {}", o.as_ref(), e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}
