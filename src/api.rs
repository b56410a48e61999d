//! REST API router for the matching engine.
//!
//! Used by the binary and by integration tests. Create with [`create_router`].
//! Uses Extension for state so the router is `Router<()>` and works with `into_make_service()`.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::warn;

use crate::error::{ErrorKind, MatchError};
use crate::types::{parse_identities, parse_preferences, Pair, ParticipantId};
use crate::{MatchConfig, MatchEngine, MatchInput};

/// Shared app state: the configuration each request starts from.
#[derive(Clone)]
pub struct AppState {
    pub(crate) config: MatchConfig,
}

/// Builds the REST router. Returns `Router<()>` so you can call `.into_make_service()`
/// for `axum::serve`.
pub fn create_router(config: MatchConfig) -> Router<()> {
    Router::new()
        .route("/health", get(health))
        .route("/match", post(run_match))
        .layer(Extension(AppState { config }))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Body of `POST /match`. Category values are the raw strings of the loading layer.
#[derive(serde::Deserialize)]
pub struct MatchRequest {
    pub scores: Vec<Vec<f64>>,
    pub gender_identity: Vec<String>,
    pub gender_preference: Vec<String>,
    pub seed: u64,
    #[serde(default)]
    pub incompatible_penalty: Option<f64>,
}

#[derive(serde::Serialize)]
struct MatchResponse {
    proposers: Vec<ParticipantId>,
    receivers: Vec<ParticipantId>,
    pairs: Vec<Pair>,
}

fn handle(state: &AppState, body: MatchRequest) -> Result<MatchResponse, MatchError> {
    let mut config = state.config;
    if let Some(penalty) = body.incompatible_penalty {
        config.incompatible_penalty = penalty;
    }
    let engine = MatchEngine::new(config)?;
    let input = MatchInput::new(
        body.scores,
        parse_identities(&body.gender_identity)?,
        parse_preferences(&body.gender_preference)?,
    );
    let outcome = engine.run_seeded(&input, body.seed)?;
    Ok(MatchResponse {
        proposers: outcome.partition.proposers().to_vec(),
        receivers: outcome.partition.receivers().to_vec(),
        pairs: outcome.pairs,
    })
}

async fn run_match(
    Extension(state): Extension<AppState>,
    Json(body): Json<MatchRequest>,
) -> Response {
    match handle(&state, body) {
        Ok(out) => (StatusCode::OK, Json(out)).into_response(),
        Err(e) => {
            let status = match e.kind() {
                ErrorKind::EngineInvariant => StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::Validation | ErrorKind::UnknownCategory => StatusCode::BAD_REQUEST,
            };
            warn!("match request failed: {}", e);
            (
                status,
                Json(serde_json::json!({ "error": e.to_string(), "kind": e.kind() })),
            )
                .into_response()
        }
    }
}
