//! Service status and object counts.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use domain::models::EntityKind;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// GET /api/v1/status
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse { status: "OK" })
}

/// GET /api/v1/stats
///
/// Counts per kind, keyed by the plural resource name.
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<&'static str, usize>>, ApiError> {
    let mut counts = BTreeMap::new();
    for kind in EntityKind::ALL {
        counts.insert(kind.plural(), state.storage.count(Some(kind)).await?);
    }
    Ok(Json(counts))
}
