//! LNURL-channel and offer creation routes.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use channel_offers::{ChannelDataResponse, StatusResponse};
use tracing::{info, warn};

use crate::state::AppState;

/// Return the channel request for an offer (LNURL step 1).
pub async fn channel_request(
    State(state): State<AppState>,
    Path(secret): Path<String>,
) -> Json<ChannelDataResponse> {
    Json(state.service.get_channel_data(&secret).await)
}

/// Open the offered channel to the calling wallet's node (LNURL step 2).
///
/// Expects `k1`, `remoteid` and `private` query parameters.
pub async fn open_channel(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<StatusResponse> {
    let param = |name: &str| {
        params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| StatusResponse::error(format!("Missing parameter {}", name)))
    };

    let (k1, remote_id, private) = match (param("k1"), param("remoteid"), param("private")) {
        (Ok(k1), Ok(remote_id), Ok(private)) => (k1, remote_id, private),
        (Err(response), _, _) | (_, Err(response), _) | (_, _, Err(response)) => {
            return Json(response)
        }
    };

    let Some(is_private) = parse_flag(private) else {
        return Json(StatusResponse::error("Invalid private flag"));
    };

    Json(state.service.fulfill(k1, remote_id, is_private).await)
}

/// Create an offer and return its LNURL as plain text.
///
/// A wrong key gets an empty `200` so the endpoint does not reveal itself.
pub async fn create(
    State(state): State<AppState>,
    Path((auth_key, local_amount, push_amount)): Path<(String, u64, u64)>,
) -> String {
    if !state.authorize(&auth_key) {
        warn!("Rejected offer creation with a bad key");
        return String::new();
    }

    match state.service.create_offer(local_amount, push_amount).await {
        Ok(lnurl) => {
            info!(capacity = local_amount, push = push_amount, "Offer created via admin");
            lnurl
        }
        Err(err) => {
            warn!(error = %err, capacity = local_amount, "Failed to create offer");
            String::new()
        }
    }
}

/// Parse the wallet's `private` flag.
fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
