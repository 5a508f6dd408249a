use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use super::{Disposition, process_job};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

fn json_error(code: StatusCode, message: impl Into<String>) -> Response {
    (code, Json(ErrorBody { message: message.into() })).into_response()
}

#[derive(Debug, Serialize)]
struct Liveness {
    status: &'static str,
    version: &'static str,
}

async fn liveness() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// The broker treats any non-2xx as "redeliver"; 400 is for payloads that will
// never succeed and is expected to be routed to a dead letter by the subscription.
async fn receive(State(state): State<AppState>, body: Bytes) -> Response {
    let job = match forge_core::job::decode_push_body(&body) {
        Ok(job) => job,
        Err(err) => {
            tracing::warn!(%err, "rejecting malformed push delivery");
            return json_error(StatusCode::BAD_REQUEST, err.to_string());
        }
    };

    match process_job(&state.db, &state.settings, &job).await {
        Disposition::Ack => StatusCode::OK.into_response(),
        Disposition::Reject => json_error(StatusCode::BAD_REQUEST, "job cannot be processed"),
        Disposition::Retry => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "clone failed, retry later")
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness).post(receive))
        .with_state(state)
}
