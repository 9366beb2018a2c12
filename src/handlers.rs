//! HTTP handler for the /hook route

use axum::{
    Json,
    extract::{Request, State as AxumState},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::SharedState;
use crate::dispatch::dispatch;
use crate::error::HookError;
use crate::hook;

/// Value of the Server identification header carried on every response
pub const SERVER_IDENT: &str = "gogs-build-hook";

/// Handles webhook deliveries: validates the request, dispatches it, and
/// maps the outcome to a status code. The route is registered for every
/// method so non-POST requests reach the validator instead of the router's
/// fallback.
pub async fn handle_hook(
    AxumState(state): AxumState<SharedState>,
    request: Request,
) -> Response {
    let hook = match hook::parse(request).await {
        Ok(hook) => hook,
        Err(e) => {
            warn!("Rejected malformed request: {}", e);
            return respond(structural_status(&e), None);
        }
    };

    match dispatch(&hook, &state.config, state.builder.as_ref()).await {
        Ok(()) => {
            info!("Delivery {}: build succeeded", hook.delivery_id);
            respond(StatusCode::OK, None)
        }
        Err(HookError::AuthenticationFailed) => {
            warn!("Delivery {}: authentication failed", hook.delivery_id);
            respond(StatusCode::FORBIDDEN, None)
        }
        Err(HookError::PayloadDecode(e)) => {
            error!(
                "Delivery {}: could not decode push payload: {}",
                hook.delivery_id, e
            );
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(json!({"error": "invalid push payload"})),
            )
        }
        Err(HookError::NoCommits) => {
            error!(
                "Delivery {}: push event contains no commits",
                hook.delivery_id
            );
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(json!({"error": "push event contains no commits"})),
            )
        }
        Err(e) => {
            // Build failures are logged server-side only; the response
            // carries no detail about what went wrong.
            error!("Delivery {}: {}", hook.delivery_id, e);
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(json!({"error": "build failed"})),
            )
        }
    }
}

fn structural_status(error: &HookError) -> StatusCode {
    match error {
        HookError::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn respond(status: StatusCode, body: Option<Value>) -> Response {
    let mut response = match body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    };
    response
        .headers_mut()
        .insert(header::SERVER, HeaderValue::from_static(SERVER_IDENT));
    response
}
