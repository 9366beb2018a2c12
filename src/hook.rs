//! Structural validation of inbound webhook requests

use axum::body::Bytes;
use axum::extract::Request;
use axum::http::Method;

use crate::error::{HookError, Result};

/// Maximum accepted webhook body size (2MB)
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Header carrying the Gogs event type (e.g. "push")
pub const EVENT_HEADER: &str = "X-Gogs-Event";
/// Header carrying the unique delivery id of this webhook attempt
pub const DELIVERY_HEADER: &str = "X-Gogs-Delivery";

/// A structurally valid webhook request: framing metadata plus the raw,
/// still-uninterpreted body bytes.
#[derive(Debug, Clone)]
pub struct IncomingHook {
    pub event: String,
    pub delivery_id: String,
    pub payload: Bytes,
}

/// Validates the request framing and reads the full body into memory.
///
/// Only the method and the two Gogs headers are checked here; the payload
/// is not parsed and no trust decision is made.
pub async fn parse(request: Request) -> Result<IncomingHook> {
    if request.method() != Method::POST {
        return Err(HookError::UnsupportedMethod(request.method().to_string()));
    }

    let event = match header_value(&request, EVENT_HEADER) {
        Some(value) => value,
        None => return Err(HookError::MissingEvent),
    };

    let delivery_id = match header_value(&request, DELIVERY_HEADER) {
        Some(value) => value,
        None => return Err(HookError::MissingDeliveryId),
    };

    let payload = axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| HookError::BodyRead(e.to_string()))?;

    Ok(IncomingHook {
        event,
        delivery_id,
        payload,
    })
}

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
}
