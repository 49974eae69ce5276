use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::HandlerError;
use crate::handler::models::ApiError;

/// Build a `HandlerError` from a non-success response.
///
/// The Access API answers errors with `{"code": <int>, "message": <string>}`.
/// Any other body is kept verbatim as the message.
pub(super) fn parse_api_error(status: StatusCode, body: &str) -> HandlerError {
    let message = match serde_json::from_str::<ApiError>(body) {
        Ok(err) => err.message,
        Err(_) => body.trim().to_owned(),
    };
    HandlerError::Status { status, message }
}

pub(super) fn decode<T: DeserializeOwned>(route: &str, body: &str) -> Result<T, HandlerError> {
    serde_json::from_str(body).map_err(|e| {
        HandlerError::InvalidResponse(format!("decode {route} response: {e}; body={body}"))
    })
}

pub(super) fn encode<T: Serialize>(route: &str, request: &T) -> Result<Vec<u8>, HandlerError> {
    serde_json::to_vec(request)
        .map_err(|e| HandlerError::InvalidRequest(format!("encode {route} request: {e}")))
}

pub(super) fn join_ids(ids: &[String]) -> String {
    ids.join(",")
}
