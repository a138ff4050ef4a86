//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{
    protocol::{
        DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, ErrorResponse,
        HealthResponse, UnreadableField,
    },
    ServiceError,
};
use fieldseal::{FieldOutcome, KeySource};
use serde_json::Value;
use tracing::{error, info};

use super::paths::{for_each_leaf, parse_path, PathSegment};
use super::state::AppState;

/// `POST /encrypt`: replace the named string fields with storage triples.
///
/// `null` fields stay `null` and missing fields are ignored. A named field
/// holding anything other than a string or `null` rejects the whole request,
/// as does a failure to seal any field: a record is never returned half
/// encrypted.
pub async fn encrypt(
    State(state): State<AppState>,
    body: Result<Json<EncryptRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(bad_body(rejection)),
    };
    let mut record = req.record;
    match encrypt_fields(&state, &mut record, &req.fields) {
        Ok(sealed) => {
            info!(fields = sealed, "record encrypted");
            (StatusCode::OK, Json(EncryptResponse { record })).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// `POST /decrypt`: replace stored triples at the named paths with plaintext.
///
/// Unreadable fields come back as `null` and are listed in `unreadable` with
/// the id of the audit event recorded for them. The request still succeeds.
pub async fn decrypt(
    State(state): State<AppState>,
    body: Result<Json<DecryptRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(bad_body(rejection)),
    };
    let segments = match parse_all(&req.fields) {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    let mut record = req.record;
    let mut unreadable = Vec::new();
    for path in &segments {
        let opened: Result<(), ServiceError> =
            for_each_leaf(&mut record, path, &mut |location: &str, leaf: &mut Value| {
                *leaf = match state.fields.decrypt_value(leaf) {
                    FieldOutcome::Ok(text) => Value::String(text),
                    FieldOutcome::Absent => Value::Null,
                    FieldOutcome::Failed(failure) => {
                        unreadable.push(UnreadableField {
                            path: location.to_owned(),
                            audit_id: failure.audit_id.to_string(),
                        });
                        Value::Null
                    }
                };
                Ok(())
            });
        if let Err(e) = opened {
            return error_response(e);
        }
    }

    (StatusCode::OK, Json(DecryptResponse { record, unreadable })).into_response()
}

/// `GET /health`: liveness check that also reports the key posture.
///
/// Returns `200 OK` with a configured key and `503 Service Unavailable` while
/// running on the insecure development default.
pub async fn health(State(state): State<AppState>) -> Response {
    let (status_code, status_str) = if state.key_source == KeySource::InsecureDefault {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    } else {
        (StatusCode::OK, "ok")
    };

    let body = HealthResponse {
        status: status_str.into(),
        key_source: state.key_source.as_str().into(),
        algorithm: state.fields.engine().algorithm().identifier().into(),
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Field traversal helpers
// ---------------------------------------------------------------------------

/// Parse every requested path, dropping repeats.
///
/// Each leaf is transformed at most once per request: a second pass would
/// seal an already sealed value or try to open plaintext.
fn parse_all(fields: &[String]) -> Result<Vec<Vec<PathSegment>>, ServiceError> {
    let mut parsed: Vec<Vec<PathSegment>> = Vec::with_capacity(fields.len());
    for field in fields {
        let segments = parse_path(field).map_err(|e| ServiceError::BadRequest(e.to_string()))?;
        if !parsed.contains(&segments) {
            parsed.push(segments);
        }
    }
    Ok(parsed)
}

fn bad_body(rejection: JsonRejection) -> ServiceError {
    ServiceError::BadRequest(rejection.body_text())
}

/// Seal every string leaf named by `fields`, returning how many were sealed.
fn encrypt_fields(
    state: &AppState,
    record: &mut Value,
    fields: &[String],
) -> Result<usize, ServiceError> {
    let segments = parse_all(fields)?;
    let mut sealed = 0;
    for path in &segments {
        for_each_leaf(record, path, &mut |location: &str, leaf: &mut Value| {
            let plaintext = match leaf {
                Value::Null => return Ok(()),
                Value::String(s) => s.as_str(),
                _ => {
                    return Err(ServiceError::BadRequest(format!(
                        "field {location} is not a string"
                    )))
                }
            };
            let stored = state
                .fields
                .encrypt(Some(plaintext))
                .map_err(|e| ServiceError::EncryptionFailure(e.to_string()))?;
            *leaf = serde_json::to_value(stored)
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            sealed += 1;
            Ok(())
        })?;
    }
    Ok(sealed)
}

fn error_response(err: ServiceError) -> Response {
    if err.http_status() >= 500 {
        error!(error = %err, "request failed");
    }
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse::new(err.code(), err.public_message());
    (status, Json(body)).into_response()
}
