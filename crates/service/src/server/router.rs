//! Axum router construction.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/encrypt", post(handlers::encrypt))
        .route("/decrypt", post(handlers::decrypt))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(middleware::MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use axum_test::TestServer;
    use common::protocol::{DecryptResponse, EncryptResponse, ErrorResponse, HealthResponse};
    use serde_json::json;
    use tower::ServiceExt;

    fn server() -> TestServer {
        TestServer::new(build(AppState::default())).unwrap()
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = build(AppState::default());
        let req = Request::builder()
            .uri("/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn health_route_exists() {
        let resp = server().get("/health").await;
        resp.assert_status_ok();
        let body: HealthResponse = resp.json();
        assert_eq!(body.status, "ok");
        assert_eq!(body.key_source, "configured");
        assert_eq!(body.algorithm, "aes-256-gcm");
    }

    #[tokio::test]
    async fn encrypt_then_decrypt_round_trip() {
        let server = server();
        let record = json!({
            "id": 17,
            "notes": "patient reports improved mood",
            "summary": null,
            "entries": [{"text": "slept eight hours"}, {"text": ""}]
        });
        let fields = json!(["notes", "summary", "entries[].text"]);

        let sealed: EncryptResponse = server
            .post("/encrypt")
            .json(&json!({"record": record, "fields": fields}))
            .await
            .json();
        assert_eq!(sealed.record["id"], 17);
        assert!(sealed.record["summary"].is_null());
        assert_eq!(sealed.record["notes"]["nonce"].as_str().unwrap().len(), 24);
        assert!(sealed.record["entries"][1]["text"]["authTag"].is_string());

        let opened: DecryptResponse = server
            .post("/decrypt")
            .json(&json!({"record": sealed.record, "fields": fields}))
            .await
            .json();
        assert_eq!(opened.record, record);
        assert!(opened.unreadable.is_empty());
    }

    #[tokio::test]
    async fn tampered_field_is_reported_unreadable() {
        let server = server();
        let sealed: EncryptResponse = server
            .post("/encrypt")
            .json(&json!({
                "record": {"entries": [{"text": "first"}, {"text": "second"}]},
                "fields": ["entries[].text"]
            }))
            .await
            .json();

        let mut record = sealed.record;
        let tag = record["entries"][1]["text"]["authTag"]
            .as_str()
            .unwrap()
            .to_owned();
        let flipped = if tag.starts_with('0') { "1" } else { "0" };
        record["entries"][1]["text"]["authTag"] = json!(format!("{flipped}{}", &tag[1..]));

        let resp = server
            .post("/decrypt")
            .json(&json!({"record": record, "fields": ["entries[].text"]}))
            .await;
        resp.assert_status_ok();
        let opened: DecryptResponse = resp.json();
        assert_eq!(opened.record["entries"][0]["text"], "first");
        assert!(opened.record["entries"][1]["text"].is_null());
        assert_eq!(opened.unreadable.len(), 1);
        assert_eq!(opened.unreadable[0].path, "entries.1.text");
        assert!(!opened.unreadable[0].audit_id.is_empty());
    }

    #[tokio::test]
    async fn non_string_field_returns_400() {
        let resp = server()
            .post("/encrypt")
            .json(&json!({"record": {"notes": 42}, "fields": ["notes"]}))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = resp.json();
        assert_eq!(body.code, "bad_request");
    }

    #[tokio::test]
    async fn repeated_paths_decrypt_once() {
        let server = server();
        let sealed: EncryptResponse = server
            .post("/encrypt")
            .json(&json!({"record": {"notes": "calm"}, "fields": ["notes", "notes"]}))
            .await
            .json();
        assert!(sealed.record["notes"]["ciphertext"].is_string());

        let resp = server
            .post("/decrypt")
            .json(&json!({"record": sealed.record, "fields": ["notes", "notes"]}))
            .await;
        resp.assert_status_ok();
        let opened: DecryptResponse = resp.json();
        assert_eq!(opened.record, json!({"notes": "calm"}));
        assert!(opened.unreadable.is_empty());
    }

    #[tokio::test]
    async fn legacy_row_decrypts_over_http() {
        use aes_gcm::aead::{consts::U16, Aead, KeyInit};
        use aes_gcm::{aes::Aes256, AesGcm, Nonce};

        // Same key bytes as `AppState::default()`.
        let cipher = AesGcm::<Aes256, U16>::new_from_slice(&[0x42; 32]).unwrap();
        let iv = [0x07u8; 16];
        let sealed = cipher
            .encrypt(Nonce::<U16>::from_slice(&iv), "feeling safe today".as_bytes())
            .unwrap();
        let (ciphertext, tag) = sealed.split_at(sealed.len() - 16);

        let record = json!({
            "checkin": {
                "encrypted": hex::encode(ciphertext),
                "iv": hex::encode(iv),
                "authTag": hex::encode(tag)
            }
        });
        let resp = server()
            .post("/decrypt")
            .json(&json!({"record": record, "fields": ["checkin"]}))
            .await;
        resp.assert_status_ok();
        let opened: DecryptResponse = resp.json();
        assert_eq!(opened.record["checkin"], "feeling safe today");
        assert!(opened.unreadable.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_returns_error_response() {
        let req = Request::builder()
            .method("POST")
            .uri("/encrypt")
            .header("content-type", "application/json")
            .body(Body::from("{\"record\": "))
            .unwrap();
        let resp = build(AppState::default()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, "bad_request");
    }

    #[tokio::test]
    async fn invalid_path_returns_400_on_decrypt() {
        let resp = server()
            .post("/decrypt")
            .json(&json!({"record": {}, "fields": [""]}))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
    }
}
