//! Face verification over HTTP: reference sources, failure reporting and
//! temp-file hygiene.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;

use common::{post_multipart, Options, TestApp};
use tact_backend::adapters::face::MockFaceBackend;
use tact_backend::domain::vault::FACE_FOLDER;
use tact_backend::domain::verification::FaceEmbeddingEngine;
use tact_backend::ports::FaceBackendError;

const LIVE: &[u8] = b"live-capture";
const LEGACY_URL: &str = "https://legacy.test/faces/id.jpg";

fn verify(reference: &str) -> axum::http::Request<axum::body::Body> {
    post_multipart(
        "/api/verify-face",
        &[
            ("live_image", Some("live.jpg"), LIVE),
            ("reference_url", None, reference.as_bytes()),
        ],
    )
}

#[tokio::test]
async fn legacy_plaintext_reference_is_compared() {
    let app = TestApp::start(Options::default()).await;
    app.face.register_single(LIVE, vec![1.0, 0.0, 0.0]).unwrap();
    app.face.register_single(b"legacy-photo", vec![0.0, 1.0, 0.0]).unwrap();
    app.blobs.insert(LEGACY_URL, b"legacy-photo".to_vec());

    let (status, body) = app.send_json(verify(LEGACY_URL)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched"], false);
    assert!(body["distance"].as_f64().unwrap().abs() < 1e-6);
    assert_eq!(body["message"], "Faces do not match");
    assert_eq!(app.leftover_temp_files(), 0);
}

#[tokio::test]
async fn missing_reference_is_reported_and_cleaned_up() {
    let app = TestApp::start(Options::default()).await;
    app.face.register_single(LIVE, vec![1.0, 0.0]).unwrap();

    let (status, body) = app
        .send_json(verify("https://blobs.test/faces/never-stored.enc"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched"], false);
    assert_eq!(body["code"], "DOWNLOAD_FAILED");
    assert_eq!(app.leftover_temp_files(), 0);
}

#[tokio::test]
async fn encrypted_reference_without_key_is_reported() {
    let app = TestApp::start(Options {
        encryption: false,
        ..Options::default()
    })
    .await;
    app.face.register_single(LIVE, vec![1.0, 0.0]).unwrap();
    app.blobs.insert("https://blobs.test/faces/id.enc", b"ciphertext".to_vec());

    let (status, body) = app.send_json(verify("https://blobs.test/faces/id.enc")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "ENCRYPTION_UNAVAILABLE");
    assert_eq!(app.leftover_temp_files(), 0);
}

#[tokio::test]
async fn exhausted_model_aborts_the_request() {
    let app = TestApp::start(Options::default()).await;
    app.face.register_single(b"id", vec![1.0, 0.0]).unwrap();
    let reference = app.vault.store(b"id", FACE_FOLDER).await.unwrap();
    app.face
        .fail_next(FaceBackendError::ResourceExhausted("out of memory".into()));

    let (status, body) = app.send_json(verify(reference.as_str())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "VERIFICATION_ABORTED");
    assert_eq!(app.leftover_temp_files(), 0);
}

#[tokio::test]
async fn failed_warm_up_leaves_no_engine() {
    let backend = Arc::new(MockFaceBackend::new());
    backend.set_warm_up_error(FaceBackendError::Unavailable("model server down".into()));

    let err = FaceEmbeddingEngine::init(backend).await.err().unwrap();

    assert_eq!(err.model, "mock");
    assert!(err.reason.contains("model server down"));
}
