//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use tact_backend::adapters::blob_store::InMemoryBlobStore;
use tact_backend::adapters::broadcast::{BroadcastPoolConfig, BroadcastQueue};
use tact_backend::adapters::email::RecordingEmailSender;
use tact_backend::adapters::face::MockFaceBackend;
use tact_backend::adapters::http::{router, AppState, HttpLimits};
use tact_backend::adapters::in_memory::{
    InMemoryOrderRepository, InMemorySubscriptionRepository, InMemoryUserDirectory,
};
use tact_backend::adapters::paystack::MockPaymentGateway;
use tact_backend::application::handlers::payment::CheckoutSettings;
use tact_backend::domain::broadcast::LegalLinks;
use tact_backend::domain::foundation::OrderId;
use tact_backend::domain::payment::Order;
use tact_backend::domain::vault::{DocumentVault, SecretCipher};
use tact_backend::domain::verification::{FaceEmbeddingEngine, MatchPolicy};
use tact_backend::ports::EmailSender;

pub const SECRET: &str = "sk_test_integration_secret";
pub const BOUNDARY: &str = "tact-test-boundary";

/// Which optional capabilities the app starts with.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub encryption: bool,
    pub face_engine: bool,
    pub email: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            encryption: true,
            face_engine: true,
            email: true,
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub orders: InMemoryOrderRepository,
    pub subscriptions: InMemorySubscriptionRepository,
    pub users: InMemoryUserDirectory,
    pub gateway: MockPaymentGateway,
    pub face: Arc<MockFaceBackend>,
    pub blobs: Arc<InMemoryBlobStore>,
    pub vault: Arc<DocumentVault>,
    pub sender: RecordingEmailSender,
    pub broadcasts: Option<Arc<BroadcastQueue>>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub async fn start(options: Options) -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(InMemoryBlobStore::new());
        let cipher = options.encryption.then(SecretCipher::ephemeral);
        let vault = Arc::new(DocumentVault::new(blobs.clone(), cipher).with_temp_dir(temp_dir.path()));

        let face = Arc::new(MockFaceBackend::new());
        let face_engine = if options.face_engine {
            Some(Arc::new(FaceEmbeddingEngine::init(face.clone()).await.unwrap()))
        } else {
            None
        };

        let orders = InMemoryOrderRepository::new();
        let subscriptions = InMemorySubscriptionRepository::new();
        let users = InMemoryUserDirectory::new();
        let gateway = MockPaymentGateway::new();
        let sender = RecordingEmailSender::new();

        let broadcasts = options.email.then(|| {
            Arc::new(BroadcastQueue::start(
                BroadcastPoolConfig {
                    workers: 1,
                    queue_capacity: 4,
                    retained_jobs: 16,
                    links: LegalLinks {
                        terms_url: "https://tact.test/terms".into(),
                        privacy_url: "https://tact.test/privacy".into(),
                    },
                },
                Arc::new(users.clone()),
                Arc::new(sender.clone()),
            ))
        });

        let state = AppState {
            vault: vault.clone(),
            face_engine,
            match_policy: MatchPolicy::default(),
            webhook_secret: SecretString::new(SECRET.to_string()),
            payment_gateway: Arc::new(gateway.clone()),
            subscriptions: Arc::new(subscriptions.clone()),
            orders: Arc::new(orders.clone()),
            sellers: Arc::new(users.clone()),
            checkout: CheckoutSettings::default(),
            broadcasts: broadcasts.clone(),
            email_sender: options
                .email
                .then(|| Arc::new(sender.clone()) as Arc<dyn EmailSender>),
            attachments: blobs.clone(),
        };

        Self {
            router: router(state, HttpLimits::default()),
            orders,
            subscriptions,
            users,
            gateway,
            face,
            blobs,
            vault,
            sender,
            broadcasts,
            temp_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send(request).await;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    pub async fn seed_order(&self, total: Decimal) -> OrderId {
        let order = Order {
            id: OrderId::new(),
            total_amount: total,
            is_paid: false,
            status: "pending".into(),
            transaction_id: None,
            gateway_payload: None,
            paid_at: None,
        };
        let id = order.id;
        self.orders.insert(order).await;
        id
    }

    pub fn leftover_temp_files(&self) -> usize {
        std::fs::read_dir(self.temp_dir.path()).unwrap().count()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// A multipart part: (field name, optional filename, bytes).
pub type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

pub fn post_multipart(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, bytes) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}
