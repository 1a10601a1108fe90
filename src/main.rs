//! TACT backend server.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tact_backend::adapters::blob_store::{HttpBlobStore, HttpBlobStoreConfig};
use tact_backend::adapters::broadcast::{BroadcastPoolConfig, BroadcastQueue};
use tact_backend::adapters::email::{ResendConfig, ResendEmailSender};
use tact_backend::adapters::face::{HttpFaceBackend, HttpFaceBackendConfig};
use tact_backend::adapters::http::{router, AppState, HttpLimits};
use tact_backend::adapters::paystack::{PaystackConfig, PaystackGateway};
use tact_backend::adapters::postgres::{
    PostgresOrderRepository, PostgresSubscriptionRepository, PostgresUserDirectory,
};
use tact_backend::config::{AppConfig, FaceConfig, ServerConfig, VaultConfig};
use tact_backend::domain::vault::{DocumentVault, SecretCipher};
use tact_backend::domain::verification::FaceEmbeddingEngine;
use tact_backend::ports::{BlobStore, EmailSender};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.server);

    if let Err(e) = config.validate() {
        error!(error = %e, "Configuration error");
        std::process::exit(1);
    }

    info!(
        environment = ?config.server.environment,
        test_mode = config.payment.is_test_mode(),
        "Starting TACT backend"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await
        .context("failed to connect to PostgreSQL")?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;
        info!("Database migrations applied");
    }

    let blobs = build_blob_store(&config.vault)?;
    let vault = Arc::new(build_vault(&config.vault, blobs.clone()));
    let face_engine = build_face_engine(&config.face).await;

    let payment_gateway = PaystackGateway::new(
        PaystackConfig::new(config.payment.paystack_secret_key.clone())
            .with_base_url(config.payment.api_base_url.clone())
            .with_timeout(config.payment.request_timeout()),
    )
    .context("failed to build Paystack client")?;

    let users = Arc::new(PostgresUserDirectory::new(pool.clone()));

    let (broadcasts, email_sender) = match &config.email {
        Some(email) => {
            let sender: Arc<dyn EmailSender> = Arc::new(
                ResendEmailSender::new(
                    ResendConfig::new(email.resend_api_key.clone(), email.from_header())
                        .with_base_url(email.api_base_url.clone()),
                )
                .context("failed to build email client")?,
            );
            let queue = BroadcastQueue::start(
                BroadcastPoolConfig {
                    workers: config.broadcast.workers,
                    queue_capacity: config.broadcast.queue_capacity,
                    retained_jobs: config.broadcast.retained_jobs,
                    links: email.legal_links(),
                },
                users.clone(),
                sender.clone(),
            );
            (Some(Arc::new(queue)), Some(sender))
        }
        None => {
            warn!("Email is not configured; broadcasts and custom emails are disabled");
            (None, None)
        }
    };

    let state = AppState {
        vault,
        face_engine,
        match_policy: config.face.match_policy()?,
        webhook_secret: config.payment.paystack_secret_key.clone(),
        payment_gateway: Arc::new(payment_gateway),
        subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        orders: Arc::new(PostgresOrderRepository::new(pool.clone())),
        sellers: users,
        checkout: config.payment.checkout_settings(),
        broadcasts: broadcasts.clone(),
        email_sender,
        attachments: blobs,
    };

    let app = router(
        state,
        HttpLimits {
            max_upload_bytes: config.server.max_upload_bytes,
            request_timeout: config.server.request_timeout(),
        },
    );

    let address = config.server.socket_addr()?;
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!(%address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(queue) = broadcasts {
        queue.shutdown().await;
    }
    pool.close().await;
    info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if server.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// One HTTP client serves vault objects and custom-email attachments.
fn build_blob_store(config: &VaultConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    let mut blob_config = HttpBlobStoreConfig::new(
        config.blob_upload_base_url.clone(),
        config.blob_public_base_url.clone(),
    )
    .with_timeout(config.request_timeout());
    if let Some(token) = &config.blob_access_token {
        blob_config = blob_config.with_access_token(token.clone());
    }
    let blobs = HttpBlobStore::new(blob_config).context("failed to build blob store client")?;
    Ok(Arc::new(blobs))
}

/// The vault always starts. Without a usable key it runs with encryption
/// disabled and every store or decrypt answers 503.
fn build_vault(config: &VaultConfig, blobs: Arc<dyn BlobStore>) -> DocumentVault {
    let cipher = SecretCipher::init(config.encryption_key.as_ref(), config.allow_ephemeral_key).ok();
    let mut vault = DocumentVault::new(blobs, cipher);
    if let Some(dir) = &config.temp_dir {
        vault = vault.with_temp_dir(dir.clone());
    }
    vault
}

/// Loads the model once. Failure leaves verification answering "engine
/// unavailable" for the life of the process.
async fn build_face_engine(config: &FaceConfig) -> Option<Arc<FaceEmbeddingEngine>> {
    let Some(url) = &config.model_server_url else {
        warn!("No face model server configured; face verification is unavailable");
        return None;
    };

    let backend = match HttpFaceBackend::new(
        HttpFaceBackendConfig::new(url.clone())
            .with_model(config.model_name.clone())
            .with_timeout(config.request_timeout()),
    ) {
        Ok(backend) => backend,
        Err(e) => {
            error!(error = %e, "Face backend could not be created; face verification is unavailable");
            return None;
        }
    };

    match FaceEmbeddingEngine::init(Arc::new(backend)).await {
        Ok(engine) => Some(Arc::new(engine)),
        Err(e) => {
            error!(error = %e, "Face engine failed to initialize; face verification is unavailable");
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
