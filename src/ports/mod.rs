//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `BlobStore` - Opaque URL-addressable object storage for vault blobs
//! - `SubscriptionRepository` - Overseer subscription state
//! - `OrderRepository` - Order lookup and guarded paid-update
//! - `SellerRepository` - Seller subaccount codes
//! - `RecipientDirectory` - Member emails for broadcasts
//!
//! ## External Service Ports
//!
//! - `FaceEmbeddingBackend` - Face detection and embedding model
//! - `PaymentGateway` - Hosted checkout, subaccounts, transaction verify
//! - `EmailSender` - Transactional email

mod blob_store;
mod email_sender;
mod face_embedding_backend;
mod order_repository;
mod payment_gateway;
mod recipient_directory;
mod seller_repository;
mod subscription_repository;

pub use blob_store::{BlobStore, BlobStoreError};
pub use email_sender::{EmailError, EmailSender};
pub use face_embedding_backend::{FaceBackendError, FaceEmbeddingBackend};
pub use order_repository::OrderRepository;
pub use payment_gateway::{
    CreateSubaccountRequest, GatewayError, InitializeTransactionRequest, PaymentGateway,
    Subaccount, TransactionAuthorization, TransactionVerification,
};
pub use recipient_directory::RecipientDirectory;
pub use seller_repository::{Seller, SellerRepository};
pub use subscription_repository::SubscriptionRepository;
