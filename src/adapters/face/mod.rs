//! Face model backends.

mod http_backend;
mod mock_backend;

pub use http_backend::{HttpFaceBackend, HttpFaceBackendConfig};
pub use mock_backend::{single_face, MockFaceBackend};
