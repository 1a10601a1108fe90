//! Face verification handlers.

mod verify_face;

pub use verify_face::{VerificationAborted, VerifyFaceCommand, VerifyFaceHandler};
