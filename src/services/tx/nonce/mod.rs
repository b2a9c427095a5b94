pub mod nonce_service;

pub use nonce_service::{NonceSequencer, SenderLocks};
