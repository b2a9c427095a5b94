pub mod batch;
pub mod command;
pub mod error_classifier;
pub mod gas;
pub mod nonce;
pub mod query;
pub mod registry;
pub mod session;
pub mod signer;
pub mod types;

pub use error_classifier::ErrorClassifier;
pub use types::{CommandDeps, TxContext, TxOptions, TxResult};
