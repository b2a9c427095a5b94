pub mod tx;
pub mod tx_service;

pub use tx_service::{FeePreview, TxService};
