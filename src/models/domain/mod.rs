pub mod params;
pub mod pending;

pub use params::*;
pub use pending::{BatchItem, PendingMark, PendingRequest};
