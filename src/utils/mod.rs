pub mod check;
pub mod convert;
pub mod format;
pub mod logger;
pub mod retry;

pub use check::*;
pub use convert::*;
pub use format::*;
pub use retry::RetryPolicy;
