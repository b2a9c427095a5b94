pub mod gas_pricer;
pub mod gas_quote;

pub use gas_pricer::GasPricer;
pub use gas_quote::GasQuote;
