pub mod mirror;
pub mod provider;
