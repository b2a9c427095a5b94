#[allow(clippy::module_inception)]
pub mod startup;

pub use startup::Application;
