pub mod abi;
pub mod contract_registry;

pub use contract_registry::{ContractBinding, ContractGeneration, ContractKind, ContractRegistry};
