pub mod observer;
pub mod operation;
pub mod tx_command;

pub use observer::{TxEvent, TxObserver};
pub use operation::Operation;
pub use tx_command::{SubmittedTx, TxCommand};
