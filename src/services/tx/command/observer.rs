// services/tx/command/observer.rs

use crate::errors::error::AppError;
use crate::services::tx::error_classifier::ErrorClassifier;
use ethers_core::types::{H256, TransactionReceipt};

/// 命令生命周期事件。顺序：hash → receipt → finally，出错时 error → finally
#[derive(Debug, Clone, Copy)]
pub enum TxEvent<'a> {
    TransactionHash(H256),
    Receipt(&'a TransactionReceipt),
    Error(&'a AppError),
    Finally,
}

impl TxEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            TxEvent::TransactionHash(_) => "transactionHash",
            TxEvent::Receipt(_) => "receipt",
            TxEvent::Error(_) => "error",
            TxEvent::Finally => "finally",
        }
    }
}

pub trait TxObserver: Send + Sync {
    fn notify(&self, event: &TxEvent<'_>);
}

impl<F> TxObserver for F
where
    F: Fn(&TxEvent<'_>) + Send + Sync,
{
    fn notify(&self, event: &TxEvent<'_>) {
        self(event)
    }
}

/// 一个命令的全部观察者，随命令一起被消费
#[derive(Default)]
pub(crate) struct Observers {
    list: Vec<Box<dyn TxObserver>>,
}

impl Observers {
    pub(crate) fn push(&mut self, observer: Box<dyn TxObserver>) {
        self.list.push(observer);
    }

    pub(crate) fn emit(&self, event: TxEvent<'_>) {
        for observer in &self.list {
            observer.notify(&event);
        }
    }

    /// 分类错误并依次触发 error、finally
    pub(crate) fn fail(self, error: AppError) -> AppError {
        let error = ErrorClassifier::classify(error);
        self.emit(TxEvent::Error(&error));
        self.emit(TxEvent::Finally);
        error
    }
}
