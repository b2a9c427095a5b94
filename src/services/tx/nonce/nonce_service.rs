// services/tx/nonce/nonce_service.rs

use crate::errors::error::AppError;
use crate::infrastructure::provider::ProviderTrait;
use crate::log_debug;
use dashmap::DashMap;
use ethers_core::types::H160;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 一次批量任务内的 nonce 计数器
///
/// 从链上读一次 pending nonce，之后只在本地单调递增。
/// 已分配的 nonce 不回滚：后面的分片可能已经广播。
#[derive(Debug)]
pub struct NonceSequencer {
    address: H160,
    initial: u64,
    next: AtomicU64,
}

impl NonceSequencer {
    pub fn starting_at(address: H160, nonce: u64) -> Self {
        Self {
            address,
            initial: nonce,
            next: AtomicU64::new(nonce),
        }
    }

    /// 从链上（pending 标签）初始化
    pub async fn from_chain(provider: &dyn ProviderTrait, address: H160) -> Result<Self, AppError> {
        let chain_nonce = provider.get_transaction_count(address).await?;
        if chain_nonce > u64::MAX.into() {
            return Err(AppError::BlockchainError(format!(
                "节点返回的 nonce 超出范围: {}",
                chain_nonce
            )));
        }
        log_debug!("地址 {:?} 的起始 nonce: {}", address, chain_nonce);
        Ok(Self::starting_at(address, chain_nonce.as_u64()))
    }

    /// 预占一个 nonce
    pub fn acquire(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    pub fn address(&self) -> H160 {
        self.address
    }

    pub fn initial(&self) -> u64 {
        self.initial
    }

    /// 已分配出去的数量
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::SeqCst) - self.initial
    }
}

/// 按发送方地址串行化批量任务，避免两个批量同时读到同一个起始 nonce
#[derive(Clone, Debug, Default)]
pub struct SenderLocks {
    locks: Arc<DashMap<H160, Arc<Mutex<()>>>>,
}

impl SenderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, sender: H160) -> OwnedMutexGuard<()> {
        // 先克隆出 Arc 再 await，不在 DashMap 分片锁内等待
        let lock = self
            .locks
            .entry(sender)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    pub fn is_locked(&self, sender: H160) -> bool {
        self.locks
            .get(&sender)
            .is_some_and(|lock| lock.try_lock().is_err())
    }
}
