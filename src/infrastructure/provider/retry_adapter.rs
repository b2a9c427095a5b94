use super::ethereum_provider::ProviderTrait;
use crate::errors::error::AppError;
use crate::utils::RetryPolicy;
use async_trait::async_trait;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Bytes, H160, H256, TransactionReceipt, U256};
use std::sync::Arc;
use std::time::Duration;

/// 给幂等的元数据读取（chain id / gas price / nonce）加上指数退避重试。
/// 估算、eth_call、广播与等待收据直接透传：提交类失败不自动重试。
pub struct RetryAdapter {
    inner: Arc<dyn ProviderTrait>,
    policy: RetryPolicy,
}

impl RetryAdapter {
    pub fn new(inner: Arc<dyn ProviderTrait>, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            policy: RetryPolicy::new(max_retries, base_delay),
        }
    }

    async fn retry_read<T, F, Fut>(&self, what: &str, f: F) -> Result<T, AppError>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: std::future::Future<Output = Result<T, AppError>> + Send,
    {
        self.policy.run(what, |_| f()).await.map_err(|e| {
            AppError::ProviderError(format!(
                "{} 重试 {} 次失败，最后错误: {}",
                what, self.policy.max_attempts, e
            ))
        })
    }
}

#[async_trait]
impl ProviderTrait for RetryAdapter {
    async fn get_chain_id(&self) -> Result<U256, AppError> {
        self.retry_read("eth_chainId", || self.inner.get_chain_id())
            .await
    }

    async fn get_gas_price(&self) -> Result<U256, AppError> {
        self.retry_read("eth_gasPrice", || self.inner.get_gas_price())
            .await
    }

    async fn get_transaction_count(&self, address: H160) -> Result<U256, AppError> {
        self.retry_read("eth_getTransactionCount", || {
            self.inner.get_transaction_count(address)
        })
        .await
    }

    async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256, AppError> {
        self.inner.estimate_gas(tx).await
    }

    async fn send_raw_transaction(&self, rlp: Bytes) -> Result<H256, AppError> {
        self.inner.send_raw_transaction(rlp).await
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        confirmations: usize,
    ) -> Result<TransactionReceipt, AppError> {
        self.inner.wait_for_receipt(tx_hash, confirmations).await
    }

    async fn call(&self, tx: &TypedTransaction) -> Result<Bytes, AppError> {
        self.inner.call(tx).await
    }
}
