use crate::config::EthereumConfig;
use crate::errors::error::AppError;
use crate::log_info;
use async_trait::async_trait;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{BlockId, BlockNumber, Bytes, H160, H256, TransactionReceipt, U256};
use ethers_providers::{Http, Middleware, PendingTransaction, Provider};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// RPC 传输层抽象（单链，链内不切换网络）
#[async_trait]
pub trait ProviderTrait: Send + Sync {
    async fn get_chain_id(&self) -> Result<U256, AppError>;
    async fn get_gas_price(&self) -> Result<U256, AppError>;
    /// pending 标签下的交易数，即下一个可用 nonce
    async fn get_transaction_count(&self, address: H160) -> Result<U256, AppError>;
    async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256, AppError>;
    /// 广播已签名交易，返回交易哈希
    async fn send_raw_transaction(&self, rlp: Bytes) -> Result<H256, AppError>;
    /// 等待收据；已上链但 status = 0 时返回 `AppError::ReceiptFailure`
    async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        confirmations: usize,
    ) -> Result<TransactionReceipt, AppError>;
    async fn call(&self, tx: &TypedTransaction) -> Result<Bytes, AppError>;
}

pub struct EthereumProvider {
    providers: Vec<Arc<Provider<Http>>>,
    index: AtomicUsize,
}

impl EthereumProvider {
    pub fn new(config: &EthereumConfig) -> Result<Self, AppError> {
        let keys: Vec<&str> = config
            .api_keys
            .split(',')
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();

        // 没有 api key 时直接使用 rpc_url
        let urls = if keys.is_empty() {
            vec![Url::parse(&config.rpc_url)
                .map_err(|e| AppError::Config(format!("无效的 RPC URL {}: {}", config.rpc_url, e)))?]
        } else {
            keys.iter()
                .map(|key| build_keyed_url(&config.rpc_url, key))
                .collect::<Result<Vec<_>, _>>()?
        };

        let providers = urls
            .iter()
            .map(|url| {
                Provider::<Http>::try_from(url.as_str())
                    .map(Arc::new)
                    .map_err(|e| AppError::Config(format!("无效的 RPC URL {}: {}", url, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        log_info!("成功初始化 {} 个RPC Provider", providers.len());

        Ok(Self {
            providers,
            index: AtomicUsize::new(0),
        })
    }

    pub fn get_provider(&self) -> Arc<Provider<Http>> {
        let i = self.index.fetch_add(1, Ordering::Relaxed);
        self.providers[i % self.providers.len()].clone()
    }
}

fn build_keyed_url(base: &str, key: &str) -> Result<Url, AppError> {
    let joined = if base.ends_with('/') {
        format!("{}{}", base, key)
    } else {
        format!("{}/{}", base, key)
    };
    Url::parse(&joined).map_err(|e| AppError::Config(format!("无效的 RPC URL {}: {}", joined, e)))
}

#[async_trait]
impl ProviderTrait for EthereumProvider {
    async fn get_chain_id(&self) -> Result<U256, AppError> {
        self.get_provider()
            .get_chainid()
            .await
            .map_err(AppError::from)
    }

    async fn get_gas_price(&self) -> Result<U256, AppError> {
        self.get_provider()
            .get_gas_price()
            .await
            .map_err(|e| AppError::ProviderError(format!("eth_gasPrice 失败: {}", e)))
    }

    async fn get_transaction_count(&self, address: H160) -> Result<U256, AppError> {
        self.get_provider()
            .get_transaction_count(address, Some(BlockId::Number(BlockNumber::Pending)))
            .await
            .map_err(AppError::from)
    }

    async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256, AppError> {
        self.get_provider()
            .estimate_gas(tx, None)
            .await
            .map_err(|e| AppError::ProviderError(format!("estimate_gas failed: {}", e)))
    }

    async fn send_raw_transaction(&self, rlp: Bytes) -> Result<H256, AppError> {
        let provider = self.get_provider();
        let pending = provider
            .send_raw_transaction(rlp)
            .await
            .map_err(|e| AppError::ProviderError(format!("Broadcast failed: {}", e)))?;
        Ok(*pending)
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        confirmations: usize,
    ) -> Result<TransactionReceipt, AppError> {
        // 持有 provider 的 Arc，保证等待期间 Http Client 不被释放
        let provider = self.get_provider();
        let receipt = PendingTransaction::new(tx_hash, provider.as_ref())
            .confirmations(confirmations)
            .await
            .map_err(|e| AppError::ProviderError(format!("Wait receipt error: {}", e)))?
            .ok_or_else(|| {
                AppError::BlockchainError(format!("Transaction {:?} dropped from mempool", tx_hash))
            })?;

        ensure_success(receipt)
    }

    async fn call(&self, tx: &TypedTransaction) -> Result<Bytes, AppError> {
        self.get_provider()
            .call(tx, None)
            .await
            .map_err(|e| AppError::ProviderError(format!("eth_call failed: {}", e)))
    }
}

/// status == 0 的收据视为链上回滚，带着收据返回给上层分类
pub fn ensure_success(receipt: TransactionReceipt) -> Result<TransactionReceipt, AppError> {
    // status 为 None 通常出现在老旧节点，按成功处理
    if receipt.status.is_some_and(|s| s.is_zero()) {
        return Err(AppError::ReceiptFailure {
            message: format!("execution reverted (tx {:?})", receipt.transaction_hash),
            receipt: Box::new(receipt),
        });
    }
    log_info!(
        "交易执行成功: hash={:?}, block={:?}",
        receipt.transaction_hash,
        receipt.block_number
    );
    Ok(receipt)
}
