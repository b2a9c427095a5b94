// services/tx/types.rs

use crate::config::Config;
use crate::infrastructure::provider::ProviderTrait;
use crate::services::tx::gas::GasPricer;
use crate::services::tx::registry::{ContractGeneration, ContractRegistry};
use crate::services::tx::session::SessionGuard;
use crate::utils::RetryPolicy;
use ethers_core::types::{Bytes, H160, H256, TransactionReceipt, U256};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TxOptions {
    pub gas_limit_buffer_percent: u64, // 百分比，例如 120 表示 +20%
    pub confirmations: usize,          // 所需确认数
    /// 需要有界重试估算的操作使用（mint 到已有 edition）
    pub estimate_retry: RetryPolicy,
}

impl Default for TxOptions {
    fn default() -> Self {
        Self {
            gas_limit_buffer_percent: 100,
            confirmations: 1,
            estimate_retry: RetryPolicy::new(5, Duration::from_secs(1)),
        }
    }
}

impl TxOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            gas_limit_buffer_percent: config.gas.gas_limit_buffer_percent,
            confirmations: config.ethereum.confirmations,
            estimate_retry: RetryPolicy::new(
                config.gas.mint_estimate_attempts,
                Duration::from_millis(config.gas.mint_estimate_delay_ms),
            ),
        }
    }

    pub fn apply_buffer(&self, estimated: U256) -> U256 {
        estimated.saturating_mul(U256::from(self.gas_limit_buffer_percent)) / U256::from(100)
    }
}

/// 命令执行所需的共享依赖，所有命令共用一份
pub struct CommandDeps {
    pub provider: Arc<dyn ProviderTrait>,
    pub registry: Arc<ContractRegistry>,
    pub gas: GasPricer,
    pub session: SessionGuard,
    pub options: TxOptions,
}

/// 由操作参数构建出的待签名调用
#[derive(Debug, Clone)]
pub struct TxContext {
    pub method: &'static str,
    pub to: H160,
    pub value: U256,
    pub data: Bytes,
    /// 调用方指定的 nonce；None 时取链上 pending nonce
    pub nonce: Option<u64>,
    pub bounded_estimate: bool,
    /// 原生币转账没有合约
    pub generation: Option<ContractGeneration>,
}

#[derive(Debug, Clone)]
pub struct TxResult {
    pub tx_hash: H256,
    pub nonce: u64,
    pub receipt: TransactionReceipt,
}
