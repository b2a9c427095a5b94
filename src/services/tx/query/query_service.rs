// services/tx/query/query_service.rs

use crate::errors::error::AppError;
use crate::infrastructure::provider::ProviderTrait;
use crate::log_debug;
use crate::models::ContractAddresses;
use crate::services::tx::registry::{ContractBinding, ContractKind, ContractRegistry};
use ethers::abi::{Detokenize, Tokenize};
use ethers_core::types::{H160, TransactionRequest, U256};
use std::sync::Arc;

/// 只读查询：直接 eth_call，不经过会话、gas 与生命周期事件
pub struct QueryService {
    provider: Arc<dyn ProviderTrait>,
    registry: Arc<ContractRegistry>,
}

impl QueryService {
    pub fn new(provider: Arc<dyn ProviderTrait>, registry: Arc<ContractRegistry>) -> Self {
        Self { provider, registry }
    }

    /// 该地址是否已领取过奖励
    pub async fn has_claimed(&self, account: H160) -> Result<bool, AppError> {
        let claim = self.registry.resolve(ContractKind::Claim, &ContractAddresses::default());
        self.call(&claim, "hasClaimed", account).await
    }

    /// edition 的版税百分比
    pub async fn edition_royalty(&self, edition_number: u64) -> Result<U256, AppError> {
        let nft = self.registry.resolve(ContractKind::Nft, &ContractAddresses::default());
        let (_num_sold, _quantity, royalty): (U256, U256, U256) =
            self.call(&nft, "editions", U256::from(edition_number)).await?;
        Ok(royalty)
    }

    /// marketplace 奖励比率；只有当前代合约提供
    pub async fn rewards_rate(&self, marketplace: Option<H160>) -> Result<U256, AppError> {
        let overrides = ContractAddresses {
            marketplace,
            ..Default::default()
        };
        let market = self.registry.resolve(ContractKind::Marketplace, &overrides);
        if market.is_legacy() {
            return Err(AppError::Validation(format!(
                "旧代 marketplace {:?} 没有 rewardsRate",
                market.address
            )));
        }
        self.call(&market, "rewardsRate", ()).await
    }

    async fn call<T: Tokenize, D: Detokenize>(
        &self,
        binding: &ContractBinding,
        method: &str,
        args: T,
    ) -> Result<D, AppError> {
        let req = TransactionRequest::new()
            .to(binding.address)
            .data(binding.encode(method, args)?);
        let output = self.provider.call(&req.into()).await?;
        log_debug!("eth_call {:?}.{} 返回 {} 字节", binding.kind, method, output.len());
        binding.decode(method, &output)
    }
}
