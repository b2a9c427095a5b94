use std::sync::Arc;
use std::time::Duration;

use ethers_core::types::U256;

use crate::config::Config;
use crate::errors::error::AppError;
use crate::infrastructure::mirror::{GraphqlMirror, OffchainMirror};
use crate::infrastructure::provider::ethereum_provider::EthereumProvider;
use crate::infrastructure::provider::{ProviderTrait, RetryAdapter};
use crate::services::TxService;
use crate::services::tx::gas::GasPricer;
use crate::services::tx::registry::ContractRegistry;
use crate::services::tx::session::SessionGuard;
use crate::services::tx::types::{CommandDeps, TxOptions};
use crate::{log_info, log_warn};

/// 应用实例：组装 provider、合约注册表、镜像客户端与命令工厂
pub struct Application {
    pub config: Config,
    pub tx_service: Arc<TxService>,
}
pub type Result<T> = std::result::Result<T, AppError>;
impl Application {
    pub async fn build(config: Config) -> Result<Self> {
        // 1. 先初始化 Provider
        let eth_provider = Arc::new(EthereumProvider::new(&config.ethereum)?);
        let provider = Arc::new(RetryAdapter::new(
            eth_provider,
            config.ethereum.max_retries,
            Duration::from_secs(config.ethereum.base_delay_secs),
        )) as Arc<dyn ProviderTrait>;

        // 2. 单链部署：节点的 chain id 必须与配置一致
        let chain_id = provider.get_chain_id().await?;
        if chain_id != U256::from(config.ethereum.chain_id) {
            return Err(AppError::Config(format!(
                "RPC chain id {} 与配置 {} 不一致",
                chain_id, config.ethereum.chain_id
            )));
        }

        let registry = Arc::new(ContractRegistry::new(config.contracts.clone())?);
        log_info!(
            "合约地址: marketplace={:?} (legacy {:?}), auction={:?} (legacy {:?})",
            config.contracts.marketplace,
            config.contracts.marketplace_legacy,
            config.contracts.auction,
            config.contracts.auction_legacy
        );

        let mirror: Arc<dyn OffchainMirror> = Arc::new(GraphqlMirror::new(&config.mirror)?);
        if config.mirror.auth_token.is_none() {
            log_warn!("未配置 mirror.auth_token，GraphQL 请求将不带认证");
        }

        let deps = Arc::new(CommandDeps {
            provider,
            registry,
            gas: GasPricer::from_config(&config.gas),
            session: SessionGuard::new(),
            options: TxOptions::from_config(&config),
        });

        let tx_service = Arc::new(TxService::new(
            deps,
            mirror,
            config.batch.clone(),
            config.gas.fee_preview_gas_limit,
        ));
        log_info!("✔️ Application build complete (chain id {})", chain_id);

        Ok(Self { config, tx_service })
    }
}
