use config::{ConfigError, Environment, File};
use ethers_core::types::H160;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub ethereum: EthereumConfig,
    pub contracts: ContractsConfig,
    #[serde(default)]
    pub gas: GasConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    pub mirror: MirrorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EthereumConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    /// 逗号分隔，多个 key 轮询使用
    pub api_keys: String,
    pub max_retries: usize,
    pub base_delay_secs: u64,
    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
}

/// 已部署合约地址。marketplace / auction 同时存在新旧两代
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ContractsConfig {
    pub nft: H160,
    pub marketplace: H160,
    pub marketplace_legacy: H160,
    pub auction: H160,
    pub auction_legacy: H160,
    pub claim: H160,
    pub payment_token: H160,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GasConfig {
    /// gas price 安全倍率（百分比，150 = ×1.5）
    pub multiplier_percent: u128,
    /// 节点报价不可用时的兜底 gas price（wei）
    pub fallback_price_wei: u64,
    /// gas limit 缓冲（百分比，100 = 不加缓冲）
    pub gas_limit_buffer_percent: u64,
    pub mint_estimate_attempts: usize,
    pub mint_estimate_delay_ms: u64,
    /// 费用预览使用的 gas limit
    pub fee_preview_gas_limit: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            multiplier_percent: 150,
            fallback_price_wei: 300_000_000_000,
            gas_limit_buffer_percent: 100,
            mint_estimate_attempts: 5,
            mint_estimate_delay_ms: 1_000,
            fee_preview_gas_limit: 1_200_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BatchConfig {
    pub list_chunk_size: usize,
    pub cancel_chunk_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            list_chunk_size: 120,
            cancel_chunk_size: 120,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MirrorConfig {
    pub graphql_url: String,
    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_confirmations() -> usize {
    1
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        config::Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // 例如 APP__ETHEREUM__RPC_URL 覆盖 ethereum.rpc_url
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const SAMPLE: &str = r#"
        [ethereum]
        rpc_url = "https://polygon-rpc.example/"
        chain_id = 137
        api_keys = "k1,k2"
        max_retries = 3
        base_delay_secs = 1

        [contracts]
        nft = "0x1000000000000000000000000000000000000001"
        marketplace = "0x2000000000000000000000000000000000000002"
        marketplace_legacy = "0x3000000000000000000000000000000000000003"
        auction = "0x4000000000000000000000000000000000000004"
        auction_legacy = "0x5000000000000000000000000000000000000005"
        claim = "0x6000000000000000000000000000000000000006"
        payment_token = "0x7000000000000000000000000000000000000007"

        [gas]
        multiplier_percent = 200

        [mirror]
        graphql_url = "https://api.example/graphql"
    "#;

    #[test]
    fn parses_sections_and_fills_defaults() {
        let cfg: Config = config::Config::builder()
            .add_source(File::from_str(SAMPLE, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.ethereum.chain_id, 137);
        assert_eq!(cfg.ethereum.confirmations, 1);
        assert_eq!(
            cfg.contracts.marketplace_legacy,
            "0x3000000000000000000000000000000000000003".parse::<H160>().unwrap()
        );
        assert_eq!(cfg.gas.multiplier_percent, 200);
        assert_eq!(cfg.gas.fallback_price_wei, 300_000_000_000);
        assert_eq!(cfg.batch.list_chunk_size, 120);
        assert!(cfg.mirror.auth_token.is_none());
    }
}
