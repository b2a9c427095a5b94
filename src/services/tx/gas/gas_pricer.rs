// services/tx/gas/gas_pricer.rs

use crate::config::GasConfig;
use crate::infrastructure::provider::ProviderTrait;
use crate::services::tx::gas::gas_quote::GasQuote;
use crate::{log_debug, log_warn};
use ethers_core::types::U256;

/// Legacy gas price 计算（纯整数运算，无浮点风险）
///
/// effective = floor(节点报价 × multiplier_percent / 100)。
/// 节点报价失败、为 0 或乘法溢出时使用兜底价，兜底价不再乘倍率。
#[derive(Clone, Copy, Debug)]
pub struct GasPricer {
    multiplier_percent: u128,
    fallback_price: U256,
}

impl GasPricer {
    /// 示例：GasPricer::new(150, 300 gwei) 表示报价 ×1.5
    pub fn new(multiplier_percent: u128, fallback_price: U256) -> Self {
        Self {
            multiplier_percent,
            fallback_price,
        }
    }

    pub fn from_config(config: &GasConfig) -> Self {
        Self::new(
            config.multiplier_percent,
            U256::from(config.fallback_price_wei),
        )
    }

    pub fn fallback_price(&self) -> U256 {
        self.fallback_price
    }

    /// 永不失败：拿不到可用报价就返回兜底价
    pub async fn quote(&self, provider: &dyn ProviderTrait) -> GasQuote {
        let base = match provider.get_gas_price().await {
            Ok(price) if !price.is_zero() => price,
            Ok(_) => {
                log_warn!("节点返回 gas price 为 0，使用兜底价 {}", self.fallback_price);
                return self.fallback_quote();
            }
            Err(e) => {
                log_warn!("获取 gas price 失败: {}，使用兜底价 {}", e, self.fallback_price);
                return self.fallback_quote();
            }
        };

        match self.apply_multiplier(base) {
            Some(effective) => {
                log_debug!(
                    "gas price: 节点 {} × {}% = {}",
                    base,
                    self.multiplier_percent,
                    effective
                );
                GasQuote {
                    base_gas_price: Some(base),
                    multiplier_percent: self.multiplier_percent,
                    effective_price: effective,
                }
            }
            None => {
                log_warn!("gas price {} 乘倍率溢出，使用兜底价", base);
                self.fallback_quote()
            }
        }
    }

    fn apply_multiplier(&self, base: U256) -> Option<U256> {
        base.checked_mul(U256::from(self.multiplier_percent))
            .map(|v| v / U256::from(100))
    }

    fn fallback_quote(&self) -> GasQuote {
        GasQuote {
            base_gas_price: None,
            multiplier_percent: self.multiplier_percent,
            effective_price: self.fallback_price,
        }
    }
}

impl Default for GasPricer {
    fn default() -> Self {
        Self::from_config(&GasConfig::default())
    }
}
