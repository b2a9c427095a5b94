// services/tx/gas/gas_quote.rs

use crate::utils::format_native;
use ethers_core::types::U256;
use serde::Serialize;

/// 单次命令的 gas 报价，每次执行都重新计算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GasQuote {
    /// 节点报价；None 表示使用了兜底价
    pub base_gas_price: Option<U256>,
    /// 百分比整数（150 = ×1.5）
    pub multiplier_percent: u128,
    pub effective_price: U256,
}

impl GasQuote {
    pub fn is_fallback(&self) -> bool {
        self.base_gas_price.is_none()
    }

    /// 在该报价下 gas_limit 的最大手续费（wei）
    pub fn max_fee(&self, gas_limit: U256) -> U256 {
        self.effective_price.saturating_mul(gas_limit)
    }

    /// 批量预览：每个分片的最大手续费 × 分片数
    pub fn batch_max_fee(&self, gas_limit_per_chunk: U256, chunks: usize) -> U256 {
        self.max_fee(gas_limit_per_chunk)
            .saturating_mul(U256::from(chunks))
    }

    pub fn describe_max_fee(&self, gas_limit: U256) -> String {
        format_native(self.max_fee(gas_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(price: u64) -> GasQuote {
        GasQuote {
            base_gas_price: Some(U256::from(price)),
            multiplier_percent: 100,
            effective_price: U256::from(price),
        }
    }

    #[test]
    fn max_fee_is_price_times_limit() {
        assert_eq!(
            quote(30_000_000_000).max_fee(U256::from(1_200_000u64)),
            U256::from(36_000_000_000_000_000u64)
        );
        assert_eq!(
            quote(30_000_000_000).describe_max_fee(U256::from(1_200_000u64)),
            "0.036"
        );
    }

    #[test]
    fn batch_preview_scales_with_chunk_count() {
        let q = quote(10);
        assert_eq!(q.batch_max_fee(U256::from(100u64), 3), U256::from(3_000u64));
        assert_eq!(q.batch_max_fee(U256::from(100u64), 0), U256::zero());
    }

    #[test]
    fn max_fee_saturates_instead_of_overflowing() {
        let q = GasQuote {
            base_gas_price: None,
            multiplier_percent: 150,
            effective_price: U256::MAX,
        };
        assert_eq!(q.max_fee(U256::from(2u64)), U256::MAX);
        assert!(q.is_fallback());
    }
}
