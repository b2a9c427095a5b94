use crate::utils::convert::u256_to_bigdecimal;
use bigdecimal::BigDecimal;
use ethers_core::types::U256;

/// wei → 原生币单位（18 位小数），去掉末尾多余的 0
pub fn format_native(wei: U256) -> String {
    let value = u256_to_bigdecimal(wei) / BigDecimal::from(1_000_000_000_000_000_000u64);
    value.normalized().to_string()
}
