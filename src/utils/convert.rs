use crate::errors::error::AppError;
use bigdecimal::BigDecimal;
use ethers_core::types::U256;
use std::str::FromStr;

/// 解析最小单位整数金额字符串（如 wei），拒绝小数、负数和空串
pub fn parse_base_units(amount: &str) -> Result<U256, AppError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::InvalidNumber(format!(
            "金额必须是最小单位的整数字符串: {:?}",
            amount
        )));
    }
    U256::from_dec_str(trimmed)
        .map_err(|e| AppError::InvalidNumber(format!("金额 {} 超出 uint256 范围: {}", amount, e)))
}

/// 将U256 BigDecimal
pub fn u256_to_bigdecimal(value: U256) -> BigDecimal {
    // 先转字符串再转 BigDecimal (处理大数最稳)
    let s = value.to_string();
    BigDecimal::from_str(&s).unwrap_or_else(|_| BigDecimal::from(0))
}
