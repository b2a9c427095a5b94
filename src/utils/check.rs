use crate::errors::error::AppError;
use ethers_core::types::H160;
use ethers_core::utils::to_checksum;

/// 校验并解析地址字符串（必须是 0x 前缀的 20 字节 hex）
pub fn parse_address(address: &str) -> Result<H160, AppError> {
    let trimmed = address.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| AppError::InvalidAddress(address.to_string()))?;

    if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::InvalidAddress(address.to_string()));
    }

    // 混合大小写时必须满足 EIP-55 校验和
    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    let parsed = trimmed
        .parse::<H160>()
        .map_err(|_| AppError::InvalidAddress(address.to_string()))?;
    if has_lower && has_upper && to_checksum(&parsed, None) != format!("0x{}", body) {
        return Err(AppError::InvalidAddress(address.to_string()));
    }

    Ok(parsed)
}
