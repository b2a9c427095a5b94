use ethers_core::abi::AbiError;
use ethers_core::types::{H256, TransactionReceipt};
use ethers_providers::ProviderError;
use ethers_signers::WalletError;
use thiserror::Error;

/// 链上回滚时展示给用户的提示
pub const REVERT_USER_MESSAGE: &str = "Transaction reverted by the Blockchain. \
Please check the transaction on your wallet activity page for more details.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("无效的地址: {0}")]
    InvalidAddress(String),

    #[error("无效的数字: {0}")]
    InvalidNumber(String),

    #[error("ABI 编解码错误: {0}")]
    Abi(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("无效的provider: {0}")]
    ProviderError(String),

    #[error("区块链RPC错误: {0}")]
    BlockchainError(String),

    #[error("签名失败: {0}")]
    Signing(String),

    /// 节点返回的原始收据失败（交易已上链但 status = 0），尚未经过分类
    #[error("{message}")]
    ReceiptFailure {
        message: String,
        receipt: Box<TransactionReceipt>,
    },

    /// 经 ErrorClassifier 分类后的链上回滚，面向用户
    #[error("{msg} Hash: {tx_hash:?}. Cause: {cause}", msg = REVERT_USER_MESSAGE)]
    Reverted {
        tx_hash: H256,
        cause: String,
        receipt: Box<TransactionReceipt>,
    },

    #[error("Wallet session expired and could not be refreshed")]
    SessionExpired,

    #[error("链下镜像更新失败: {0}")]
    Mirror(String),

    #[error("批量提交部分失败: {failed}/{total} 个分片失败 (chunks {failed_chunks:?}): {cause}")]
    PartialBatch {
        failed: usize,
        total: usize,
        failed_chunks: Vec<usize>,
        cause: String,
    },

    /// 内部不可预期错误（兜底）
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AppError {
    /// 该错误是否携带链上收据（即交易已被打包）
    pub fn receipt(&self) -> Option<&TransactionReceipt> {
        match self {
            AppError::ReceiptFailure { receipt, .. } | AppError::Reverted { receipt, .. } => {
                Some(receipt)
            }
            _ => None,
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::ProviderError(err.to_string())
    }
}

impl From<AbiError> for AppError {
    fn from(err: AbiError) -> Self {
        AppError::Abi(err.to_string())
    }
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        AppError::Signing(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Mirror(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
