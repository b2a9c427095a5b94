use crate::errors::error::AppError;
use async_trait::async_trait;
use ethers::types::{H160, Signature, transaction::eip2718::TypedTransaction};

/// 钱包/会话协作方。本层只依赖这几项能力，不关心会话如何建立
#[async_trait]
pub trait TxSigner: Send + Sync {
    async fn sign_tx(&self, tx: &TypedTransaction) -> Result<Signature, AppError>;
    fn address(&self) -> H160;
    fn chain_id(&self) -> Option<u64>; // 返回 None 表示不强制 chain_id

    /// 会话是否仍然有效；本地私钥没有会话概念
    async fn is_session_live(&self) -> Result<bool, AppError> {
        Ok(true)
    }

    /// 可用于免密重新认证的标识（例如邮箱）
    fn reauth_identifier(&self) -> Option<String> {
        None
    }

    async fn silent_reauthenticate(&self, identifier: &str) -> Result<(), AppError> {
        Err(AppError::Signing(format!(
            "signer does not support silent re-authentication ({})",
            identifier
        )))
    }
}
