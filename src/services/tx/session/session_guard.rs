// services/tx/session/session_guard.rs

use crate::services::tx::signer::TxSigner;
use crate::{log_info, log_warn};

/// 签名前确认钱包会话仍然有效；失效时最多尝试一次静默重新认证
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionGuard;

impl SessionGuard {
    pub fn new() -> Self {
        Self
    }

    /// 返回 false 表示不得提交交易
    pub async fn ensure_live(&self, signer: &dyn TxSigner) -> bool {
        if Self::check(signer).await {
            return true;
        }

        let Some(identifier) = signer.reauth_identifier() else {
            log_warn!("会话已失效且没有可用于静默认证的标识: {:?}", signer.address());
            return false;
        };

        log_info!("会话已失效，尝试静默重新认证: {:?}", signer.address());
        if let Err(e) = signer.silent_reauthenticate(&identifier).await {
            log_warn!("静默重新认证失败: {}", e);
            return false;
        }

        Self::check(signer).await
    }

    // 查询出错按失效处理
    async fn check(signer: &dyn TxSigner) -> bool {
        match signer.is_session_live().await {
            Ok(live) => live,
            Err(e) => {
                log_warn!("查询会话状态失败: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockSigner;

    #[tokio::test]
    async fn live_session_passes_without_reauth() {
        let signer = MockSigner::new();
        assert!(SessionGuard::new().ensure_live(&signer).await);
        assert_eq!(signer.reauth_attempts(), 0);
    }

    #[tokio::test]
    async fn expired_session_is_refreshed_once() {
        let signer = MockSigner::new()
            .with_session(false)
            .with_reauth("user@example.com", true);
        assert!(SessionGuard::new().ensure_live(&signer).await);
        assert_eq!(signer.reauth_attempts(), 1);
    }

    #[tokio::test]
    async fn failed_reauth_is_not_retried() {
        let signer = MockSigner::new()
            .with_session(false)
            .with_reauth("user@example.com", false);
        assert!(!SessionGuard::new().ensure_live(&signer).await);
        assert_eq!(signer.reauth_attempts(), 1);
    }

    #[tokio::test]
    async fn no_identifier_means_no_reauth() {
        let signer = MockSigner::new().with_session(false);
        assert!(!SessionGuard::new().ensure_live(&signer).await);
        assert_eq!(signer.reauth_attempts(), 0);
    }
}
