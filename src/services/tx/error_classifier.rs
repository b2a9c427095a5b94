// services/tx/error_classifier.rs

use crate::errors::error::AppError;

/// 区分"已上链但回滚"与"从未上链"的失败
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// 携带收据的原始失败转换为面向用户的回滚错误，其余原样返回
    pub fn classify(error: AppError) -> AppError {
        match error {
            AppError::ReceiptFailure { message, receipt } => AppError::Reverted {
                tx_hash: receipt.transaction_hash,
                cause: message,
                receipt,
            },
            other => other,
        }
    }
}
