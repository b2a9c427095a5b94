pub mod graphql_mirror;

use crate::errors::error::AppError;
use crate::models::PendingMark;
use async_trait::async_trait;

pub use graphql_mirror::GraphqlMirror;

/// 链下镜像：只写，编排层从不回读
#[async_trait]
pub trait OffchainMirror: Send + Sync {
    async fn mark_pending(&self, mark: &PendingMark) -> Result<(), AppError>;
}
