use chrono::{DateTime, Utc};
use ethers_core::types::{H160, H256};
use serde::{Deserialize, Serialize};

/// 链下镜像中记录的"处理中"请求类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PendingRequest {
    Mint,
    List,
    Buy,
    CancelListing,
    UpdateListing,
    None,
}

/// 批量中的一个条目：链下 id + 链上 token id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub item_id: String,
    pub token_id: u64,
}

impl BatchItem {
    pub fn new(item_id: impl Into<String>, token_id: u64) -> Self {
        Self {
            item_id: item_id.into(),
            token_id,
        }
    }
}

/// 一次"标记为处理中"的镜像写入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMark {
    pub item_ids: Vec<String>,
    pub token_ids: Vec<u64>,
    pub owner: H160,
    pub edition_id: Option<String>,
    pub request: PendingRequest,
    pub pending_time: DateTime<Utc>,
    pub transaction_hash: H256,
}
