//! 各链上操作的参数。调用方构造后不再修改。
//! 金额一律是最小单位（wei）的十进制整数字符串，时间为 unix 秒。

use crate::models::BatchItem;
use ethers_core::types::{H160, H256};
use serde::{Deserialize, Serialize};

/// 调用方指定的合约地址覆盖；None 表示使用当前代部署
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub nft: Option<H160>,
    pub marketplace: Option<H160>,
    pub auction: Option<H160>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceBidParams {
    pub from: String,
    pub token_id: u64,
    pub value: String,
    pub contract_addresses: ContractAddresses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyItemParams {
    pub from: String,
    pub token_id: u64,
    pub owner: H160,
    pub value: String,
    /// true 时用代币支付，不附带原生币
    pub is_payment_token: bool,
    pub contract_addresses: ContractAddresses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveParams {
    pub from: String,
    pub contract_addresses: ContractAddresses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParams {
    pub from: String,
    pub token_id: u64,
    pub contract_addresses: ContractAddresses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionParams {
    pub from: String,
    pub token_id: u64,
    pub reserve_price: String,
    pub start_time: u64,
    pub end_time: u64,
    pub contract_addresses: ContractAddresses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemParams {
    pub from: String,
    pub token_id: u64,
    pub price: String,
    pub price_token: String,
    pub start_time: u64,
    pub contract_addresses: ContractAddresses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintEditionParams {
    pub from: String,
    pub uri: String,
    pub to: H160,
    pub royalty_percentage: u32,
    pub edition_quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintToEditionParams {
    pub from: String,
    pub uri: String,
    pub to: H160,
    pub edition_number: u64,
    pub quantity: u64,
    pub nonce: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEditionParams {
    pub from: String,
    pub to: H160,
    pub royalty_percentage: u32,
    pub edition_quantity: u64,
    pub nonce: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEditionParams {
    pub from: String,
    pub edition_number: u64,
    pub price: String,
    pub price_token: String,
    pub start_time: u64,
    pub contract_addresses: ContractAddresses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionParams {
    pub from: String,
    pub edition_number: u64,
    pub contract_addresses: ContractAddresses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTokenParams {
    pub from: String,
    pub to: H160,
    pub token_id: u64,
    pub contract_addresses: ContractAddresses,
}

/// 原生币或代币转账
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentParams {
    pub from: String,
    pub to: H160,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimParams {
    pub from: String,
    pub to: H160,
    pub amount: String,
    pub proof: Vec<H256>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBatchParams {
    pub from: String,
    pub token_ids: Vec<u64>,
    pub price: String,
    pub price_token: String,
    pub start_time: u64,
    pub contract_addresses: ContractAddresses,
    pub nonce: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelListingBatchParams {
    pub from: String,
    pub token_ids: Vec<u64>,
    pub contract_addresses: ContractAddresses,
    pub nonce: Option<u64>,
}

/// 批量挂单：条目按固定大小分片，每片一笔 listBatch 交易
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchListingRequest {
    pub from: String,
    pub items: Vec<BatchItem>,
    pub price: String,
    pub price_token: String,
    pub start_time: u64,
    pub contract_addresses: ContractAddresses,
    /// 条目所属 edition（链下 id），写入镜像
    pub edition_id: Option<String>,
    /// 单次覆盖分片大小，None 使用配置值
    pub chunk_size: Option<usize>,
}

/// 批量取消挂单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCancelRequest {
    pub from: String,
    pub items: Vec<BatchItem>,
    pub contract_addresses: ContractAddresses,
    pub edition_id: Option<String>,
    pub chunk_size: Option<usize>,
}
