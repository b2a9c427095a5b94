// services/tx_service.rs
use crate::config::BatchConfig;
use crate::errors::error::AppError;
use crate::infrastructure::mirror::OffchainMirror;
use crate::log_info;
use crate::models::*;
use crate::services::tx::batch::{BatchReport, BatchSequencer, plan_chunks};
use crate::services::tx::command::{Operation, TxCommand};
use crate::services::tx::gas::GasQuote;
use crate::services::tx::nonce::SenderLocks;
use crate::services::tx::query::QueryService;
use crate::services::tx::signer::TxSigner;
use crate::services::tx::types::CommandDeps;
use ethers_core::types::{H160, U256};
use serde::Serialize;
use std::sync::Arc;

/// 命令工厂：每种操作一个方法，返回待执行的 `TxCommand`
pub struct TxService {
    deps: Arc<CommandDeps>,
    batch: BatchSequencer,
    queries: QueryService,
    fee_preview_gas_limit: U256,
}

/// 手续费预览
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeePreview {
    pub quote: GasQuote,
    pub gas_limit: U256,
    pub chunks: usize,
    pub max_fee: U256,
}

impl TxService {
    pub fn new(
        deps: Arc<CommandDeps>,
        mirror: Arc<dyn OffchainMirror>,
        batch_config: BatchConfig,
        fee_preview_gas_limit: u64,
    ) -> Self {
        let queries = QueryService::new(deps.provider.clone(), deps.registry.clone());
        let batch = BatchSequencer::new(deps.clone(), mirror, SenderLocks::new(), batch_config);
        Self {
            deps,
            batch,
            queries,
            fee_preview_gas_limit: U256::from(fee_preview_gas_limit),
        }
    }

    fn command(&self, operation: Operation) -> TxCommand {
        TxCommand::new(operation, self.deps.clone())
    }

    pub fn place_bid(&self, params: PlaceBidParams) -> TxCommand {
        self.command(Operation::PlaceBid(params))
    }

    pub fn buy_item(&self, params: BuyItemParams) -> TxCommand {
        self.command(Operation::BuyItem(params))
    }

    pub fn approve_marketplace(&self, params: ApproveParams) -> TxCommand {
        self.command(Operation::ApproveMarketplace(params))
    }

    pub fn approve_auction(&self, params: ApproveParams) -> TxCommand {
        self.command(Operation::ApproveAuction(params))
    }

    pub fn burn(&self, params: TokenParams) -> TxCommand {
        self.command(Operation::Burn(params))
    }

    pub fn cancel_listing(&self, params: TokenParams) -> TxCommand {
        self.command(Operation::CancelListing(params))
    }

    pub fn cancel_auction(&self, params: TokenParams) -> TxCommand {
        self.command(Operation::CancelAuction(params))
    }

    pub fn create_auction(&self, params: AuctionParams) -> TxCommand {
        self.command(Operation::CreateAuction(params))
    }

    pub fn update_auction(&self, params: AuctionParams) -> TxCommand {
        self.command(Operation::UpdateAuction(params))
    }

    /// 拍卖结算
    pub fn result_auction(&self, params: TokenParams) -> TxCommand {
        self.command(Operation::ResultAuction(params))
    }

    pub fn list_item(&self, params: ListItemParams) -> TxCommand {
        self.command(Operation::ListItem(params))
    }

    pub fn update_listing(&self, params: ListItemParams) -> TxCommand {
        self.command(Operation::UpdateListing(params))
    }

    pub fn mint_edition(&self, params: MintEditionParams) -> TxCommand {
        self.command(Operation::MintEdition(params))
    }

    pub fn mint_to_edition(&self, params: MintToEditionParams) -> TxCommand {
        self.command(Operation::MintToEdition(params))
    }

    pub fn create_edition(&self, params: CreateEditionParams) -> TxCommand {
        self.command(Operation::CreateEdition(params))
    }

    pub fn list_edition(&self, params: ListEditionParams) -> TxCommand {
        self.command(Operation::ListEdition(params))
    }

    pub fn cancel_edition_listing(&self, params: EditionParams) -> TxCommand {
        self.command(Operation::CancelEditionListing(params))
    }

    pub fn transfer_token(&self, params: TransferTokenParams) -> TxCommand {
        self.command(Operation::TransferToken(params))
    }

    pub fn send_native(&self, params: PaymentParams) -> TxCommand {
        self.command(Operation::SendNative(params))
    }

    /// 代币转账：对代币合约 transfer 编码的 call data
    pub fn send_token(&self, params: PaymentParams) -> TxCommand {
        self.command(Operation::SendToken(params))
    }

    pub fn claim(&self, params: ClaimParams) -> TxCommand {
        self.command(Operation::Claim(params))
    }

    /// 单笔 listBatch（调用方自行管理 nonce）
    pub fn list_batch_chunk(&self, params: ListBatchParams) -> TxCommand {
        self.command(Operation::ListBatch(params))
    }

    pub fn cancel_listing_batch_chunk(&self, params: CancelListingBatchParams) -> TxCommand {
        self.command(Operation::CancelListingBatch(params))
    }

    pub async fn list_batch(
        &self,
        signer: &dyn TxSigner,
        request: &BatchListingRequest,
    ) -> Result<BatchReport, AppError> {
        self.batch.list_batch(signer, request).await
    }

    pub async fn cancel_listing_batch(
        &self,
        signer: &dyn TxSigner,
        request: &BatchCancelRequest,
    ) -> Result<BatchReport, AppError> {
        self.batch.cancel_listing_batch(signer, request).await
    }

    pub async fn has_claimed(&self, account: H160) -> Result<bool, AppError> {
        self.queries.has_claimed(account).await
    }

    pub async fn edition_royalty(&self, edition_number: u64) -> Result<U256, AppError> {
        self.queries.edition_royalty(edition_number).await
    }

    pub async fn rewards_rate(&self, marketplace: Option<H160>) -> Result<U256, AppError> {
        self.queries.rewards_rate(marketplace).await
    }

    pub async fn gas_quote(&self) -> GasQuote {
        self.deps.gas.quote(self.deps.provider.as_ref()).await
    }

    /// 单笔交易的最大手续费预览
    pub async fn preview_fee(&self) -> FeePreview {
        let quote = self.gas_quote().await;
        FeePreview {
            quote,
            gas_limit: self.fee_preview_gas_limit,
            chunks: 1,
            max_fee: quote.max_fee(self.fee_preview_gas_limit),
        }
    }

    /// 批量预览 = 单片预览 × 分片数
    pub async fn preview_batch_fee(&self, item_count: usize) -> Result<FeePreview, AppError> {
        let chunks = plan_chunks(item_count, self.batch.config().list_chunk_size)?.len();
        let quote = self.gas_quote().await;
        let preview = FeePreview {
            quote,
            gas_limit: self.fee_preview_gas_limit,
            chunks,
            max_fee: quote.batch_max_fee(self.fee_preview_gas_limit, chunks),
        };
        log_info!(
            "批量手续费预览: {} 个条目 / {} 片, 最多 {}",
            item_count,
            chunks,
            preview.max_fee
        );
        Ok(preview)
    }
}
