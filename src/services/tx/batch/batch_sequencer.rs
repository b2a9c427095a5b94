// services/tx/batch/batch_sequencer.rs

use crate::config::BatchConfig;
use crate::errors::error::AppError;
use crate::infrastructure::mirror::OffchainMirror;
use crate::models::*;
use crate::services::tx::command::{Operation, SubmittedTx, TxCommand};
use crate::services::tx::nonce::{NonceSequencer, SenderLocks};
use crate::services::tx::signer::TxSigner;
use crate::services::tx::types::CommandDeps;
use crate::utils::parse_address;
use crate::{log_info, log_warn};
use chrono::Utc;
use ethers_core::types::{H160, H256};
use futures_util::future::join_all;
use serde::Serialize;
use std::ops::Range;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ChunkStatus {
    /// 已上链且镜像已标记
    Confirmed {
        tx_hash: H256,
        block_number: Option<u64>,
    },
    /// tx_hash 为 None 表示未广播
    Failed {
        tx_hash: Option<H256>,
        error: String,
    },
    /// 前面的分片在广播前失败，本片未广播
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkOutcome {
    pub index: usize,
    pub nonce: Option<u64>,
    pub token_ids: Vec<u64>,
    pub status: ChunkStatus,
}

impl ChunkOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self.status, ChunkStatus::Confirmed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub sender: H160,
    pub initial_nonce: u64,
    pub chunks: Vec<ChunkOutcome>,
}

impl BatchReport {
    pub fn failed_chunks(&self) -> Vec<usize> {
        self.chunks
            .iter()
            .filter(|c| !c.is_confirmed())
            .map(|c| c.index)
            .collect()
    }

    /// 任一分片未确认即整体失败（已广播的分片不回滚）
    pub fn into_result(self) -> Result<Self, AppError> {
        let failed_chunks = self.failed_chunks();
        if failed_chunks.is_empty() {
            return Ok(self);
        }
        let cause = self
            .chunks
            .iter()
            .find_map(|c| match &c.status {
                ChunkStatus::Failed { error, .. } => Some(error.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "chunks skipped".to_string());
        Err(AppError::PartialBatch {
            failed: failed_chunks.len(),
            total: self.chunks.len(),
            failed_chunks,
            cause,
        })
    }
}

/// 按固定大小切分 [0, len)
pub fn plan_chunks(len: usize, chunk_size: usize) -> Result<Vec<Range<usize>>, AppError> {
    if chunk_size == 0 {
        return Err(AppError::Validation("分片大小必须大于 0".into()));
    }
    Ok((0..len)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(len))
        .collect())
}

struct BatchJob<'a> {
    from: &'a str,
    items: &'a [BatchItem],
    edition_id: &'a Option<String>,
    request: PendingRequest,
    chunk_size: usize,
}

struct InFlight {
    index: usize,
    nonce: u64,
    items: Vec<BatchItem>,
    submitted: SubmittedTx,
}

/// 多条目操作拆成若干笔交易，共享一个单调递增的 nonce
pub struct BatchSequencer {
    deps: Arc<CommandDeps>,
    mirror: Arc<dyn OffchainMirror>,
    locks: SenderLocks,
    config: BatchConfig,
}

impl BatchSequencer {
    pub fn new(
        deps: Arc<CommandDeps>,
        mirror: Arc<dyn OffchainMirror>,
        locks: SenderLocks,
        config: BatchConfig,
    ) -> Self {
        Self {
            deps,
            mirror,
            locks,
            config,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub async fn list_batch(
        &self,
        signer: &dyn TxSigner,
        request: &BatchListingRequest,
    ) -> Result<BatchReport, AppError> {
        let job = BatchJob {
            from: &request.from,
            items: &request.items,
            edition_id: &request.edition_id,
            request: PendingRequest::List,
            chunk_size: request.chunk_size.unwrap_or(self.config.list_chunk_size),
        };
        self.run(signer, job, |token_ids, nonce| {
            Operation::ListBatch(ListBatchParams {
                from: request.from.clone(),
                token_ids,
                price: request.price.clone(),
                price_token: request.price_token.clone(),
                start_time: request.start_time,
                contract_addresses: request.contract_addresses.clone(),
                nonce: Some(nonce),
            })
        })
        .await
    }

    pub async fn cancel_listing_batch(
        &self,
        signer: &dyn TxSigner,
        request: &BatchCancelRequest,
    ) -> Result<BatchReport, AppError> {
        let job = BatchJob {
            from: &request.from,
            items: &request.items,
            edition_id: &request.edition_id,
            request: PendingRequest::CancelListing,
            chunk_size: request.chunk_size.unwrap_or(self.config.cancel_chunk_size),
        };
        self.run(signer, job, |token_ids, nonce| {
            Operation::CancelListingBatch(CancelListingBatchParams {
                from: request.from.clone(),
                token_ids,
                contract_addresses: request.contract_addresses.clone(),
                nonce: Some(nonce),
            })
        })
        .await
    }

    async fn run<F>(&self, signer: &dyn TxSigner, job: BatchJob<'_>, make: F) -> Result<BatchReport, AppError>
    where
        F: Fn(Vec<u64>, u64) -> Operation,
    {
        if job.items.is_empty() {
            return Err(AppError::Validation("批量条目为空".into()));
        }
        let sender = parse_address(job.from)?;
        let ranges = plan_chunks(job.items.len(), job.chunk_size)?;
        let total = ranges.len();

        // 持锁区间：读 nonce → 最后一片广播完成
        let guard = self.locks.lock(sender).await;
        let sequencer = NonceSequencer::from_chain(self.deps.provider.as_ref(), sender).await?;
        log_info!(
            "批量 {:?}: {} 个条目分为 {} 片，起始 nonce {}",
            job.request,
            job.items.len(),
            total,
            sequencer.initial()
        );

        let mut outcomes = Vec::with_capacity(total);
        let mut in_flight = Vec::with_capacity(total);
        let mut halted = false;

        for (index, range) in ranges.into_iter().enumerate() {
            let items = &job.items[range];
            let token_ids: Vec<u64> = items.iter().map(|item| item.token_id).collect();
            if halted {
                outcomes.push(ChunkOutcome {
                    index,
                    nonce: None,
                    token_ids,
                    status: ChunkStatus::Skipped,
                });
                continue;
            }

            let nonce = sequencer.acquire();
            let command = TxCommand::new(make(token_ids.clone(), nonce), self.deps.clone());
            match command.submit(signer).await {
                Ok(submitted) => {
                    log_info!("分片 {}/{} 已广播: nonce={} tx={:?}", index + 1, total, nonce, submitted.tx_hash());
                    in_flight.push(InFlight {
                        index,
                        nonce,
                        items: items.to_vec(),
                        submitted,
                    });
                }
                Err(e) => {
                    // 后续 nonce 会卡在空洞之后，不再广播
                    log_warn!("分片 {}/{} 广播前失败，停止后续分片: {}", index + 1, total, e);
                    halted = true;
                    outcomes.push(ChunkOutcome {
                        index,
                        nonce: Some(nonce),
                        token_ids,
                        status: ChunkStatus::Failed {
                            tx_hash: None,
                            error: e.to_string(),
                        },
                    });
                }
            }
        }
        drop(guard);

        // 确认顺序不保证与 nonce 顺序一致
        let confirmed = join_all(
            in_flight
                .into_iter()
                .map(|flight| self.confirm_chunk(flight, sender, &job)),
        )
        .await;
        outcomes.extend(confirmed);
        outcomes.sort_by_key(|c| c.index);

        let report = BatchReport {
            sender,
            initial_nonce: sequencer.initial(),
            chunks: outcomes,
        };
        log_info!(
            "批量 {:?} 完成: {}/{} 片成功",
            job.request,
            total - report.failed_chunks().len(),
            total
        );
        report.into_result()
    }

    async fn confirm_chunk(&self, flight: InFlight, sender: H160, job: &BatchJob<'_>) -> ChunkOutcome {
        let InFlight {
            index,
            nonce,
            items,
            submitted,
        } = flight;
        let tx_hash = submitted.tx_hash();
        let token_ids: Vec<u64> = items.iter().map(|item| item.token_id).collect();

        let status = match submitted.confirm().await {
            Ok(result) => {
                let mark = PendingMark {
                    item_ids: items.iter().map(|item| item.item_id.clone()).collect(),
                    token_ids: token_ids.clone(),
                    owner: sender,
                    edition_id: job.edition_id.clone(),
                    request: job.request,
                    pending_time: Utc::now(),
                    transaction_hash: tx_hash,
                };
                match self.mirror.mark_pending(&mark).await {
                    Ok(()) => ChunkStatus::Confirmed {
                        tx_hash,
                        block_number: result.receipt.block_number.map(|b| b.as_u64()),
                    },
                    Err(e) => {
                        log_warn!("分片 {} 已上链但镜像更新失败: {}", index, e);
                        ChunkStatus::Failed {
                            tx_hash: Some(tx_hash),
                            error: e.to_string(),
                        }
                    }
                }
            }
            Err(e) => ChunkStatus::Failed {
                tx_hash: Some(tx_hash),
                error: e.to_string(),
            },
        };

        ChunkOutcome {
            index,
            nonce: Some(nonce),
            token_ids,
            status,
        }
    }
}
