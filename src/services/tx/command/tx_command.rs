// services/tx/command/tx_command.rs

use super::observer::{Observers, TxEvent, TxObserver};
use super::operation::Operation;
use crate::errors::error::AppError;
use crate::services::tx::signer::TxSigner;
use crate::services::tx::types::{CommandDeps, TxContext, TxResult};
use crate::utils::{RetryPolicy, parse_address};
use crate::{log_debug, log_error, log_info};
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{H160, H256, TransactionReceipt, TransactionRequest, U256};
use std::sync::Arc;

/// 一次性的链上写命令：注册观察者后 `execute` 消费自身
///
/// ```ignore
/// let result = service
///     .list_item(params)
///     .on_transaction_hash(|hash| println!("submitted {hash:?}"))
///     .on_error(|e| eprintln!("{e}"))
///     .finally(|| println!("done"))
///     .execute(&signer)
///     .await;
/// ```
pub struct TxCommand {
    operation: Operation,
    deps: Arc<CommandDeps>,
    observers: Observers,
}

impl TxCommand {
    pub fn new(operation: Operation, deps: Arc<CommandDeps>) -> Self {
        Self {
            operation,
            deps,
            observers: Observers::default(),
        }
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// 订阅全部事件
    pub fn observe(mut self, observer: impl TxObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&TxEvent<'_>) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(f));
        self
    }

    pub fn on_transaction_hash(self, f: impl Fn(H256) + Send + Sync + 'static) -> Self {
        self.on_event(move |event| {
            if let TxEvent::TransactionHash(hash) = event {
                f(*hash)
            }
        })
    }

    pub fn on_receipt(self, f: impl Fn(&TransactionReceipt) + Send + Sync + 'static) -> Self {
        self.on_event(move |event| {
            if let TxEvent::Receipt(receipt) = event {
                f(receipt)
            }
        })
    }

    pub fn on_error(self, f: impl Fn(&AppError) + Send + Sync + 'static) -> Self {
        self.on_event(move |event| {
            if let TxEvent::Error(error) = event {
                f(error)
            }
        })
    }

    pub fn finally(self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_event(move |event| {
            if let TxEvent::Finally = event {
                f()
            }
        })
    }

    /// 提交并等待收据
    pub async fn execute(self, signer: &dyn TxSigner) -> Result<TxResult, AppError> {
        self.submit(signer).await?.confirm().await
    }

    /// 广播阶段：校验 → 会话 → gas → 合约解析 → nonce → 估算 → 签名 → 广播。
    /// 失败时已触发 error 与 finally
    pub async fn submit(self, signer: &dyn TxSigner) -> Result<SubmittedTx, AppError> {
        let TxCommand {
            operation,
            deps,
            observers,
        } = self;
        let method = operation.name();

        match broadcast(&operation, &deps, signer).await {
            Ok((tx_hash, nonce)) => {
                tracing::info!(operation = method, nonce, tx_hash = ?tx_hash, "交易已广播");
                observers.emit(TxEvent::TransactionHash(tx_hash));
                Ok(SubmittedTx {
                    tx_hash,
                    nonce,
                    method,
                    deps,
                    observers,
                })
            }
            Err(e) => {
                let error = observers.fail(e);
                log_error!("{} 提交失败: {}", method, error);
                Err(error)
            }
        }
    }
}

async fn broadcast(
    operation: &Operation,
    deps: &CommandDeps,
    signer: &dyn TxSigner,
) -> Result<(H256, u64), AppError> {
    let sender = parse_address(operation.sender())?;
    if sender != signer.address() {
        return Err(AppError::Validation(format!(
            "发送方 {:?} 与当前钱包 {:?} 不一致",
            sender,
            signer.address()
        )));
    }
    tracing::info!(operation = operation.name(), sender = ?sender, "开始执行链上命令");

    if !deps.session.ensure_live(signer).await {
        return Err(AppError::SessionExpired);
    }

    let quote = deps.gas.quote(deps.provider.as_ref()).await;
    let ctx = operation.build(&deps.registry, sender)?;
    log_debug!(
        "{} → {:?} ({:?}), selector 0x{}",
        ctx.method,
        ctx.to,
        ctx.generation,
        hex::encode(ctx.data.get(..4).unwrap_or_default())
    );

    let nonce = match ctx.nonce {
        Some(n) => n,
        None => pending_nonce(deps, sender).await?,
    };

    let mut tx = request(&ctx, sender, nonce, quote.effective_price, signer.chain_id());
    let estimated = estimate(deps, &ctx, &tx).await?;
    let gas_limit = deps.options.apply_buffer(estimated);
    tx.set_gas(gas_limit);
    log_info!(
        "{} gas: limit={} price={} 最大手续费={}",
        ctx.method,
        gas_limit,
        quote.effective_price,
        quote.describe_max_fee(gas_limit)
    );

    let signature = signer.sign_tx(&tx).await?;
    let tx_hash = deps
        .provider
        .send_raw_transaction(tx.rlp_signed(&signature))
        .await?;
    Ok((tx_hash, nonce))
}

async fn pending_nonce(deps: &CommandDeps, sender: H160) -> Result<u64, AppError> {
    let nonce = deps.provider.get_transaction_count(sender).await?;
    if nonce > U256::from(u64::MAX) {
        return Err(AppError::BlockchainError(format!("nonce 超出范围: {}", nonce)));
    }
    Ok(nonce.as_u64())
}

fn request(
    ctx: &TxContext,
    sender: H160,
    nonce: u64,
    gas_price: U256,
    chain_id: Option<u64>,
) -> TypedTransaction {
    let mut req = TransactionRequest::new()
        .from(sender)
        .to(ctx.to)
        .value(ctx.value)
        .data(ctx.data.clone())
        .gas_price(gas_price)
        .nonce(nonce);
    if let Some(chain_id) = chain_id {
        req = req.chain_id(chain_id);
    }
    req.into()
}

async fn estimate(deps: &CommandDeps, ctx: &TxContext, tx: &TypedTransaction) -> Result<U256, AppError> {
    let policy = if ctx.bounded_estimate {
        deps.options.estimate_retry
    } else {
        RetryPolicy::once()
    };
    policy
        .run(ctx.method, |_| deps.provider.estimate_gas(tx))
        .await
}

/// 已广播、尚未确认的交易
pub struct SubmittedTx {
    tx_hash: H256,
    nonce: u64,
    method: &'static str,
    deps: Arc<CommandDeps>,
    observers: Observers,
}

impl SubmittedTx {
    pub fn tx_hash(&self) -> H256 {
        self.tx_hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// 等待收据，触发 receipt 或 error，最后触发 finally
    pub async fn confirm(self) -> Result<TxResult, AppError> {
        let SubmittedTx {
            tx_hash,
            nonce,
            method,
            deps,
            observers,
        } = self;

        match deps
            .provider
            .wait_for_receipt(tx_hash, deps.options.confirmations)
            .await
        {
            Ok(receipt) => {
                log_info!(
                    "{} 已确认: hash={:?} block={:?} gas_used={:?}",
                    method,
                    tx_hash,
                    receipt.block_number,
                    receipt.gas_used
                );
                observers.emit(TxEvent::Receipt(&receipt));
                observers.emit(TxEvent::Finally);
                Ok(TxResult {
                    tx_hash,
                    nonce,
                    receipt,
                })
            }
            Err(e) => {
                let error = observers.fail(e);
                log_error!("{} 失败 (tx {:?}): {}", method, tx_hash, error);
                Err(error)
            }
        }
    }
}
