//! 单元测试共用的替身：脚本化 RPC、可控会话的签名器、记录型镜像

use crate::config::ContractsConfig;
use crate::errors::error::AppError;
use crate::infrastructure::mirror::OffchainMirror;
use crate::infrastructure::provider::ProviderTrait;
use crate::infrastructure::provider::ethereum_provider::ensure_success;
use crate::models::PendingMark;
use crate::services::tx::command::{TxEvent, TxObserver};
use crate::services::tx::gas::GasPricer;
use crate::services::tx::registry::ContractRegistry;
use crate::services::tx::session::SessionGuard;
use crate::services::tx::signer::{LocalSigner, TxSigner};
use crate::services::tx::types::{CommandDeps, TxOptions};
use crate::utils::RetryPolicy;
use async_trait::async_trait;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Bytes, H160, H256, Signature, TransactionReceipt, U64, U256};
use ethers_core::utils::keccak256;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// anvil 默认账户 0
pub const SIGNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const SIGNER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const CHAIN_ID: u64 = 137;

pub fn contracts() -> ContractsConfig {
    ContractsConfig {
        nft: H160::repeat_byte(0x01),
        marketplace: H160::repeat_byte(0x02),
        marketplace_legacy: H160::repeat_byte(0x03),
        auction: H160::repeat_byte(0x04),
        auction_legacy: H160::repeat_byte(0x05),
        claim: H160::repeat_byte(0x06),
        payment_token: H160::repeat_byte(0x07),
    }
}

pub fn deps(provider: Arc<MockProvider>) -> Arc<CommandDeps> {
    Arc::new(CommandDeps {
        provider,
        registry: Arc::new(ContractRegistry::new(contracts()).expect("abi")),
        gas: GasPricer::default(),
        session: SessionGuard::new(),
        options: TxOptions {
            estimate_retry: RetryPolicy::new(5, Duration::from_millis(10)),
            ..TxOptions::default()
        },
    })
}

struct MockState {
    gas_price: U256,
    gas_price_failures: usize,
    gas_price_calls: usize,
    nonce: U256,
    nonce_calls: usize,
    estimate: U256,
    estimate_fail_first: usize,
    estimate_fail_on: HashSet<usize>,
    estimate_calls: usize,
    estimated: Vec<TypedTransaction>,
    broadcast_error: Option<String>,
    broadcast_attempts: usize,
    broadcasts: usize,
    revert_on: HashSet<usize>,
    reverted: HashSet<H256>,
    call_response: Bytes,
    calls: Vec<TypedTransaction>,
}

/// 脚本化的 RPC 节点。pending nonce = 初始 nonce + 已成功广播数
pub struct MockProvider {
    state: Mutex<MockState>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                gas_price: U256::from(30_000_000_000u64),
                gas_price_failures: 0,
                gas_price_calls: 0,
                nonce: U256::zero(),
                nonce_calls: 0,
                estimate: U256::from(100_000u64),
                estimate_fail_first: 0,
                estimate_fail_on: HashSet::new(),
                estimate_calls: 0,
                estimated: Vec::new(),
                broadcast_error: None,
                broadcast_attempts: 0,
                broadcasts: 0,
                revert_on: HashSet::new(),
                reverted: HashSet::new(),
                call_response: Bytes::default(),
                calls: Vec::new(),
            }),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn set_gas_price(&self, price: U256) {
        self.state().gas_price = price;
    }

    pub fn fail_gas_price_times(&self, n: usize) {
        self.state().gas_price_failures = n;
    }

    pub fn set_nonce(&self, nonce: U256) {
        self.state().nonce = nonce;
    }

    /// 前 n 次估算失败
    pub fn fail_estimate_times(&self, n: usize) {
        self.state().estimate_fail_first = n;
    }

    /// 第 i 次（从 0 开始）估算失败
    pub fn fail_estimate_on_calls(&self, calls: &[usize]) {
        self.state().estimate_fail_on.extend(calls.iter().copied());
    }

    pub fn fail_broadcast_with(&self, message: &str) {
        self.state().broadcast_error = Some(message.to_string());
    }

    /// 第 i 笔成功广播的交易在链上回滚
    pub fn revert_broadcasts(&self, indexes: &[usize]) {
        self.state().revert_on.extend(indexes.iter().copied());
    }

    pub fn set_call_response(&self, output: Bytes) {
        self.state().call_response = output;
    }

    pub fn gas_price_calls(&self) -> usize {
        self.state().gas_price_calls
    }

    pub fn nonce_calls(&self) -> usize {
        self.state().nonce_calls
    }

    pub fn estimate_calls(&self) -> usize {
        self.state().estimate_calls
    }

    /// 估算成功的交易（即随后被签名的交易）
    pub fn estimated_txs(&self) -> Vec<TypedTransaction> {
        self.state().estimated.clone()
    }

    pub fn broadcast_attempts(&self) -> usize {
        self.state().broadcast_attempts
    }

    pub fn calls(&self) -> Vec<TypedTransaction> {
        self.state().calls.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderTrait for MockProvider {
    async fn get_chain_id(&self) -> Result<U256, AppError> {
        Ok(U256::from(CHAIN_ID))
    }

    async fn get_gas_price(&self) -> Result<U256, AppError> {
        let mut s = self.state();
        s.gas_price_calls += 1;
        if s.gas_price_failures > 0 {
            s.gas_price_failures -= 1;
            return Err(AppError::ProviderError("eth_gasPrice unavailable".into()));
        }
        Ok(s.gas_price)
    }

    async fn get_transaction_count(&self, _address: H160) -> Result<U256, AppError> {
        let mut s = self.state();
        s.nonce_calls += 1;
        Ok(s.nonce + U256::from(s.broadcasts))
    }

    async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256, AppError> {
        let mut s = self.state();
        let call = s.estimate_calls;
        s.estimate_calls += 1;
        if call < s.estimate_fail_first || s.estimate_fail_on.contains(&call) {
            return Err(AppError::ProviderError("estimate_gas failed: execution reverted".into()));
        }
        s.estimated.push(tx.clone());
        Ok(s.estimate)
    }

    async fn send_raw_transaction(&self, rlp: Bytes) -> Result<H256, AppError> {
        let mut s = self.state();
        s.broadcast_attempts += 1;
        if let Some(message) = &s.broadcast_error {
            return Err(AppError::ProviderError(format!("Broadcast failed: {}", message)));
        }
        let hash = H256::from(keccak256(&rlp));
        if s.revert_on.contains(&s.broadcasts) {
            s.reverted.insert(hash);
        }
        s.broadcasts += 1;
        Ok(hash)
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        _confirmations: usize,
    ) -> Result<TransactionReceipt, AppError> {
        let s = self.state();
        let status = if s.reverted.contains(&tx_hash) {
            U64::zero()
        } else {
            U64::one()
        };
        let receipt = TransactionReceipt {
            transaction_hash: tx_hash,
            block_number: Some(U64::from(1_000u64)),
            gas_used: Some(s.estimate),
            status: Some(status),
            ..Default::default()
        };
        drop(s);
        ensure_success(receipt)
    }

    async fn call(&self, tx: &TypedTransaction) -> Result<Bytes, AppError> {
        let mut s = self.state();
        s.calls.push(tx.clone());
        Ok(s.call_response.clone())
    }
}

/// 真实私钥签名 + 可控的会话状态
pub struct MockSigner {
    inner: LocalSigner,
    live: AtomicBool,
    reauth: Option<(String, bool)>,
    reauth_attempts: AtomicUsize,
    reject: Option<String>,
}

impl MockSigner {
    pub fn new() -> Self {
        Self {
            inner: LocalSigner::from_private_key(SIGNER_KEY, CHAIN_ID).expect("test key"),
            live: AtomicBool::new(true),
            reauth: None,
            reauth_attempts: AtomicUsize::new(0),
            reject: None,
        }
    }

    pub fn with_session(self, live: bool) -> Self {
        self.live.store(live, Ordering::SeqCst);
        self
    }

    /// succeeds = true 时重新认证会让会话恢复
    pub fn with_reauth(mut self, identifier: &str, succeeds: bool) -> Self {
        self.reauth = Some((identifier.to_string(), succeeds));
        self
    }

    pub fn rejecting(mut self, message: &str) -> Self {
        self.reject = Some(message.to_string());
        self
    }

    pub fn reauth_attempts(&self) -> usize {
        self.reauth_attempts.load(Ordering::SeqCst)
    }
}

impl Default for MockSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TxSigner for MockSigner {
    async fn sign_tx(&self, tx: &TypedTransaction) -> Result<Signature, AppError> {
        match &self.reject {
            Some(message) => Err(AppError::Signing(message.clone())),
            None => self.inner.sign_tx(tx).await,
        }
    }

    fn address(&self) -> H160 {
        self.inner.address()
    }

    fn chain_id(&self) -> Option<u64> {
        self.inner.chain_id()
    }

    async fn is_session_live(&self) -> Result<bool, AppError> {
        Ok(self.live.load(Ordering::SeqCst))
    }

    fn reauth_identifier(&self) -> Option<String> {
        self.reauth.as_ref().map(|(id, _)| id.clone())
    }

    async fn silent_reauthenticate(&self, _identifier: &str) -> Result<(), AppError> {
        self.reauth_attempts.fetch_add(1, Ordering::SeqCst);
        match &self.reauth {
            Some((_, true)) => {
                self.live.store(true, Ordering::SeqCst);
                Ok(())
            }
            _ => Err(AppError::Signing("re-authentication rejected".into())),
        }
    }
}

/// 记录所有镜像写入
#[derive(Default)]
pub struct RecordingMirror {
    marks: Mutex<Vec<PendingMark>>,
    fail: bool,
}

impl RecordingMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn marks(&self) -> Vec<PendingMark> {
        self.marks.lock().unwrap().clone()
    }
}

#[async_trait]
impl OffchainMirror for RecordingMirror {
    async fn mark_pending(&self, mark: &PendingMark) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Mirror("graphql unavailable".into()));
        }
        self.marks.lock().unwrap().push(mark.clone());
        Ok(())
    }
}

/// 按顺序记录生命周期事件
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<(&'static str, Option<String>)>>>,
}

impl EventLog {
    pub fn observer(&self) -> EventLog {
        self.clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|(n, _)| *n).collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, e)| e.clone())
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.names().iter().filter(|n| **n == name).count()
    }
}

impl TxObserver for EventLog {
    fn notify(&self, event: &TxEvent<'_>) {
        let detail = match event {
            TxEvent::Error(e) => Some(e.to_string()),
            _ => None,
        };
        self.events.lock().unwrap().push((event.name(), detail));
    }
}
