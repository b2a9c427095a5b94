// services/tx/registry/contract_registry.rs

use super::abi;
use crate::config::ContractsConfig;
use crate::errors::error::AppError;
use crate::models::ContractAddresses;
use ethers::abi::{Detokenize, Tokenize, parse_abi};
use ethers_contract::BaseContract;
use ethers_core::types::{Bytes, H160};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// 合约代际。marketplace / auction 在迁移期新旧两代并存
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContractGeneration {
    Legacy,
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContractKind {
    Nft,
    Marketplace,
    Auction,
    Claim,
    PaymentToken,
}

/// 一次命令执行解析出的合约：地址 + ABI + 代际
#[derive(Clone)]
pub struct ContractBinding {
    pub kind: ContractKind,
    pub address: H160,
    pub generation: ContractGeneration,
    contract: Arc<BaseContract>,
}

impl ContractBinding {
    pub fn is_legacy(&self) -> bool {
        self.generation == ContractGeneration::Legacy
    }

    pub fn encode<T: Tokenize>(&self, method: &str, args: T) -> Result<Bytes, AppError> {
        self.contract
            .encode(method, args)
            .map_err(|e| AppError::Abi(format!("{:?}.{}: {}", self.kind, method, e)))
    }

    pub fn decode<D: Detokenize>(&self, method: &str, output: &Bytes) -> Result<D, AppError> {
        self.contract
            .decode_output(method, output)
            .map_err(|e| AppError::Abi(format!("{:?}.{} 返回值: {}", self.kind, method, e)))
    }
}

// 相等只看地址与代际，ABI 由二者决定
impl PartialEq for ContractBinding {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.address == other.address
            && self.generation == other.generation
    }
}

impl Eq for ContractBinding {}

impl fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractBinding")
            .field("kind", &self.kind)
            .field("address", &self.address)
            .field("generation", &self.generation)
            .finish()
    }
}

struct Abis {
    nft: Arc<BaseContract>,
    marketplace: Arc<BaseContract>,
    marketplace_legacy: Arc<BaseContract>,
    auction: Arc<BaseContract>,
    auction_legacy: Arc<BaseContract>,
    claim: Arc<BaseContract>,
    token: Arc<BaseContract>,
}

fn load(name: &str, signatures: &[&str]) -> Result<Arc<BaseContract>, AppError> {
    parse_abi(signatures)
        .map(|abi| Arc::new(BaseContract::from(abi)))
        .map_err(|e| AppError::Abi(format!("{} ABI 解析失败: {}", name, e)))
}

/// 按操作类型与调用方覆盖地址解析合约。纯函数，不做网络 I/O
pub struct ContractRegistry {
    addresses: ContractsConfig,
    abis: Abis,
}

impl ContractRegistry {
    pub fn new(addresses: ContractsConfig) -> Result<Self, AppError> {
        let abis = Abis {
            nft: load("nft", abi::NFT_ABI)?,
            marketplace: load("marketplace", abi::MARKETPLACE_ABI)?,
            marketplace_legacy: load("marketplace_legacy", abi::MARKETPLACE_LEGACY_ABI)?,
            auction: load("auction", abi::AUCTION_ABI)?,
            auction_legacy: load("auction_legacy", abi::AUCTION_LEGACY_ABI)?,
            claim: load("claim", abi::CLAIM_ABI)?,
            token: load("token", abi::TOKEN_ABI)?,
        };
        Ok(Self { addresses, abis })
    }

    pub fn addresses(&self) -> &ContractsConfig {
        &self.addresses
    }

    /// 作为调用参数传入 marketplace / auction 的 NFT 合约地址
    pub fn nft_address(&self, overrides: &ContractAddresses) -> H160 {
        overrides.nft.unwrap_or(self.addresses.nft)
    }

    /// 覆盖地址等于旧代部署时走旧代 ABI；其余（含未知地址）走当前代
    pub fn resolve(&self, kind: ContractKind, overrides: &ContractAddresses) -> ContractBinding {
        match kind {
            ContractKind::Nft => self.current(kind, self.nft_address(overrides), &self.abis.nft),
            ContractKind::Marketplace => self.versioned(
                kind,
                overrides.marketplace,
                (self.addresses.marketplace, &self.abis.marketplace),
                (self.addresses.marketplace_legacy, &self.abis.marketplace_legacy),
            ),
            ContractKind::Auction => self.versioned(
                kind,
                overrides.auction,
                (self.addresses.auction, &self.abis.auction),
                (self.addresses.auction_legacy, &self.abis.auction_legacy),
            ),
            ContractKind::Claim => self.current(kind, self.addresses.claim, &self.abis.claim),
            ContractKind::PaymentToken => {
                self.current(kind, self.addresses.payment_token, &self.abis.token)
            }
        }
    }

    fn current(&self, kind: ContractKind, address: H160, abi: &Arc<BaseContract>) -> ContractBinding {
        ContractBinding {
            kind,
            address,
            generation: ContractGeneration::Current,
            contract: abi.clone(),
        }
    }

    fn versioned(
        &self,
        kind: ContractKind,
        requested: Option<H160>,
        current: (H160, &Arc<BaseContract>),
        legacy: (H160, &Arc<BaseContract>),
    ) -> ContractBinding {
        match requested {
            // 两代地址相同时优先当前代
            Some(address) if address != current.0 && address == legacy.0 => ContractBinding {
                kind,
                address,
                generation: ContractGeneration::Legacy,
                contract: legacy.1.clone(),
            },
            Some(address) => self.current(kind, address, current.1),
            None => self.current(kind, current.0, current.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::contracts;
    use ethers_core::types::U256;

    fn registry() -> ContractRegistry {
        ContractRegistry::new(contracts()).unwrap()
    }

    #[test]
    fn defaults_to_current_generation() {
        let r = registry();
        let b = r.resolve(ContractKind::Marketplace, &ContractAddresses::default());
        assert_eq!(b.address, contracts().marketplace);
        assert_eq!(b.generation, ContractGeneration::Current);

        let b = r.resolve(ContractKind::Auction, &ContractAddresses::default());
        assert_eq!(b.address, contracts().auction);
        assert!(!b.is_legacy());
    }

    #[test]
    fn legacy_override_routes_to_legacy_abi() {
        let r = registry();
        let overrides = ContractAddresses {
            marketplace: Some(contracts().marketplace_legacy),
            auction: Some(contracts().auction_legacy),
            ..Default::default()
        };
        let m = r.resolve(ContractKind::Marketplace, &overrides);
        assert!(m.is_legacy());
        assert_eq!(m.address, contracts().marketplace_legacy);
        // 旧代 listItem 只有 5 个参数
        assert!(m
            .encode(
                "listItem",
                (H160::zero(), U256::one(), U256::one(), U256::one(), U256::zero())
            )
            .is_ok());

        assert!(r.resolve(ContractKind::Auction, &overrides).is_legacy());
    }

    #[test]
    fn unknown_override_uses_current_abi_at_that_address() {
        let r = registry();
        let other = H160::repeat_byte(0xee);
        let overrides = ContractAddresses {
            marketplace: Some(other),
            ..Default::default()
        };
        let b = r.resolve(ContractKind::Marketplace, &overrides);
        assert_eq!(b.address, other);
        assert_eq!(b.generation, ContractGeneration::Current);
    }

    #[test]
    fn resolution_is_pure() {
        let r = registry();
        let overrides = ContractAddresses {
            auction: Some(contracts().auction_legacy),
            ..Default::default()
        };
        for kind in [
            ContractKind::Nft,
            ContractKind::Marketplace,
            ContractKind::Auction,
            ContractKind::Claim,
            ContractKind::PaymentToken,
        ] {
            assert_eq!(r.resolve(kind, &overrides), r.resolve(kind, &overrides));
        }
    }

    #[test]
    fn nft_override_is_used_for_arguments_and_binding() {
        let r = registry();
        let nft = H160::repeat_byte(0x42);
        let overrides = ContractAddresses {
            nft: Some(nft),
            ..Default::default()
        };
        assert_eq!(r.nft_address(&overrides), nft);
        assert_eq!(r.resolve(ContractKind::Nft, &overrides).address, nft);
        assert_eq!(r.nft_address(&ContractAddresses::default()), contracts().nft);
    }

    #[test]
    fn encodes_current_list_item_with_selector() {
        let r = registry();
        let b = r.resolve(ContractKind::Marketplace, &ContractAddresses::default());
        let data = b
            .encode(
                "listItem",
                (
                    contracts().nft,
                    U256::from(1u64),
                    U256::one(),
                    U256::exp10(18),
                    U256::zero(),
                    true,
                    false,
                    U256::from(1_900_000_000u64),
                ),
            )
            .unwrap();
        assert_eq!(data.len(), 4 + 8 * 32);
        assert!(b.encode("listItem", (H160::zero(), U256::one())).is_err());
    }

    #[test]
    fn decodes_view_outputs() {
        let r = registry();
        let claim = r.resolve(ContractKind::Claim, &ContractAddresses::default());
        let mut word = [0u8; 32];
        word[31] = 1;
        let claimed: bool = claim.decode("hasClaimed", &Bytes::from(word.to_vec())).unwrap();
        assert!(claimed);
    }
}
