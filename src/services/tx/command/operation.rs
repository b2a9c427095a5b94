// services/tx/command/operation.rs

use crate::errors::error::AppError;
use crate::models::*;
use crate::services::tx::registry::{ContractBinding, ContractKind, ContractRegistry};
use crate::services::tx::types::TxContext;
use crate::utils::parse_base_units;
use ethers::abi::Token;
use ethers_core::types::{Bytes, H160, U256};

/// 所有链上写操作。每个变体持有调用方构造的不可变参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    PlaceBid(PlaceBidParams),
    BuyItem(BuyItemParams),
    ApproveMarketplace(ApproveParams),
    ApproveAuction(ApproveParams),
    Burn(TokenParams),
    CancelListing(TokenParams),
    CancelAuction(TokenParams),
    CreateAuction(AuctionParams),
    UpdateAuction(AuctionParams),
    ResultAuction(TokenParams),
    ListItem(ListItemParams),
    UpdateListing(ListItemParams),
    MintEdition(MintEditionParams),
    MintToEdition(MintToEditionParams),
    CreateEdition(CreateEditionParams),
    ListEdition(ListEditionParams),
    CancelEditionListing(EditionParams),
    TransferToken(TransferTokenParams),
    SendNative(PaymentParams),
    SendToken(PaymentParams),
    Claim(ClaimParams),
    ListBatch(ListBatchParams),
    CancelListingBatch(CancelListingBatchParams),
}

/// 只允许当前代合约的操作：忽略 marketplace / auction 覆盖，保留 nft 覆盖
fn current_only(overrides: &ContractAddresses) -> ContractAddresses {
    ContractAddresses {
        nft: overrides.nft,
        ..Default::default()
    }
}

fn uint(value: u64) -> U256 {
    U256::from(value)
}

fn token_ids(ids: &[u64]) -> Token {
    Token::Array(ids.iter().map(|id| Token::Uint(U256::from(*id))).collect())
}

/// 新一代挂单同时带原生币价格和代币价格，价格 > 0 即视为接受该币种
struct Pricing {
    native: U256,
    token: U256,
}

impl Pricing {
    fn parse(native: &str, token: &str) -> Result<Self, AppError> {
        Ok(Self {
            native: parse_base_units(native)?,
            token: parse_base_units(token)?,
        })
    }

    fn accepts_native(&self) -> bool {
        !self.native.is_zero()
    }

    fn accepts_token(&self) -> bool {
        !self.token.is_zero()
    }
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::PlaceBid(_) => "placeBid",
            Operation::BuyItem(_) => "buyItem",
            Operation::ApproveMarketplace(_) => "approveMarketplace",
            Operation::ApproveAuction(_) => "approveAuction",
            Operation::Burn(_) => "burn",
            Operation::CancelListing(_) => "cancelListing",
            Operation::CancelAuction(_) => "cancelAuction",
            Operation::CreateAuction(_) => "createAuction",
            Operation::UpdateAuction(_) => "updateAuction",
            Operation::ResultAuction(_) => "resultAuction",
            Operation::ListItem(_) => "listItem",
            Operation::UpdateListing(_) => "updateListing",
            Operation::MintEdition(_) => "createEditionWithNFTs",
            Operation::MintToEdition(_) => "safeMintToEditionQuantity",
            Operation::CreateEdition(_) => "createEdition",
            Operation::ListEdition(_) => "listEdition",
            Operation::CancelEditionListing(_) => "cancelEditionListing",
            Operation::TransferToken(_) => "transferFrom",
            Operation::SendNative(_) => "sendNative",
            Operation::SendToken(_) => "transfer",
            Operation::Claim(_) => "claim",
            Operation::ListBatch(_) => "listBatch",
            Operation::CancelListingBatch(_) => "cancelListingBatch",
        }
    }

    /// 发送方地址（未校验的原始字符串）
    pub fn sender(&self) -> &str {
        match self {
            Operation::PlaceBid(p) => &p.from,
            Operation::BuyItem(p) => &p.from,
            Operation::ApproveMarketplace(p) | Operation::ApproveAuction(p) => &p.from,
            Operation::Burn(p)
            | Operation::CancelListing(p)
            | Operation::CancelAuction(p)
            | Operation::ResultAuction(p) => &p.from,
            Operation::CreateAuction(p) | Operation::UpdateAuction(p) => &p.from,
            Operation::ListItem(p) | Operation::UpdateListing(p) => &p.from,
            Operation::MintEdition(p) => &p.from,
            Operation::MintToEdition(p) => &p.from,
            Operation::CreateEdition(p) => &p.from,
            Operation::ListEdition(p) => &p.from,
            Operation::CancelEditionListing(p) => &p.from,
            Operation::TransferToken(p) => &p.from,
            Operation::SendNative(p) | Operation::SendToken(p) => &p.from,
            Operation::Claim(p) => &p.from,
            Operation::ListBatch(p) => &p.from,
            Operation::CancelListingBatch(p) => &p.from,
        }
    }

    /// 解析合约并编码调用数据，不做网络 I/O
    pub fn build(&self, registry: &ContractRegistry, sender: H160) -> Result<TxContext, AppError> {
        let method = self.name();
        match self {
            Operation::PlaceBid(p) => {
                let auction = registry.resolve(ContractKind::Auction, &p.contract_addresses);
                let nft = registry.nft_address(&p.contract_addresses);
                let value = parse_base_units(&p.value)?;
                let data = if auction.is_legacy() {
                    auction.encode(method, (nft, uint(p.token_id)))?
                } else {
                    auction.encode(method, (nft, uint(p.token_id), false, value))?
                };
                Ok(contract_call(method, &auction, value, data))
            }
            Operation::BuyItem(p) => {
                let market = registry.resolve(ContractKind::Marketplace, &p.contract_addresses);
                let nft = registry.nft_address(&p.contract_addresses);
                let data = if market.is_legacy() {
                    market.encode(method, (nft, uint(p.token_id), p.owner))?
                } else {
                    market.encode(method, (nft, uint(p.token_id), p.owner, p.is_payment_token))?
                };
                // 代币支付时不附带原生币
                let value = if p.is_payment_token {
                    U256::zero()
                } else {
                    parse_base_units(&p.value)?
                };
                Ok(contract_call(method, &market, value, data))
            }
            Operation::ApproveMarketplace(p) => {
                self.approve(registry, &p.contract_addresses, registry.addresses().marketplace)
            }
            Operation::ApproveAuction(p) => {
                self.approve(registry, &p.contract_addresses, registry.addresses().auction)
            }
            Operation::Burn(p) => {
                let nft = registry.resolve(ContractKind::Nft, &p.contract_addresses);
                let data = nft.encode(method, uint(p.token_id))?;
                Ok(contract_call(method, &nft, U256::zero(), data))
            }
            Operation::CancelListing(p) => {
                let market = registry.resolve(ContractKind::Marketplace, &p.contract_addresses);
                let nft = registry.nft_address(&p.contract_addresses);
                let data = market.encode(method, (nft, uint(p.token_id)))?;
                Ok(contract_call(method, &market, U256::zero(), data))
            }
            Operation::CancelAuction(p) | Operation::ResultAuction(p) => {
                let auction = registry.resolve(ContractKind::Auction, &p.contract_addresses);
                let nft = registry.nft_address(&p.contract_addresses);
                let data = auction.encode(method, (nft, uint(p.token_id)))?;
                Ok(contract_call(method, &auction, U256::zero(), data))
            }
            Operation::CreateAuction(p) | Operation::UpdateAuction(p) => {
                if p.end_time <= p.start_time {
                    return Err(AppError::Validation(format!(
                        "拍卖结束时间 {} 必须晚于开始时间 {}",
                        p.end_time, p.start_time
                    )));
                }
                let auction = registry.resolve(ContractKind::Auction, &p.contract_addresses);
                let nft = registry.nft_address(&p.contract_addresses);
                let reserve = parse_base_units(&p.reserve_price)?;
                let (start, end) = (uint(p.start_time), uint(p.end_time));
                let data = if auction.is_legacy() {
                    auction.encode(method, (nft, uint(p.token_id), reserve, start, end))?
                } else {
                    auction.encode(method, (nft, uint(p.token_id), reserve, false, start, end))?
                };
                Ok(contract_call(method, &auction, U256::zero(), data))
            }
            Operation::ListItem(p) => {
                let market = registry.resolve(ContractKind::Marketplace, &p.contract_addresses);
                let nft = registry.nft_address(&p.contract_addresses);
                let pricing = Pricing::parse(&p.price, &p.price_token)?;
                let (id, start) = (uint(p.token_id), uint(p.start_time));
                let data = if market.is_legacy() {
                    market.encode(method, (nft, id, U256::one(), pricing.native, start))?
                } else {
                    market.encode(
                        method,
                        (
                            nft,
                            id,
                            U256::one(),
                            pricing.native,
                            pricing.token,
                            pricing.accepts_native(),
                            pricing.accepts_token(),
                            start,
                        ),
                    )?
                };
                Ok(contract_call(method, &market, U256::zero(), data))
            }
            Operation::UpdateListing(p) => {
                let market = registry.resolve(ContractKind::Marketplace, &p.contract_addresses);
                let nft = registry.nft_address(&p.contract_addresses);
                let pricing = Pricing::parse(&p.price, &p.price_token)?;
                let (id, start) = (uint(p.token_id), uint(p.start_time));
                let data = if market.is_legacy() {
                    market.encode(method, (nft, id, pricing.native, start))?
                } else {
                    market.encode(
                        method,
                        (
                            nft,
                            id,
                            pricing.native,
                            pricing.token,
                            pricing.accepts_native(),
                            pricing.accepts_token(),
                            start,
                        ),
                    )?
                };
                Ok(contract_call(method, &market, U256::zero(), data))
            }
            Operation::MintEdition(p) => {
                let nft = registry.resolve(ContractKind::Nft, &ContractAddresses::default());
                let data = nft.encode(
                    method,
                    (
                        uint(p.edition_quantity),
                        p.to,
                        p.uri.clone(),
                        U256::from(p.royalty_percentage),
                    ),
                )?;
                Ok(contract_call(method, &nft, U256::zero(), data))
            }
            Operation::MintToEdition(p) => {
                let nft = registry.resolve(ContractKind::Nft, &ContractAddresses::default());
                let data = nft.encode(
                    method,
                    (p.to, p.uri.clone(), uint(p.edition_number), uint(p.quantity)),
                )?;
                Ok(TxContext {
                    nonce: Some(p.nonce),
                    bounded_estimate: true,
                    ..contract_call(method, &nft, U256::zero(), data)
                })
            }
            Operation::CreateEdition(p) => {
                let nft = registry.resolve(ContractKind::Nft, &ContractAddresses::default());
                let data = nft.encode(
                    method,
                    (uint(p.edition_quantity), p.to, U256::from(p.royalty_percentage)),
                )?;
                Ok(TxContext {
                    nonce: Some(p.nonce),
                    ..contract_call(method, &nft, U256::zero(), data)
                })
            }
            Operation::ListEdition(p) => {
                let overrides = current_only(&p.contract_addresses);
                let market = registry.resolve(ContractKind::Marketplace, &overrides);
                let nft = registry.nft_address(&overrides);
                let pricing = Pricing::parse(&p.price, &p.price_token)?;
                let data = market.encode(
                    method,
                    (
                        nft,
                        uint(p.edition_number),
                        pricing.native,
                        pricing.token,
                        pricing.accepts_native(),
                        pricing.accepts_token(),
                        uint(p.start_time),
                    ),
                )?;
                Ok(contract_call(method, &market, U256::zero(), data))
            }
            Operation::CancelEditionListing(p) => {
                let overrides = current_only(&p.contract_addresses);
                let market = registry.resolve(ContractKind::Marketplace, &overrides);
                let nft = registry.nft_address(&overrides);
                let data = market.encode(method, (nft, uint(p.edition_number)))?;
                Ok(contract_call(method, &market, U256::zero(), data))
            }
            Operation::TransferToken(p) => {
                let nft = registry.resolve(ContractKind::Nft, &p.contract_addresses);
                let data = nft.encode(method, (sender, p.to, uint(p.token_id)))?;
                Ok(contract_call(method, &nft, U256::zero(), data))
            }
            Operation::SendNative(p) => Ok(TxContext {
                method,
                to: p.to,
                value: parse_base_units(&p.amount)?,
                data: Bytes::default(),
                nonce: None,
                bounded_estimate: false,
                generation: None,
            }),
            Operation::SendToken(p) => {
                let token = registry.resolve(ContractKind::PaymentToken, &ContractAddresses::default());
                let data = token.encode(method, (p.to, parse_base_units(&p.amount)?))?;
                Ok(contract_call(method, &token, U256::zero(), data))
            }
            Operation::Claim(p) => {
                let claim = registry.resolve(ContractKind::Claim, &ContractAddresses::default());
                let proof = Token::Array(
                    p.proof
                        .iter()
                        .map(|node| Token::FixedBytes(node.as_bytes().to_vec()))
                        .collect(),
                );
                let data = claim.encode(method, (p.to, parse_base_units(&p.amount)?, proof))?;
                Ok(contract_call(method, &claim, U256::zero(), data))
            }
            Operation::ListBatch(p) => {
                non_empty(&p.token_ids)?;
                let overrides = current_only(&p.contract_addresses);
                let market = registry.resolve(ContractKind::Marketplace, &overrides);
                let nft = registry.nft_address(&overrides);
                let pricing = Pricing::parse(&p.price, &p.price_token)?;
                let data = market.encode(
                    method,
                    (
                        nft,
                        token_ids(&p.token_ids),
                        pricing.native,
                        pricing.token,
                        pricing.accepts_native(),
                        pricing.accepts_token(),
                        uint(p.start_time),
                    ),
                )?;
                Ok(TxContext {
                    nonce: p.nonce,
                    ..contract_call(method, &market, U256::zero(), data)
                })
            }
            Operation::CancelListingBatch(p) => {
                non_empty(&p.token_ids)?;
                let overrides = current_only(&p.contract_addresses);
                let market = registry.resolve(ContractKind::Marketplace, &overrides);
                let nft = registry.nft_address(&overrides);
                let data = market.encode(method, (nft, token_ids(&p.token_ids)))?;
                Ok(TxContext {
                    nonce: p.nonce,
                    ..contract_call(method, &market, U256::zero(), data)
                })
            }
        }
    }

    // 授权对象总是当前代合约
    fn approve(
        &self,
        registry: &ContractRegistry,
        overrides: &ContractAddresses,
        operator: H160,
    ) -> Result<TxContext, AppError> {
        let nft = registry.resolve(ContractKind::Nft, overrides);
        let data = nft.encode("setApprovalForAll", (operator, true))?;
        Ok(contract_call(self.name(), &nft, U256::zero(), data))
    }
}

fn contract_call(method: &'static str, binding: &ContractBinding, value: U256, data: Bytes) -> TxContext {
    TxContext {
        method,
        to: binding.address,
        value,
        data,
        nonce: None,
        bounded_estimate: false,
        generation: Some(binding.generation),
    }
}

fn non_empty(ids: &[u64]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Err(AppError::Validation("token id 列表为空".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tx::registry::ContractGeneration;
    use crate::test_support::{SIGNER, contracts};
    use ethers::abi::{ParamType, decode};
    use ethers_core::types::H256;
    use ethers_core::utils::id;

    fn registry() -> ContractRegistry {
        ContractRegistry::new(contracts()).unwrap()
    }

    fn sender() -> H160 {
        SIGNER.parse().unwrap()
    }

    fn list_params(overrides: ContractAddresses) -> ListItemParams {
        ListItemParams {
            from: SIGNER.into(),
            token_id: 7,
            price: "1000000000000000000".into(),
            price_token: "0".into(),
            start_time: 1_900_000_000,
            contract_addresses: overrides,
        }
    }

    #[test]
    fn current_listing_derives_accept_flags_from_prices() {
        let ctx = Operation::ListItem(list_params(ContractAddresses::default()))
            .build(&registry(), sender())
            .unwrap();
        assert_eq!(ctx.to, contracts().marketplace);
        assert_eq!(ctx.generation, Some(ContractGeneration::Current));
        assert_eq!(
            &ctx.data[..4],
            &id("listItem(address,uint256,uint256,uint256,uint256,bool,bool,uint256)")[..]
        );

        let args = decode(
            &[
                ParamType::Address,
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Bool,
                ParamType::Bool,
                ParamType::Uint(256),
            ],
            &ctx.data[4..],
        )
        .unwrap();
        assert_eq!(args[0], Token::Address(contracts().nft));
        assert_eq!(args[3], Token::Uint(U256::exp10(18)));
        assert_eq!(args[5], Token::Bool(true));
        assert_eq!(args[6], Token::Bool(false));
    }

    #[test]
    fn legacy_listing_uses_legacy_signature() {
        let overrides = ContractAddresses {
            marketplace: Some(contracts().marketplace_legacy),
            ..Default::default()
        };
        let ctx = Operation::ListItem(list_params(overrides))
            .build(&registry(), sender())
            .unwrap();
        assert_eq!(ctx.to, contracts().marketplace_legacy);
        assert_eq!(ctx.generation, Some(ContractGeneration::Legacy));
        assert_eq!(
            &ctx.data[..4],
            &id("listItem(address,uint256,uint256,uint256,uint256)")[..]
        );
    }

    #[test]
    fn token_payment_sends_no_native_value() {
        let mut params = BuyItemParams {
            from: SIGNER.into(),
            token_id: 1,
            owner: H160::repeat_byte(5),
            value: "500".into(),
            is_payment_token: true,
            contract_addresses: ContractAddresses::default(),
        };
        let ctx = Operation::BuyItem(params.clone())
            .build(&registry(), sender())
            .unwrap();
        assert!(ctx.value.is_zero());

        params.is_payment_token = false;
        let ctx = Operation::BuyItem(params).build(&registry(), sender()).unwrap();
        assert_eq!(ctx.value, U256::from(500u64));
    }

    #[test]
    fn legacy_bid_carries_value_but_not_amount_argument() {
        let params = PlaceBidParams {
            from: SIGNER.into(),
            token_id: 3,
            value: "42".into(),
            contract_addresses: ContractAddresses {
                auction: Some(contracts().auction_legacy),
                ..Default::default()
            },
        };
        let ctx = Operation::PlaceBid(params).build(&registry(), sender()).unwrap();
        assert_eq!(ctx.value, U256::from(42u64));
        assert_eq!(&ctx.data[..4], &id("placeBid(address,uint256)")[..]);
        assert_eq!(ctx.data.len(), 4 + 2 * 32);
    }

    #[test]
    fn approvals_target_current_generation_operators() {
        let params = ApproveParams {
            from: SIGNER.into(),
            contract_addresses: ContractAddresses::default(),
        };
        let ctx = Operation::ApproveAuction(params)
            .build(&registry(), sender())
            .unwrap();
        assert_eq!(ctx.to, contracts().nft);
        let args = decode(&[ParamType::Address, ParamType::Bool], &ctx.data[4..]).unwrap();
        assert_eq!(args[0], Token::Address(contracts().auction));
        assert_eq!(args[1], Token::Bool(true));
    }

    #[test]
    fn auction_window_must_be_ordered() {
        let params = AuctionParams {
            from: SIGNER.into(),
            token_id: 1,
            reserve_price: "1".into(),
            start_time: 200,
            end_time: 100,
            contract_addresses: ContractAddresses::default(),
        };
        assert!(matches!(
            Operation::CreateAuction(params).build(&registry(), sender()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn edition_mint_has_explicit_nonce_and_bounded_estimate() {
        let ctx = Operation::MintToEdition(MintToEditionParams {
            from: SIGNER.into(),
            uri: "ipfs://track".into(),
            to: sender(),
            edition_number: 4,
            quantity: 10,
            nonce: 12,
        })
        .build(&registry(), sender())
        .unwrap();
        assert_eq!(ctx.nonce, Some(12));
        assert!(ctx.bounded_estimate);
        assert_eq!(ctx.to, contracts().nft);
    }

    #[test]
    fn token_payment_is_encoded_transfer_call_data() {
        let ctx = Operation::SendToken(PaymentParams {
            from: SIGNER.into(),
            to: H160::repeat_byte(8),
            amount: "25".into(),
        })
        .build(&registry(), sender())
        .unwrap();
        assert_eq!(ctx.to, contracts().payment_token);
        assert!(ctx.value.is_zero());
        assert_eq!(&ctx.data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn native_payment_has_no_call_data() {
        let ctx = Operation::SendNative(PaymentParams {
            from: SIGNER.into(),
            to: H160::repeat_byte(8),
            amount: "1000".into(),
        })
        .build(&registry(), sender())
        .unwrap();
        assert!(ctx.data.is_empty());
        assert_eq!(ctx.value, U256::from(1000u64));
        assert!(ctx.generation.is_none());
    }

    #[test]
    fn claim_encodes_merkle_proof() {
        let ctx = Operation::Claim(ClaimParams {
            from: SIGNER.into(),
            to: sender(),
            amount: "100".into(),
            proof: vec![H256::repeat_byte(1), H256::repeat_byte(2)],
        })
        .build(&registry(), sender())
        .unwrap();
        assert_eq!(&ctx.data[..4], &id("claim(address,uint256,bytes32[])")[..]);
    }

    #[test]
    fn batch_operations_ignore_legacy_marketplace_override() {
        let ctx = Operation::CancelListingBatch(CancelListingBatchParams {
            from: SIGNER.into(),
            token_ids: vec![1, 2, 3],
            contract_addresses: ContractAddresses {
                marketplace: Some(contracts().marketplace_legacy),
                ..Default::default()
            },
            nonce: Some(3),
        })
        .build(&registry(), sender())
        .unwrap();
        assert_eq!(ctx.to, contracts().marketplace);
        assert_eq!(ctx.nonce, Some(3));

        assert!(Operation::CancelListingBatch(CancelListingBatchParams {
            from: SIGNER.into(),
            token_ids: vec![],
            contract_addresses: ContractAddresses::default(),
            nonce: None,
        })
        .build(&registry(), sender())
        .is_err());
    }

    #[test]
    fn edition_operations_target_current_contracts() {
        let reg = registry();
        let mint = Operation::MintEdition(MintEditionParams {
            from: SIGNER.into(),
            uri: "ipfs://album".into(),
            to: sender(),
            royalty_percentage: 10,
            edition_quantity: 50,
        })
        .build(&reg, sender())
        .unwrap();
        assert_eq!(mint.to, contracts().nft);
        assert_eq!(
            &mint.data[..4],
            &id("createEditionWithNFTs(uint256,address,string,uint256)")[..]
        );
        assert!(mint.nonce.is_none());

        let create = Operation::CreateEdition(CreateEditionParams {
            from: SIGNER.into(),
            to: sender(),
            royalty_percentage: 5,
            edition_quantity: 20,
            nonce: 9,
        })
        .build(&reg, sender())
        .unwrap();
        assert_eq!(create.nonce, Some(9));
        assert!(!create.bounded_estimate);

        let list = Operation::ListEdition(ListEditionParams {
            from: SIGNER.into(),
            edition_number: 2,
            price: "0".into(),
            price_token: "300".into(),
            start_time: 1_900_000_000,
            contract_addresses: ContractAddresses::default(),
        })
        .build(&reg, sender())
        .unwrap();
        assert_eq!(list.to, contracts().marketplace);
        let args = decode(
            &[
                ParamType::Address,
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Bool,
                ParamType::Bool,
                ParamType::Uint(256),
            ],
            &list.data[4..],
        )
        .unwrap();
        assert_eq!(args[4], Token::Bool(false));
        assert_eq!(args[5], Token::Bool(true));

        let cancel = Operation::CancelEditionListing(EditionParams {
            from: SIGNER.into(),
            edition_number: 2,
            contract_addresses: ContractAddresses {
                marketplace: Some(contracts().marketplace_legacy),
                ..Default::default()
            },
        })
        .build(&reg, sender())
        .unwrap();
        assert_eq!(cancel.to, contracts().marketplace);
        assert_eq!(&cancel.data[..4], &id("cancelEditionListing(address,uint256)")[..]);
    }

    #[test]
    fn transfer_moves_token_from_sender() {
        let ctx = Operation::TransferToken(TransferTokenParams {
            from: SIGNER.into(),
            to: H160::repeat_byte(9),
            token_id: 77,
            contract_addresses: ContractAddresses::default(),
        })
        .build(&registry(), sender())
        .unwrap();
        assert_eq!(ctx.to, contracts().nft);
        let args = decode(
            &[ParamType::Address, ParamType::Address, ParamType::Uint(256)],
            &ctx.data[4..],
        )
        .unwrap();
        assert_eq!(args[0], Token::Address(sender()));
        assert_eq!(args[1], Token::Address(H160::repeat_byte(9)));
        assert_eq!(args[2], Token::Uint(U256::from(77u64)));
    }

    #[test]
    fn cancel_and_result_follow_resolved_generation() {
        let legacy_cancel = Operation::CancelListing(TokenParams {
            from: SIGNER.into(),
            token_id: 4,
            contract_addresses: ContractAddresses {
                marketplace: Some(contracts().marketplace_legacy),
                ..Default::default()
            },
        })
        .build(&registry(), sender())
        .unwrap();
        assert_eq!(legacy_cancel.to, contracts().marketplace_legacy);
        assert_eq!(legacy_cancel.generation, Some(ContractGeneration::Legacy));

        let result = Operation::ResultAuction(TokenParams {
            from: SIGNER.into(),
            token_id: 4,
            contract_addresses: ContractAddresses::default(),
        })
        .build(&registry(), sender())
        .unwrap();
        assert_eq!(result.to, contracts().auction);
        assert_eq!(&result.data[..4], &id("resultAuction(address,uint256)")[..]);
    }

    #[test]
    fn amounts_must_be_base_unit_integers() {
        let mut params = list_params(ContractAddresses::default());
        params.price = "1.5".into();
        assert!(matches!(
            Operation::ListItem(params).build(&registry(), sender()),
            Err(AppError::InvalidNumber(_))
        ));
    }
}
