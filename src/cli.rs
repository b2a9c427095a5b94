use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use ethers_core::types::H160;
use serde::Serialize;

use marketplace_tx::models::{
    BatchCancelRequest, BatchItem, BatchListingRequest, ContractAddresses, ListItemParams,
    PaymentParams, TransferTokenParams,
};
use marketplace_tx::services::tx::command::TxEvent;
use marketplace_tx::services::tx::signer::{LocalSigner, TxSigner};
use marketplace_tx::startup::Application;
use marketplace_tx::utils::parse_address;
use marketplace_tx::{log_error, log_info};

#[derive(Parser, Debug)]
#[command(author, version, about = "NFT marketplace transaction runner", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 签名私钥（hex）
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true, global = true)]
    pub private_key: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 当前 gas 报价与单笔/批量最大手续费预览
    GasQuote {
        /// 批量条目数；不填只预览单笔
        #[arg(long)]
        items: Option<usize>,
    },
    /// 挂单一个 token
    ListItem {
        #[arg(long)]
        token_id: u64,
        /// 价格（最小单位）
        #[arg(long)]
        price: String,
        #[arg(long, default_value = "0")]
        price_token: String,
        #[arg(long)]
        start_time: u64,
        #[arg(long)]
        marketplace: Option<String>,
    },
    /// 批量挂单，按配置大小自动分片
    ListBatch {
        #[arg(long, value_delimiter = ',', required = true)]
        token_ids: Vec<u64>,
        #[arg(long)]
        price: String,
        #[arg(long, default_value = "0")]
        price_token: String,
        #[arg(long)]
        start_time: u64,
        #[arg(long)]
        edition_id: Option<String>,
        /// 分片大小；不填使用配置
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// 批量取消挂单
    CancelListingBatch {
        #[arg(long, value_delimiter = ',', required = true)]
        token_ids: Vec<u64>,
        #[arg(long)]
        edition_id: Option<String>,
        /// 分片大小；不填使用配置
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// 转移 NFT
    Transfer {
        #[arg(long)]
        to: String,
        #[arg(long)]
        token_id: u64,
    },
    /// 发送原生币（最小单位）
    SendNative {
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
    },
    /// 查询 marketplace 奖励费率
    RewardsRate {
        #[arg(long)]
        marketplace: Option<String>,
    },
    /// 查询地址是否已领取
    HasClaimed {
        #[arg(long)]
        account: String,
    },
}

fn signer(cli_key: Option<&str>, chain_id: u64) -> anyhow::Result<LocalSigner> {
    let Some(key) = cli_key else {
        bail!("该命令需要签名，请设置 PRIVATE_KEY");
    };
    LocalSigner::from_private_key(key, chain_id).context("私钥无效")
}

fn optional_address(raw: Option<&str>) -> anyhow::Result<Option<H160>> {
    raw.map(parse_address).transpose().map_err(Into::into)
}

/// 批量条目的链下 id 在 CLI 中直接使用 token id
fn items_from(token_ids: &[u64]) -> Vec<BatchItem> {
    token_ids
        .iter()
        .map(|id| BatchItem::new(id.to_string(), *id))
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn log_event(event: &TxEvent<'_>) {
    match event {
        TxEvent::TransactionHash(hash) => log_info!("📤 已广播: {:?}", hash),
        TxEvent::Receipt(receipt) => log_info!(
            "📦 已确认: block={:?}, gas_used={:?}",
            receipt.block_number,
            receipt.gas_used
        ),
        TxEvent::Error(err) => log_error!("❌ {}", err),
        TxEvent::Finally => {}
    }
}

pub async fn run(app: &Application, cli: Cli) -> anyhow::Result<()> {
    let chain_id = app.config.ethereum.chain_id;
    let service = app.tx_service.clone();
    let key = cli.private_key.as_deref();

    match cli.command {
        Commands::GasQuote { items } => {
            let preview = match items {
                Some(count) => service.preview_batch_fee(count).await?,
                None => service.preview_fee().await,
            };
            log_info!("{}", preview.quote.describe_max_fee(preview.gas_limit));
            print_json(&preview)?;
        }
        Commands::ListItem {
            token_id,
            price,
            price_token,
            start_time,
            marketplace,
        } => {
            let signer = signer(key, chain_id)?;
            let params = ListItemParams {
                from: format!("{:?}", signer.address()),
                token_id,
                price,
                price_token,
                start_time,
                contract_addresses: ContractAddresses {
                    marketplace: optional_address(marketplace.as_deref())?,
                    ..Default::default()
                },
            };
            let result = service
                .list_item(params)
                .observe(log_event)
                .execute(&signer)
                .await?;
            log_info!("挂单完成: {:?} (nonce {})", result.tx_hash, result.nonce);
        }
        Commands::ListBatch {
            token_ids,
            price,
            price_token,
            start_time,
            edition_id,
            chunk_size,
        } => {
            let signer = signer(key, chain_id)?;
            let request = BatchListingRequest {
                from: format!("{:?}", signer.address()),
                items: items_from(&token_ids),
                price,
                price_token,
                start_time,
                contract_addresses: ContractAddresses::default(),
                edition_id,
                chunk_size,
            };
            let report = service.list_batch(&signer, &request).await?;
            print_json(&report)?;
        }
        Commands::CancelListingBatch {
            token_ids,
            edition_id,
            chunk_size,
        } => {
            let signer = signer(key, chain_id)?;
            let request = BatchCancelRequest {
                from: format!("{:?}", signer.address()),
                items: items_from(&token_ids),
                contract_addresses: ContractAddresses::default(),
                edition_id,
                chunk_size,
            };
            let report = service.cancel_listing_batch(&signer, &request).await?;
            print_json(&report)?;
        }
        Commands::Transfer { to, token_id } => {
            let signer = signer(key, chain_id)?;
            let params = TransferTokenParams {
                from: format!("{:?}", signer.address()),
                to: parse_address(&to)?,
                token_id,
                contract_addresses: ContractAddresses::default(),
            };
            let result = service
                .transfer_token(params)
                .observe(log_event)
                .execute(&signer)
                .await?;
            log_info!("转移完成: {:?}", result.tx_hash);
        }
        Commands::SendNative { to, amount } => {
            let signer = signer(key, chain_id)?;
            let params = PaymentParams {
                from: format!("{:?}", signer.address()),
                to: parse_address(&to)?,
                amount,
            };
            let result = service
                .send_native(params)
                .observe(log_event)
                .execute(&signer)
                .await?;
            log_info!("转账完成: {:?}", result.tx_hash);
        }
        Commands::RewardsRate { marketplace } => {
            let rate = service
                .rewards_rate(optional_address(marketplace.as_deref())?)
                .await?;
            println!("{}", rate);
        }
        Commands::HasClaimed { account } => {
            let claimed = service.has_claimed(parse_address(&account)?).await?;
            println!("{}", claimed);
        }
    }
    Ok(())
}
