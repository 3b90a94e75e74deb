use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use binance_wallet::{
    config::{Config, Environment},
    error::WalletError,
    wallet::{HistoryFilter, WalletManager},
};

#[derive(Parser, Debug)]
#[command(name = "binance-wallet")]
#[command(about = "Wallet operations against the Binance testnet")]
struct Args {
    /// Force the testnet environment (overrides ENABLE_TESTNET)
    #[arg(long)]
    testnet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration before logging so LOG_LEVEL can seed the filter.
    let mut config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "binance_wallet={}",
                    config.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if args.testnet {
        config.environment = Environment::Testnet;
        info!("Testnet mode enabled via CLI flag");
    }

    info!(
        "Environment: {:?}, Base URL: {}",
        config.environment,
        config.base_url()
    );

    let manager = WalletManager::connect(&config)?;

    // Balance snapshot doubles as the connection test.
    info!("Fetching wallet balances...");
    match manager.get_balance(None).await {
        Ok(snapshot) => {
            info!("Connected successfully ({} assets)", snapshot.len());
            for (coin, balance) in snapshot.non_zero() {
                info!(
                    "  {}: free={} used={} total={}",
                    coin, balance.free, balance.used, balance.total
                );
            }
        }
        Err(e) => {
            error!("Failed to fetch balances: {}", e);
            return Err(e.into());
        }
    }

    info!("Fetching USDT deposit address (ERC20)...");
    match manager.get_deposit_address("USDT", Some("ERC20")).await {
        Ok(address) => {
            info!("Deposit address: {}", address.address);
            if let Some(tag) = &address.tag {
                info!("  Tag/Memo: {}", tag);
            }
        }
        Err(WalletError::Unsupported { .. }) => {
            warn!("Deposit addresses are not served by the spot testnet");
        }
        Err(e) => error!("Failed to fetch deposit address: {}", e),
    }

    info!("Withdrawals are available via WalletManager::withdraw; skipped in the demo");

    info!("Fetching recent deposits...");
    match manager
        .get_deposit_history(HistoryFilter::default().limit(5))
        .await
    {
        Ok(deposits) => {
            info!("Found {} recent deposits", deposits.len());
            for record in &deposits {
                info!(
                    "  {} {} - status: {}",
                    record.amount, record.coin, record.status
                );
            }
        }
        Err(WalletError::Unsupported { .. }) => {
            warn!("Deposit history is not served by the spot testnet");
        }
        Err(e) => error!("Failed to fetch deposit history: {}", e),
    }

    info!("Fetching recent withdrawals...");
    match manager
        .get_withdrawal_history(HistoryFilter::default().limit(5))
        .await
    {
        Ok(withdrawals) => {
            info!("Found {} recent withdrawals", withdrawals.len());
            for record in &withdrawals {
                info!(
                    "  {} {} - status: {}",
                    record.amount, record.coin, record.status
                );
            }
        }
        Err(e) => warn!("Failed to fetch withdrawal history: {}", e),
    }

    Ok(())
}
