use tracing::debug;

use crate::config::Config;
use crate::error::WalletError;
use crate::exchange::{BinanceClient, WalletExchange, WithdrawalRequest};

use super::models::{
    BalanceSnapshot, DepositAddressInfo, HistoryFilter, HistoryRecord, WithdrawalReceipt,
};

/// Wallet operations over one authenticated exchange handle. Stateless
/// beyond the handle; every call is an independent round trip.
pub struct WalletManager<C: WalletExchange> {
    exchange: C,
}

impl WalletManager<BinanceClient> {
    /// Builds the production manager from configuration.
    pub fn connect(config: &Config) -> Result<Self, WalletError> {
        Ok(Self::new(BinanceClient::new(config)?))
    }
}

impl<C: WalletExchange> WalletManager<C> {
    pub fn new(exchange: C) -> Self {
        Self { exchange }
    }

    /// Fetches the account's balance snapshot. With `coin` given, narrows to
    /// that coin and fails with `CoinNotFound` when it is absent from the
    /// response.
    pub async fn get_balance(&self, coin: Option<&str>) -> Result<BalanceSnapshot, WalletError> {
        debug!("Fetching balance snapshot");

        let account = self.exchange.fetch_account().await?;
        let snapshot = BalanceSnapshot::from_assets(&account.balances);

        match coin {
            Some(symbol) => snapshot
                .single(symbol)
                .ok_or_else(|| WalletError::CoinNotFound(symbol.to_string())),
            None => Ok(snapshot),
        }
    }

    /// Requests a deposit address for `coin`, optionally on a specific
    /// network. Unavailable on the spot testnet; surfaced as `Unsupported`
    /// before any network call.
    pub async fn get_deposit_address(
        &self,
        coin: &str,
        network: Option<&str>,
    ) -> Result<DepositAddressInfo, WalletError> {
        if !self.exchange.supports_deposit_endpoints() {
            return Err(WalletError::unsupported("deposit address lookup"));
        }

        debug!("Requesting deposit address for {}", coin);

        let raw = self
            .exchange
            .fetch_deposit_address(coin, network.map(String::from))
            .await?;
        Ok(DepositAddressInfo::from(raw))
    }

    /// Validates the request locally, then submits it. The coin, amount,
    /// address, network, and tag are forwarded exactly as given.
    pub async fn withdraw(
        &self,
        request: WithdrawalRequest,
    ) -> Result<WithdrawalReceipt, WalletError> {
        if request.coin.trim().is_empty() {
            return Err(WalletError::validation("coin symbol must not be empty"));
        }
        if request.amount <= rust_decimal::Decimal::ZERO {
            return Err(WalletError::validation("withdrawal amount must be positive"));
        }
        if request.address.trim().is_empty() {
            return Err(WalletError::validation(
                "destination address must not be empty",
            ));
        }

        debug!("Submitting withdrawal of {} {}", request.amount, request.coin);

        let ack = self.exchange.submit_withdrawal(&request).await?;

        Ok(WithdrawalReceipt {
            id: ack.id,
            coin: request.coin,
            amount: request.amount,
            address: request.address,
            network: request.network,
        })
    }

    /// Lists deposits, newest-first as returned by the exchange. Unavailable
    /// on the spot testnet; surfaced as `Unsupported` before any network
    /// call.
    pub async fn get_deposit_history(
        &self,
        filter: HistoryFilter,
    ) -> Result<Vec<HistoryRecord>, WalletError> {
        if !self.exchange.supports_deposit_endpoints() {
            return Err(WalletError::unsupported("deposit history"));
        }

        debug!("Fetching deposit history");

        let HistoryFilter { coin, since, limit } = filter;
        let records = self.exchange.fetch_deposits(coin, since, limit).await?;

        Ok(Self::normalize_history(records, limit))
    }

    /// Lists withdrawals, newest-first as returned by the exchange. Remote
    /// rejections surface unmodified.
    pub async fn get_withdrawal_history(
        &self,
        filter: HistoryFilter,
    ) -> Result<Vec<HistoryRecord>, WalletError> {
        debug!("Fetching withdrawal history");

        let HistoryFilter { coin, since, limit } = filter;
        let records = self.exchange.fetch_withdrawals(coin, since, limit).await?;

        Ok(Self::normalize_history(records, limit))
    }

    // No sorting or merging; the venue's ordering is kept. The local
    // truncation guarantees `limit` is honored even if the venue
    // over-returns.
    fn normalize_history<R>(records: Vec<R>, limit: Option<u32>) -> Vec<HistoryRecord>
    where
        HistoryRecord: From<R>,
    {
        let mut normalized: Vec<HistoryRecord> =
            records.into_iter().map(HistoryRecord::from).collect();
        if let Some(limit) = limit {
            normalized.truncate(limit as usize);
        }
        normalized
    }
}
