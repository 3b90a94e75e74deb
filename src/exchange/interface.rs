use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::WalletError;

use super::models::{
    AccountInfo, DepositAddress, DepositRecord, WithdrawAck, WithdrawalRecord, WithdrawalRequest,
};

/// Capability set a wallet backend must provide. `BinanceClient` is the
/// production implementation; tests substitute a mock.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WalletExchange: Send + Sync {
    /// Whether the connected environment serves the wallet (SAPI) endpoints.
    /// The spot testnet does not issue deposit addresses or deposit history.
    fn supports_deposit_endpoints(&self) -> bool;

    async fn fetch_account(&self) -> Result<AccountInfo, WalletError>;

    async fn fetch_deposit_address(
        &self,
        coin: &str,
        network: Option<String>,
    ) -> Result<DepositAddress, WalletError>;

    async fn submit_withdrawal(
        &self,
        request: &WithdrawalRequest,
    ) -> Result<WithdrawAck, WalletError>;

    async fn fetch_deposits(
        &self,
        coin: Option<String>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<DepositRecord>, WalletError>;

    async fn fetch_withdrawals(
        &self,
        coin: Option<String>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<WithdrawalRecord>, WalletError>;
}
