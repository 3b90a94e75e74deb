mod manager;
mod models;

pub use manager::WalletManager;
pub use models::{
    BalanceSnapshot, CoinBalance, DepositAddressInfo, HistoryFilter, HistoryRecord, TxStatus,
    WithdrawalReceipt,
};
