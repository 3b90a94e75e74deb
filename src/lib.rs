pub mod config;
pub mod error;
pub mod exchange;
pub mod wallet;

pub use config::{Config, Environment};
pub use error::WalletError;
pub use exchange::{BinanceClient, WalletExchange, WithdrawalRequest};
pub use wallet::{BalanceSnapshot, HistoryFilter, WalletManager};
