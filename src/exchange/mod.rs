mod binance;
mod interface;
mod models;

pub use binance::BinanceClient;
pub use interface::WalletExchange;
pub use models::*;

#[cfg(test)]
pub(crate) use interface::MockWalletExchange;
