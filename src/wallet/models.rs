use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::exchange::{AssetBalance, DepositAddress, DepositRecord, WithdrawalRecord};

/// Free/used/total amounts for one coin. `used` is the venue's `locked`
/// figure; `total` is their sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinBalance {
    pub free: Decimal,
    pub used: Decimal,
    pub total: Decimal,
}

impl From<&AssetBalance> for CoinBalance {
    fn from(asset: &AssetBalance) -> Self {
        Self {
            free: asset.free_decimal(),
            used: asset.locked_decimal(),
            total: asset.total(),
        }
    }
}

/// Point-in-time view of the account, keyed by coin symbol. Never mutated
/// locally; always rebuilt from a fresh account fetch.
#[derive(Debug, Clone, Default)]
pub struct BalanceSnapshot {
    balances: BTreeMap<String, CoinBalance>,
}

impl BalanceSnapshot {
    pub fn from_assets(assets: &[AssetBalance]) -> Self {
        let balances = assets
            .iter()
            .map(|asset| (asset.asset.clone(), CoinBalance::from(asset)))
            .collect();
        Self { balances }
    }

    pub fn coin(&self, symbol: &str) -> Option<&CoinBalance> {
        self.balances.get(symbol)
    }

    /// Narrows the snapshot to a single coin, if present.
    pub fn single(&self, symbol: &str) -> Option<Self> {
        self.coin(symbol).map(|balance| {
            let mut balances = BTreeMap::new();
            balances.insert(symbol.to_string(), balance.clone());
            Self { balances }
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CoinBalance)> {
        self.balances.iter()
    }

    pub fn non_zero(&self) -> impl Iterator<Item = (&String, &CoinBalance)> {
        self.iter().filter(|(_, balance)| !balance.total.is_zero())
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// Normalized transfer state across deposit and withdrawal records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Pending,
    Completed,
    Canceled,
    Failed,
}

impl TxStatus {
    /// Deposit codes: 0 = pending, 1 = success, 6 = credited but cannot
    /// withdraw yet.
    pub fn from_deposit_code(code: i32) -> Self {
        match code {
            1 => TxStatus::Completed,
            _ => TxStatus::Pending,
        }
    }

    /// Withdrawal codes: 0 = email sent, 1 = cancelled, 2 = awaiting
    /// approval, 3 = rejected, 4 = processing, 5 = failure, 6 = completed.
    pub fn from_withdrawal_code(code: i32) -> Self {
        match code {
            1 => TxStatus::Canceled,
            3 | 5 => TxStatus::Failed,
            6 => TxStatus::Completed,
            _ => TxStatus::Pending,
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStatus::Pending => write!(f, "pending"),
            TxStatus::Completed => write!(f, "completed"),
            TxStatus::Canceled => write!(f, "canceled"),
            TxStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One deposit or withdrawal, normalized from the venue's record shape.
/// Ordering is whatever the exchange returned.
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub id: String,
    pub txid: Option<String>,
    pub coin: String,
    pub amount: Decimal,
    pub status: TxStatus,
    pub timestamp: i64,
    pub network: String,
    pub address: String,
    pub tag: Option<String>,
    pub fee: Option<Decimal>,
}

impl HistoryRecord {
    pub fn datetime(&self) -> Option<String> {
        chrono::DateTime::from_timestamp_millis(self.timestamp).map(|dt| dt.to_rfc3339())
    }
}

impl From<DepositRecord> for HistoryRecord {
    fn from(record: DepositRecord) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            txid: Some(record.tx_id),
            coin: record.coin,
            amount: record.amount.parse().unwrap_or_default(),
            status: TxStatus::from_deposit_code(record.status),
            timestamp: record.insert_time,
            network: record.network,
            address: record.address,
            tag: record.address_tag.filter(|t| !t.is_empty()),
            fee: None,
        }
    }
}

impl From<WithdrawalRecord> for HistoryRecord {
    fn from(record: WithdrawalRecord) -> Self {
        Self {
            id: record.id,
            txid: record.tx_id,
            coin: record.coin.clone(),
            amount: record.amount.parse().unwrap_or_default(),
            status: TxStatus::from_withdrawal_code(record.status),
            timestamp: parse_apply_time(&record.apply_time),
            network: record.network,
            address: record.address,
            tag: record.address_tag.filter(|t| !t.is_empty()),
            fee: record.transaction_fee.parse().ok(),
        }
    }
}

fn parse_apply_time(value: &str) -> i64 {
    if let Ok(millis) = value.parse::<i64>() {
        return millis;
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

/// Deposit address with empty wire fields normalized away.
#[derive(Debug, Clone)]
pub struct DepositAddressInfo {
    pub coin: String,
    pub address: String,
    pub tag: Option<String>,
    pub network: Option<String>,
}

impl From<DepositAddress> for DepositAddressInfo {
    fn from(raw: DepositAddress) -> Self {
        Self {
            coin: raw.coin,
            address: raw.address,
            tag: (!raw.tag.is_empty()).then_some(raw.tag),
            network: (!raw.network.is_empty()).then_some(raw.network),
        }
    }
}

/// Exchange-assigned withdrawal id echoed back with the submitted request.
#[derive(Debug, Clone)]
pub struct WithdrawalReceipt {
    pub id: String,
    pub coin: String,
    pub amount: Decimal,
    pub address: String,
    pub network: Option<String>,
}

/// Optional narrowing for the history fetches. `since` is epoch
/// milliseconds.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub coin: Option<String>,
    pub since: Option<i64>,
    pub limit: Option<u32>,
}

impl HistoryFilter {
    pub fn coin(mut self, coin: &str) -> Self {
        self.coin = Some(coin.to_string());
        self
    }

    pub fn since(mut self, since: i64) -> Self {
        self.since = Some(since);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn asset(symbol: &str, free: &str, locked: &str) -> AssetBalance {
        AssetBalance {
            asset: symbol.to_string(),
            free: free.to_string(),
            locked: locked.to_string(),
        }
    }

    #[test]
    fn test_snapshot_from_assets() {
        let snapshot = BalanceSnapshot::from_assets(&[
            asset("USDT", "100", "0"),
            asset("BTC", "0.5", "0.25"),
        ]);

        assert_eq!(snapshot.len(), 2);
        let btc = snapshot.coin("BTC").unwrap();
        assert_eq!(btc.free, dec!(0.5));
        assert_eq!(btc.used, dec!(0.25));
        assert_eq!(btc.total, dec!(0.75));
    }

    #[test]
    fn test_snapshot_single() {
        let snapshot = BalanceSnapshot::from_assets(&[
            asset("USDT", "100", "0"),
            asset("BTC", "1", "0"),
        ]);

        let only_usdt = snapshot.single("USDT").unwrap();
        assert_eq!(only_usdt.len(), 1);
        assert_eq!(only_usdt.coin("USDT").unwrap().total, dec!(100));
        assert!(only_usdt.coin("BTC").is_none());

        assert!(snapshot.single("DOGE").is_none());
    }

    #[test]
    fn test_snapshot_non_zero_filter() {
        let snapshot = BalanceSnapshot::from_assets(&[
            asset("USDT", "100", "0"),
            asset("LTC", "0", "0"),
        ]);

        let coins: Vec<&String> = snapshot.non_zero().map(|(coin, _)| coin).collect();
        assert_eq!(coins, vec!["USDT"]);
    }

    #[test]
    fn test_deposit_status_codes() {
        assert_eq!(TxStatus::from_deposit_code(0), TxStatus::Pending);
        assert_eq!(TxStatus::from_deposit_code(1), TxStatus::Completed);
        assert_eq!(TxStatus::from_deposit_code(6), TxStatus::Pending);
        assert_eq!(TxStatus::from_deposit_code(99), TxStatus::Pending);
    }

    #[test]
    fn test_withdrawal_status_codes() {
        assert_eq!(TxStatus::from_withdrawal_code(0), TxStatus::Pending);
        assert_eq!(TxStatus::from_withdrawal_code(1), TxStatus::Canceled);
        assert_eq!(TxStatus::from_withdrawal_code(3), TxStatus::Failed);
        assert_eq!(TxStatus::from_withdrawal_code(5), TxStatus::Failed);
        assert_eq!(TxStatus::from_withdrawal_code(6), TxStatus::Completed);
    }

    #[test]
    fn test_parse_apply_time_formats() {
        assert_eq!(parse_apply_time("1599621997000"), 1599621997000);
        // 2019-10-12 11:12:02 UTC
        assert_eq!(parse_apply_time("2019-10-12 11:12:02"), 1570878722000);
        assert_eq!(parse_apply_time("not a time"), 0);
    }

    #[test]
    fn test_history_record_from_withdrawal() {
        let record = WithdrawalRecord {
            id: "b6ae22b3".to_string(),
            coin: "USDT".to_string(),
            amount: "8.91".to_string(),
            network: "ETH".to_string(),
            address: "0x94df8b35".to_string(),
            address_tag: Some("".to_string()),
            tx_id: Some("0xb5ef8c13".to_string()),
            apply_time: "2019-10-12 11:12:02".to_string(),
            transaction_fee: "0.004".to_string(),
            status: 6,
        };

        let normalized = HistoryRecord::from(record);
        assert_eq!(normalized.amount, dec!(8.91));
        assert_eq!(normalized.status, TxStatus::Completed);
        assert_eq!(normalized.fee, Some(dec!(0.004)));
        assert_eq!(normalized.timestamp, 1570878722000);
        assert!(normalized.tag.is_none());
        assert!(normalized.datetime().unwrap().starts_with("2019-10-12"));
    }

    #[test]
    fn test_deposit_address_normalizes_empty_fields() {
        let info = DepositAddressInfo::from(DepositAddress {
            coin: "USDT".to_string(),
            address: "0x742d35cc".to_string(),
            tag: "".to_string(),
            network: "ETH".to_string(),
            url: "".to_string(),
        });

        assert_eq!(info.coin, "USDT");
        assert!(info.tag.is_none());
        assert_eq!(info.network.as_deref(), Some("ETH"));
    }
}
