use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub maker_commission: i64,
    pub taker_commission: i64,
    pub buyer_commission: i64,
    pub seller_commission: i64,
    pub can_trade: bool,
    pub can_withdraw: bool,
    pub can_deposit: bool,
    pub update_time: u64,
    pub account_type: String,
    pub balances: Vec<AssetBalance>,
}

/// Per-asset balance line as returned by `/api/v3/account`. Amounts arrive
/// as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    pub free: String,
    pub locked: String,
}

impl AssetBalance {
    pub fn free_decimal(&self) -> Decimal {
        self.free.parse().unwrap_or_default()
    }

    pub fn locked_decimal(&self) -> Decimal {
        self.locked.parse().unwrap_or_default()
    }

    pub fn total(&self) -> Decimal {
        self.free_decimal() + self.locked_decimal()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAddress {
    pub coin: String,
    pub address: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub url: String,
}

/// One line of `/sapi/v1/capital/deposit/hisrec`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub coin: String,
    pub amount: String,
    pub network: String,
    pub address: String,
    #[serde(default)]
    pub address_tag: Option<String>,
    pub tx_id: String,
    pub insert_time: i64,
    pub status: i32,
}

/// One line of `/sapi/v1/capital/withdraw/history`. `apply_time` arrives
/// either as epoch milliseconds or as `"%Y-%m-%d %H:%M:%S"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRecord {
    pub id: String,
    pub coin: String,
    pub amount: String,
    pub network: String,
    pub address: String,
    #[serde(default)]
    pub address_tag: Option<String>,
    #[serde(default)]
    pub tx_id: Option<String>,
    pub apply_time: String,
    pub transaction_fee: String,
    pub status: i32,
}

/// Acknowledgement of `/sapi/v1/capital/withdraw/apply`.
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawAck {
    pub id: String,
}

/// Binance error body, e.g. `{"code": -1013, "msg": "Invalid quantity."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

/// Outbound withdrawal parameters, marshaled onto the signed query string.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawalRequest {
    pub coin: String,
    pub amount: Decimal,
    pub address: String,
    pub network: Option<String>,
    pub tag: Option<String>,
}

impl WithdrawalRequest {
    pub fn new(coin: &str, amount: Decimal, address: &str) -> Self {
        Self {
            coin: coin.to_string(),
            amount,
            address: address.to_string(),
            network: None,
            tag: None,
        }
    }

    pub fn with_network(mut self, network: &str) -> Self {
        self.network = Some(network.to_string());
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_asset_balance_total() {
        let balance = AssetBalance {
            asset: "USDT".to_string(),
            free: "100.5".to_string(),
            locked: "0.5".to_string(),
        };

        assert_eq!(balance.free_decimal(), dec!(100.5));
        assert_eq!(balance.locked_decimal(), dec!(0.5));
        assert_eq!(balance.total(), dec!(101));
    }

    #[test]
    fn test_asset_balance_unparseable_defaults_to_zero() {
        let balance = AssetBalance {
            asset: "BTC".to_string(),
            free: "garbage".to_string(),
            locked: "1".to_string(),
        };

        assert_eq!(balance.free_decimal(), Decimal::ZERO);
        assert_eq!(balance.total(), dec!(1));
    }

    #[test]
    fn test_withdrawal_request_builders() {
        let request = WithdrawalRequest::new("USDT", dec!(10), "0xabc")
            .with_network("ERC20")
            .with_tag("memo-1");

        assert_eq!(request.coin, "USDT");
        assert_eq!(request.network.as_deref(), Some("ERC20"));
        assert_eq!(request.tag.as_deref(), Some("memo-1"));
    }

    #[test]
    fn test_deposit_record_deserializes() {
        let json = r#"{
            "amount": "0.00999800",
            "coin": "PAXG",
            "network": "ETH",
            "status": 1,
            "address": "0x788cabe9236ce061e5a892e1a59395a81fc8d62c",
            "addressTag": "",
            "txId": "0xaad4654a3234aa6118af9b4b335f5ae81c360b2394721c019b5d1e75328b09f3",
            "insertTime": 1599621997000,
            "confirmTimes": "12/12"
        }"#;

        let record: DepositRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.coin, "PAXG");
        assert_eq!(record.insert_time, 1599621997000);
        assert_eq!(record.status, 1);
        assert!(record.id.is_none());
    }

    #[test]
    fn test_withdrawal_record_deserializes() {
        let json = r#"{
            "id": "b6ae22b3aa844210a7041aee7589627c",
            "amount": "8.91000000",
            "transactionFee": "0.004",
            "coin": "USDT",
            "status": 6,
            "address": "0x94df8b352de7f46f64b01d3666bf6e936e44ce60",
            "txId": "0xb5ef8c13b968a406cc62a93a8bd80f9e9a906ef1b3fcf20a2e48573c17659268",
            "applyTime": "2019-10-12 11:12:02",
            "network": "ETH",
            "transferType": 0
        }"#;

        let record: WithdrawalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.coin, "USDT");
        assert_eq!(record.apply_time, "2019-10-12 11:12:02");
        assert_eq!(record.status, 6);
        assert!(record.address_tag.is_none());
    }
}
