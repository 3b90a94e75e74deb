use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, instrument};

use crate::config::{Config, Environment};
use crate::error::WalletError;

use super::interface::WalletExchange;
use super::models::*;

type HmacSha256 = Hmac<Sha256>;

const API_KEY_HEADER: &str = "X-MBX-APIKEY";

// The venue rejects larger page sizes on the history endpoints.
const MAX_HISTORY_LIMIT: u32 = 1000;

/// Authenticated handle to Binance's private REST API. One instance per
/// manager; every request is independently signed.
pub struct BinanceClient {
    http: Client,
    config: Config,
    base_url: String,
}

impl BinanceClient {
    pub fn new(config: &Config) -> Result<Self, WalletError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(WalletError::Transport)?;

        let base_url = config.base_url().to_string();

        Ok(Self {
            http,
            config: config.clone(),
            base_url,
        })
    }

    fn timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64
    }

    fn sign(&self, query: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.config.api_secret.as_bytes()).unwrap();
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn build_signed_query(&self, params: &[(&str, String)]) -> String {
        let timestamp = Self::timestamp().to_string();
        let mut all_params: Vec<(&str, String)> = params.to_vec();
        all_params.push(("timestamp", timestamp));

        let query: String = all_params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let signature = self.sign(&query);
        format!("{}&signature={}", query, signature)
    }

    async fn private_request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, WalletError> {
        let query = self.build_signed_query(params);
        let url = format!("{}{}?{}", self.base_url, path, query);

        let response = self
            .http
            .request(method, &url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Binance reports failures as {"code": ..., "msg": ...}.
            return Err(match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(body) => WalletError::Exchange {
                    code: Some(body.code),
                    message: body.msg,
                },
                Err(_) => WalletError::Exchange {
                    code: None,
                    message: format!("HTTP {}: {}", status, text),
                },
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    fn history_params(
        coin: Option<String>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(c) = coin {
            params.push(("coin", c));
        }
        if let Some(s) = since {
            params.push(("startTime", s.to_string()));
        }
        if let Some(l) = limit {
            params.push(("limit", l.min(MAX_HISTORY_LIMIT).to_string()));
        }
        params
    }
}

#[async_trait]
impl WalletExchange for BinanceClient {
    fn supports_deposit_endpoints(&self) -> bool {
        // The spot testnet serves /api/v3 but not /sapi/v1/capital.
        self.config.environment == Environment::Mainnet
    }

    #[instrument(skip(self))]
    async fn fetch_account(&self) -> Result<AccountInfo, WalletError> {
        debug!("Fetching account info");

        self.private_request(Method::GET, "/api/v3/account", &[])
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_deposit_address(
        &self,
        coin: &str,
        network: Option<String>,
    ) -> Result<DepositAddress, WalletError> {
        let mut params = vec![("coin", coin.to_string())];
        if let Some(n) = network {
            params.push(("network", n));
        }

        debug!("Fetching deposit address for {}", coin);

        self.private_request(Method::GET, "/sapi/v1/capital/deposit/address", &params)
            .await
    }

    #[instrument(skip(self, request), fields(coin = %request.coin))]
    async fn submit_withdrawal(
        &self,
        request: &WithdrawalRequest,
    ) -> Result<WithdrawAck, WalletError> {
        let mut params = vec![
            ("coin", request.coin.clone()),
            ("amount", request.amount.to_string()),
            ("address", request.address.clone()),
        ];

        if let Some(network) = &request.network {
            params.push(("network", network.clone()));
        }

        if let Some(tag) = &request.tag {
            params.push(("addressTag", tag.clone()));
        }

        debug!("Submitting withdrawal of {} {}", request.amount, request.coin);

        self.private_request(Method::POST, "/sapi/v1/capital/withdraw/apply", &params)
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_deposits(
        &self,
        coin: Option<String>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<DepositRecord>, WalletError> {
        debug!("Fetching deposit history for {:?}", coin);

        let params = Self::history_params(coin, since, limit);

        self.private_request(Method::GET, "/sapi/v1/capital/deposit/hisrec", &params)
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_withdrawals(
        &self,
        coin: Option<String>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<WithdrawalRecord>, WalletError> {
        debug!("Fetching withdrawal history for {:?}", coin);

        let params = Self::history_params(coin, since, limit);

        self.private_request(Method::GET, "/sapi/v1/capital/withdraw/history", &params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(secret: &str, environment: Environment) -> BinanceClient {
        let config = Config {
            api_key: "test-key".to_string(),
            api_secret: secret.to_string(),
            environment,
            testnet_url: Environment::Testnet.default_base_url().to_string(),
            log_level: "info".to_string(),
        };
        BinanceClient::new(&config).unwrap()
    }

    #[test]
    fn test_timestamp() {
        let ts = BinanceClient::timestamp();
        assert!(ts > 1700000000000); // Should be after Nov 2023
    }

    #[test]
    fn test_signature_matches_documented_vector() {
        // Worked example from the Binance REST API documentation.
        let client = test_client(
            "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j",
            Environment::Testnet,
        );

        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            client.sign(query),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn test_build_signed_query_appends_timestamp_and_signature() {
        let client = test_client("secret", Environment::Testnet);

        let query = client.build_signed_query(&[("coin", "USDT".to_string())]);
        assert!(query.starts_with("coin=USDT&timestamp="));
        assert!(query.contains("&signature="));
    }

    #[test]
    fn test_history_params_clamps_limit() {
        let params = BinanceClient::history_params(
            Some("BTC".to_string()),
            Some(1600000000000),
            Some(5000),
        );
        assert_eq!(
            params,
            vec![
                ("coin", "BTC".to_string()),
                ("startTime", "1600000000000".to_string()),
                ("limit", "1000".to_string()),
            ]
        );
    }

    #[test]
    fn test_deposit_endpoints_gated_by_environment() {
        assert!(!test_client("s", Environment::Testnet).supports_deposit_endpoints());
        assert!(test_client("s", Environment::Mainnet).supports_deposit_endpoints());
    }
}
