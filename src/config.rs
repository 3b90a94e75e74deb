use std::fmt;

use crate::error::WalletError;

const MAINNET_URL: &str = "https://api.binance.com";
const TESTNET_URL: &str = "https://testnet.binance.vision";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Testnet,
    Mainnet,
}

impl Environment {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Environment::Testnet => TESTNET_URL,
            Environment::Mainnet => MAINNET_URL,
        }
    }
}

/// Immutable process-lifetime settings, read once from the environment.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_secret: String,
    pub environment: Environment,
    pub testnet_url: String,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from the process environment, honoring a `.env`
    /// file when present.
    pub fn from_env() -> Result<Self, WalletError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup. Presence of
    /// `BINANCE_API_KEY` and `BINANCE_API_SECRET` is the only validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WalletError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("BINANCE_API_KEY").unwrap_or_default();
        let api_secret = lookup("BINANCE_API_SECRET").unwrap_or_default();

        let mut errors = Vec::new();
        if api_key.is_empty() {
            errors.push("BINANCE_API_KEY is not set");
        }
        if api_secret.is_empty() {
            errors.push("BINANCE_API_SECRET is not set");
        }
        if !errors.is_empty() {
            return Err(WalletError::Configuration(errors.join(", ")));
        }

        let testnet_enabled = lookup("ENABLE_TESTNET")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(true);

        let environment = if testnet_enabled {
            Environment::Testnet
        } else {
            Environment::Mainnet
        };

        if environment == Environment::Mainnet {
            tracing::warn!("Running in MAINNET mode - real funds at risk!");
        }

        let testnet_url = lookup("BINANCE_TESTNET_URL")
            .unwrap_or_else(|| TESTNET_URL.to_string());

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            api_key,
            api_secret,
            environment,
            testnet_url,
            log_level,
        })
    }

    pub fn base_url(&self) -> &str {
        match self.environment {
            Environment::Testnet => &self.testnet_url,
            Environment::Mainnet => MAINNET_URL,
        }
    }

    pub fn is_testnet(&self) -> bool {
        self.environment == Environment::Testnet
    }
}

// Credentials stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"**********")
            .field("api_secret", &"**********")
            .field("environment", &self.environment)
            .field("testnet_url", &self.testnet_url)
            .field("log_level", &self.log_level)
            .finish()
    }
}
