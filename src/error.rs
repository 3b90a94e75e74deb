use thiserror::Error;

/// Error taxonomy for wallet operations.
///
/// Local failures (`Configuration`, `Validation`, `Unsupported`) are raised
/// before any network call; remote failures are surfaced unmodified apart
/// from the wrapping variant. Nothing is retried or swallowed.
#[derive(Error, Debug)]
pub enum WalletError {
    /// Required configuration is missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A locally-supplied argument failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested coin is absent from the account's balance snapshot.
    #[error("coin {0} not found in balance snapshot")]
    CoinNotFound(String),

    /// The operation is not served by the connected environment.
    #[error("{operation} is not available on this environment")]
    Unsupported { operation: String },

    /// The exchange rejected the request. `code` is Binance's numeric error
    /// code when the body parsed as `{"code": ..., "msg": ...}`.
    #[error("exchange rejected request: {message}")]
    Exchange { code: Option<i64>, message: String },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A successful response did not match the expected schema.
    #[error("failed to decode exchange response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl WalletError {
    pub fn validation(message: impl Into<String>) -> Self {
        WalletError::Validation(message.into())
    }

    pub fn unsupported(operation: impl Into<String>) -> Self {
        WalletError::Unsupported {
            operation: operation.into(),
        }
    }
}
