use serde::Deserialize;
use serde_json::Value;
use thiserror::Error as ThisError;

#[derive(Deserialize, Debug)]
pub struct EthRpcErrorResponse {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(String),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Ethereum RPC error (code {code}): {message}")]
    EthRpc { code: i64, message: String },
    #[error("Invalid header value error: {0}")]
    InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
}
