pub mod client;
pub mod error;
pub mod types;

pub use client::{Client, EthRpc};
pub use error::Error;
pub use types::{Block, CallRequest, TransactionReceipt};
