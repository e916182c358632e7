use alloy::primitives::{Address, B256, Bytes, U64, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
pub struct Request {
    pub jsonrpc: String,
    pub id: String,
    pub method: String,
    pub params: Vec<Value>,
}

#[derive(Deserialize, Debug)]
pub struct Response {
    pub result: Option<Value>,
    pub error: Option<Value>,
    pub id: String,
}

// https://ethereum.org/en/developers/docs/apis/json-rpc/#eth_gettransactionreceipt
// removed the log and bloom properties this tool never reads
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Hash of the transaction the receipt belongs to
    pub transaction_hash: B256,
    /// Block the transaction was included in
    pub block_number: Option<U64>,
    /// Hash of that block
    pub block_hash: Option<B256>,
    /// Address of the created contract, only set for creation transactions
    pub contract_address: Option<Address>,
    /// 1 on success, 0 on revert (absent on pre-Byzantium chains)
    pub status: Option<U64>,
    /// Gas actually consumed by the transaction
    pub gas_used: Option<U64>,
}

// https://ethereum.org/en/developers/docs/apis/json-rpc/#eth_getblockbynumber
// only the header fields the fee logic needs
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Height of the block
    pub number: U64,
    /// Base fee per gas, absent on chains that predate EIP-1559
    pub base_fee_per_gas: Option<U256>,
}

/// Parameter object for eth_estimateGas
#[derive(Clone, Debug, Default, Serialize)]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
}
