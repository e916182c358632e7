use std::{
    collections::VecDeque,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use alloy::primitives::{Address, B256, Bytes, U64, U256, keccak256};
use anyhow::Result;
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::eth_client::{Block, CallRequest, Error, EthRpc, TransactionReceipt};

pub fn new_artifacts_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Writes a compiler-shaped artifact (and its .dbg.json companion) under
/// `<root>/contracts/<source>/`, returning the artifact path.
pub fn write_artifact(
    root: &Path,
    source: &str,
    name: &str,
    bytecode: &str,
    abi: Value,
) -> Result<PathBuf> {
    let dir = root.join("contracts").join(source);
    fs::create_dir_all(&dir)?;

    let artifact = json!({
        "_format": "hh-sol-artifact-1",
        "contractName": name,
        "sourceName": format!("contracts/{}", source),
        "abi": abi,
        "bytecode": bytecode,
        "deployedBytecode": bytecode,
        "linkReferences": {},
        "deployedLinkReferences": {},
    });
    let path = dir.join(format!("{}.json", name));
    fs::write(&path, serde_json::to_string_pretty(&artifact)?)?;

    let debug_companion = json!({
        "_format": "hh-sol-dbg-1",
        "buildInfo": "../../build-info/deadbeef.json",
    });
    fs::write(
        dir.join(format!("{}.dbg.json", name)),
        serde_json::to_string_pretty(&debug_companion)?,
    )?;

    Ok(path)
}

pub fn write_mnemonic(dir: &Path, phrase: &str) -> Result<PathBuf> {
    let path = dir.join("mnemonic.txt");
    fs::write(&path, phrase)?;
    Ok(path)
}

pub fn dummy_receipt(block_number: u64) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: B256::ZERO,
        block_number: Some(U64::from(block_number)),
        block_hash: Some(B256::repeat_byte(0xbb)),
        contract_address: Some(Address::repeat_byte(0x42)),
        status: Some(U64::from(1)),
        gas_used: Some(U64::from(500_000)),
    }
}

/// Scripted stand-in for a node. Receipts and head heights are served from
/// queues so a test can walk the confirmation loop through any sequence.
pub struct MockEthState {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: u128,
    /// None makes eth_maxPriorityFeePerGas fail like a node without the method
    pub priority_fee: Option<u128>,
    /// None makes the chain look pre-EIP-1559
    pub base_fee_per_gas: Option<u128>,
    pub gas_estimate: u64,
    /// Makes eth_estimateGas fail with this message
    pub estimate_error: Option<String>,
    pub head: u64,
    pub heads: VecDeque<u64>,
    pub receipts: VecDeque<Option<TransactionReceipt>>,
    pub sent: Vec<Bytes>,
    pub calls: Vec<String>,
    /// Makes the next eth_sendRawTransaction fail with this message
    pub send_error: Option<String>,
    /// Makes eth_getTransactionReceipt hang forever, like a node that stops
    /// answering mid-connection
    pub stall_receipts: bool,
}

impl Default for MockEthState {
    fn default() -> Self {
        MockEthState {
            chain_id: 31337,
            nonce: 0,
            gas_price: 2_000_000_000,
            priority_fee: Some(1_000_000_000),
            base_fee_per_gas: Some(1_000_000_000),
            gas_estimate: 1_500_000,
            estimate_error: None,
            head: 1,
            heads: VecDeque::new(),
            receipts: VecDeque::new(),
            sent: vec![],
            calls: vec![],
            send_error: None,
            stall_receipts: false,
        }
    }
}

#[derive(Clone)]
pub struct MockEth {
    state: Arc<Mutex<MockEthState>>,
}

impl MockEth {
    pub fn new(state: MockEthState) -> Self {
        MockEth {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn sent(&self) -> Vec<Bytes> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl EthRpc for MockEth {
    async fn chain_id(&self) -> Result<u64, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("eth_chainId".to_string());
        Ok(state.chain_id)
    }

    async fn block_number(&self) -> Result<u64, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("eth_blockNumber".to_string());
        let head = state.heads.pop_front().unwrap_or(state.head);
        state.head = head;
        Ok(head)
    }

    async fn latest_block(&self) -> Result<Block, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("eth_getBlockByNumber".to_string());
        Ok(Block {
            number: U64::from(state.head),
            base_fee_per_gas: state.base_fee_per_gas.map(U256::from),
        })
    }

    async fn get_transaction_count(&self, _address: &Address, _tag: &str) -> Result<u64, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("eth_getTransactionCount".to_string());
        Ok(state.nonce)
    }

    async fn gas_price(&self) -> Result<u128, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("eth_gasPrice".to_string());
        Ok(state.gas_price)
    }

    async fn max_priority_fee_per_gas(&self) -> Result<u128, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("eth_maxPriorityFeePerGas".to_string());
        state.priority_fee.ok_or(Error::EthRpc {
            code: -32601,
            message: "Method not found".to_string(),
        })
    }

    async fn estimate_gas(&self, _request: &CallRequest) -> Result<u64, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("eth_estimateGas".to_string());
        if let Some(message) = state.estimate_error.take() {
            return Err(Error::EthRpc {
                code: -32000,
                message,
            });
        }
        Ok(state.gas_estimate)
    }

    async fn send_raw_transaction(&self, raw: &Bytes) -> Result<B256, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("eth_sendRawTransaction".to_string());
        if let Some(message) = state.send_error.take() {
            return Err(Error::EthRpc {
                code: -32000,
                message,
            });
        }
        let hash = keccak256(raw);
        state.sent.push(raw.clone());
        state.nonce += 1;
        Ok(hash)
    }

    async fn get_transaction_receipt(
        &self,
        hash: &B256,
    ) -> Result<Option<TransactionReceipt>, Error> {
        {
            let mut state = self.state.lock().unwrap();
            state.calls.push("eth_getTransactionReceipt".to_string());
            if !state.stall_receipts {
                return match state.receipts.pop_front() {
                    Some(Some(mut receipt)) => {
                        receipt.transaction_hash = *hash;
                        Ok(Some(receipt))
                    }
                    _ => Ok(None),
                };
            }
        }
        // The lock is released before parking, the caller still holds the mock.
        std::future::pending().await
    }
}
