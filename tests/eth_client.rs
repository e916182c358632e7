use alloy::primitives::{Address, B256, U64};
use anyhow::Result;
use rps_deploy::eth_client::{Block, CallRequest, Client, Error, TransactionReceipt};
use serde_json::json;

#[test]
fn test_receipt_deserializes_node_payload() -> Result<()> {
    let payload = json!({
        "transactionHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
        "transactionIndex": "0x0",
        "blockHash": "0x58e1a9a59b3f9c9452361e4db2a9d55034976e0cde63ffc5e9a0d65c3e163efb",
        "blockNumber": "0xa",
        "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        "to": null,
        "cumulativeGasUsed": "0x6a20",
        "gasUsed": "0x6a20",
        "contractAddress": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
        "logs": [],
        "logsBloom": "0x00",
        "status": "0x1",
        "type": "0x2",
        "effectiveGasPrice": "0x77359400"
    });

    let receipt: TransactionReceipt = serde_json::from_value(payload)?;
    assert_eq!(receipt.block_number, Some(U64::from(10)));
    assert_eq!(receipt.status, Some(U64::from(1)));
    assert_eq!(receipt.gas_used, Some(U64::from(0x6a20)));
    assert_eq!(
        receipt.contract_address,
        Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".parse::<Address>()?)
    );
    Ok(())
}

#[test]
fn test_block_without_base_fee() -> Result<()> {
    // pre-London chains have no baseFeePerGas in their headers
    let payload = json!({
        "number": "0x1",
        "hash": "0x58e1a9a59b3f9c9452361e4db2a9d55034976e0cde63ffc5e9a0d65c3e163efb",
        "gasLimit": "0x1c9c380"
    });

    let block: Block = serde_json::from_value(payload)?;
    assert_eq!(block.number, U64::from(1));
    assert!(block.base_fee_per_gas.is_none());
    Ok(())
}

#[test]
fn test_call_request_skips_unset_fields() -> Result<()> {
    let call = CallRequest {
        from: Some(Address::repeat_byte(0x11)),
        data: Some("0x6000".parse()?),
        ..Default::default()
    };

    let value = serde_json::to_value(&call)?;
    assert_eq!(
        value["from"],
        json!("0x1111111111111111111111111111111111111111")
    );
    assert_eq!(value["data"], json!("0x6000"));
    assert!(value.get("to").is_none());
    assert!(value.get("value").is_none());
    Ok(())
}

#[tokio::test]
async fn test_unreachable_node_errors() -> Result<()> {
    // Nothing listens on the discard port, so the request fails at transport level.
    let client = Client::new("http://127.0.0.1:9".to_string(), None, None)?;
    let result = client.chain_id().await;
    assert!(matches!(result, Err(Error::Http(_))));
    Ok(())
}

// Needs a node at ETH_RPC_URL (defaults to the usual local devnet port).
#[tokio::test]
#[ignore]
async fn test_live_node_round_trip() -> Result<()> {
    let url =
        std::env::var("ETH_RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8545".to_string());
    let client = Client::new(url, None, None)?;

    let chain_id = client.chain_id().await?;
    assert!(chain_id > 0);

    let block = client.latest_block().await?;
    let head = client.block_number().await?;
    assert!(head >= block.number.to::<u64>());

    // unknown hash comes back as a null result, not an error
    let missing = client
        .get_transaction_receipt(&B256::repeat_byte(0xee))
        .await?;
    assert!(missing.is_none());
    Ok(())
}
