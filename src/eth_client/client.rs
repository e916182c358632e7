use alloy::primitives::{Address, B256, Bytes, U64, U256};
use base64::prelude::*;
use reqwest::{Client as HttpClient, ClientBuilder, header::HeaderMap};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;

use super::{
    error::{Error, EthRpcErrorResponse},
    types::{Block, CallRequest, Request, Response, TransactionReceipt},
};

#[derive(Clone, Debug)]
pub struct Client {
    client: HttpClient,
    url: String,
}

const JSONRPC: &str = "2.0";

impl Client {
    pub fn new(url: String, user: Option<String>, password: Option<String>) -> Result<Self, Error> {
        let client = ClientBuilder::new()
            .default_headers({
                let mut headers = HeaderMap::new();
                if let Some(user) = user {
                    let auth_str = BASE64_STANDARD
                        .encode(format!("{}:{}", user, password.unwrap_or_default()));
                    headers.insert("Authorization", format!("Basic {}", auth_str).parse()?);
                }
                headers.insert("Content-Type", "application/json".parse()?);
                headers.insert("Accept", "application/json".parse()?);
                headers
            })
            .build()?;

        Ok(Client { client, url })
    }

    pub fn new_from_config(config: &Config) -> Result<Self, Error> {
        Client::new(
            config.rpc_url.clone(),
            config.rpc_user.clone(),
            config.rpc_password.clone(),
        )
    }

    fn handle_response<T>(response: Response) -> Result<T, Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        match (response.result, response.error) {
            (Some(result), None) => Ok(serde_json::from_value(result)?),
            (None, Some(error)) => {
                let detail: EthRpcErrorResponse = serde_json::from_value(error)?;
                Err(Error::EthRpc {
                    code: detail.code,
                    message: detail.message,
                })
            }
            // Nodes answer eth_getTransactionReceipt with a null result while
            // the transaction is pending, so a null settles into the caller's
            // Option before it counts as a malformed response.
            (None, None) => serde_json::from_value(Value::Null)
                .map_err(|_| Error::Unexpected("No result or error in RPC response".to_string())),
            (Some(_), Some(_)) => Err(Error::Unexpected(
                "Both result and error present in RPC response".to_string(),
            )),
        }
    }

    pub async fn call<T>(&self, method: &str, params: Vec<Value>) -> Result<T, Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request = Request {
            jsonrpc: JSONRPC.to_owned(),
            id: "0".to_string(),
            method: method.to_string(),
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .json::<Response>()
            .await?;

        Self::handle_response(response)
    }

    pub async fn chain_id(&self) -> Result<u64, Error> {
        let id: U64 = self.call("eth_chainId", vec![]).await?;
        Ok(id.to::<u64>())
    }

    pub async fn block_number(&self) -> Result<u64, Error> {
        let number: U64 = self.call("eth_blockNumber", vec![]).await?;
        Ok(number.to::<u64>())
    }

    pub async fn latest_block(&self) -> Result<Block, Error> {
        self.call("eth_getBlockByNumber", vec!["latest".into(), false.into()])
            .await
    }

    pub async fn get_transaction_count(&self, address: &Address, tag: &str) -> Result<u64, Error> {
        let nonce: U64 = self
            .call(
                "eth_getTransactionCount",
                vec![serde_json::to_value(address)?, tag.into()],
            )
            .await?;
        Ok(nonce.to::<u64>())
    }

    pub async fn gas_price(&self) -> Result<u128, Error> {
        let price: U256 = self.call("eth_gasPrice", vec![]).await?;
        Ok(price.saturating_to::<u128>())
    }

    pub async fn max_priority_fee_per_gas(&self) -> Result<u128, Error> {
        let tip: U256 = self.call("eth_maxPriorityFeePerGas", vec![]).await?;
        Ok(tip.saturating_to::<u128>())
    }

    pub async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, Error> {
        let gas: U256 = self
            .call("eth_estimateGas", vec![serde_json::to_value(request)?])
            .await?;
        Ok(gas.saturating_to::<u64>())
    }

    pub async fn send_raw_transaction(&self, raw: &Bytes) -> Result<B256, Error> {
        self.call("eth_sendRawTransaction", vec![serde_json::to_value(raw)?])
            .await
    }

    pub async fn get_transaction_receipt(
        &self,
        hash: &B256,
    ) -> Result<Option<TransactionReceipt>, Error> {
        self.call(
            "eth_getTransactionReceipt",
            vec![serde_json::to_value(hash)?],
        )
        .await
    }
}

pub trait EthRpc: Send + Sync + Clone + 'static {
    fn chain_id(&self) -> impl std::future::Future<Output = Result<u64, Error>> + std::marker::Send;
    fn block_number(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, Error>> + std::marker::Send;
    fn latest_block(
        &self,
    ) -> impl std::future::Future<Output = Result<Block, Error>> + std::marker::Send;
    fn get_transaction_count(
        &self,
        address: &Address,
        tag: &str,
    ) -> impl std::future::Future<Output = Result<u64, Error>> + std::marker::Send;
    fn gas_price(&self)
    -> impl std::future::Future<Output = Result<u128, Error>> + std::marker::Send;
    fn max_priority_fee_per_gas(
        &self,
    ) -> impl std::future::Future<Output = Result<u128, Error>> + std::marker::Send;
    fn estimate_gas(
        &self,
        request: &CallRequest,
    ) -> impl std::future::Future<Output = Result<u64, Error>> + std::marker::Send;
    fn send_raw_transaction(
        &self,
        raw: &Bytes,
    ) -> impl std::future::Future<Output = Result<B256, Error>> + std::marker::Send;
    fn get_transaction_receipt(
        &self,
        hash: &B256,
    ) -> impl std::future::Future<Output = Result<Option<TransactionReceipt>, Error>> + std::marker::Send;
}

impl EthRpc for Client {
    async fn chain_id(&self) -> Result<u64, Error> {
        self.chain_id().await
    }

    async fn block_number(&self) -> Result<u64, Error> {
        self.block_number().await
    }

    async fn latest_block(&self) -> Result<Block, Error> {
        self.latest_block().await
    }

    async fn get_transaction_count(&self, address: &Address, tag: &str) -> Result<u64, Error> {
        self.get_transaction_count(address, tag).await
    }

    async fn gas_price(&self) -> Result<u128, Error> {
        self.gas_price().await
    }

    async fn max_priority_fee_per_gas(&self) -> Result<u128, Error> {
        self.max_priority_fee_per_gas().await
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, Error> {
        self.estimate_gas(request).await
    }

    async fn send_raw_transaction(&self, raw: &Bytes) -> Result<B256, Error> {
        self.send_raw_transaction(raw).await
    }

    async fn get_transaction_receipt(
        &self,
        hash: &B256,
    ) -> Result<Option<TransactionReceipt>, Error> {
        self.get_transaction_receipt(hash).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(result: Option<Value>, error: Option<Value>) -> Response {
        Response {
            result,
            error,
            id: "0".to_string(),
        }
    }

    #[test]
    fn test_handle_response_result() {
        let id: U64 = Client::handle_response(response(Some(json!("0x7a69")), None)).unwrap();
        assert_eq!(id.to::<u64>(), 31337);
    }

    #[test]
    fn test_handle_response_error() {
        let error = json!({"code": -32000, "message": "nonce too low"});
        let result: Result<U64, Error> = Client::handle_response(response(None, Some(error)));
        match result {
            Err(Error::EthRpc { code, message }) => {
                assert_eq!(code, -32000);
                assert_eq!(message, "nonce too low");
            }
            other => panic!("expected EthRpc error, got {:?}", other),
        }
    }

    #[test]
    fn test_handle_response_null_result_into_option() {
        let receipt: Option<TransactionReceipt> =
            Client::handle_response(response(None, None)).unwrap();
        assert!(receipt.is_none());
    }

    #[test]
    fn test_handle_response_null_result_into_scalar() {
        let result: Result<U64, Error> = Client::handle_response(response(None, None));
        match result {
            Err(Error::Unexpected(message)) => {
                assert_eq!(message, "No result or error in RPC response");
            }
            other => panic!("expected Unexpected error, got {:?}", other),
        }
    }

    #[test]
    fn test_handle_response_both_result_and_error() {
        let error = json!({"code": 3, "message": "execution reverted"});
        let result: Result<U64, Error> =
            Client::handle_response(response(Some(json!("0x1")), Some(error)));
        assert!(matches!(result, Err(Error::Unexpected(_))));
    }
}
