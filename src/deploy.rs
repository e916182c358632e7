use std::time::Duration;

use alloy::{
    consensus::{SignableTransaction, TxEip1559, TxLegacy},
    eips::eip2718::Encodable2718,
    network::TxSignerSync,
    primitives::{Address, B256, Bytes, TxKind, U256},
    signers::local::PrivateKeySigner,
};
use anyhow::{Result, anyhow, bail};
use bon::Builder;
use tokio::{
    select,
    time::{Instant, sleep, sleep_until},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    artifacts::Artifact,
    eth_client::{CallRequest, EthRpc, TransactionReceipt},
};

/// Priority fee used when the node does not serve eth_maxPriorityFeePerGas
/// (1 gwei).
pub const DEFAULT_PRIORITY_FEE_WEI: u128 = 1_000_000_000;

#[derive(Builder)]
pub struct DeployRequest {
    pub artifact: Artifact,
    pub signer: PrivateKeySigner,
    /// Chain id to sign for, fetched from the node when unset
    pub chain_id: Option<u64>,
    /// Gas limit, estimated by the node when unset
    pub gas_limit: Option<u64>,
    #[builder(default = 1)]
    pub confirmations: u64,
    #[builder(default = Duration::from_millis(4000))]
    pub poll_interval: Duration,
    /// Cap on the whole confirmation wait, unbounded when unset
    pub timeout: Option<Duration>,
}

/// A deployment accepted into the node's mempool but not yet mined.
#[derive(Clone, Debug)]
pub struct PendingDeployment {
    pub transaction_hash: B256,
    pub sender: Address,
    pub nonce: u64,
}

#[derive(Clone, Debug)]
pub struct Deployed {
    pub address: Address,
    pub receipt: TransactionReceipt,
}

enum TxFees {
    Eip1559 {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
    Legacy {
        gas_price: u128,
    },
}

/// Broadcasts the creation transaction and waits until it is mined with the
/// requested depth, then hands back the created contract's address.
pub async fn run<C: EthRpc>(
    client: &C,
    request: &DeployRequest,
    cancel_token: CancellationToken,
) -> Result<Deployed> {
    let pending = submit(client, request).await?;
    pending.confirmed(client, request, cancel_token).await
}

async fn submit<C: EthRpc>(client: &C, request: &DeployRequest) -> Result<PendingDeployment> {
    let artifact = &request.artifact;
    let param_count = artifact.constructor_param_count();
    if param_count > 0 {
        bail!(
            "Constructor of {} takes {} argument(s) and none were provided",
            artifact.contract_name,
            param_count
        );
    }

    let sender = request.signer.address();
    let chain_id = match request.chain_id {
        Some(id) => id,
        None => client.chain_id().await?,
    };
    let nonce = client.get_transaction_count(&sender, "pending").await?;
    let fees = pick_fees(client).await?;
    let gas_limit = match request.gas_limit {
        Some(limit) => limit,
        None => {
            let call = CallRequest {
                from: Some(sender),
                data: Some(artifact.bytecode.clone()),
                ..Default::default()
            };
            client.estimate_gas(&call).await?
        }
    };

    info!(
        "Deploying {} from {} (nonce {}, gas limit {})",
        artifact.contract_name, sender, nonce, gas_limit
    );

    let raw = sign_creation(request, chain_id, nonce, gas_limit, &fees)?;
    debug!("Raw deployment transaction: 0x{}", hex::encode(&raw));

    // Exactly one broadcast per invocation, never resubmitted.
    let transaction_hash = client.send_raw_transaction(&raw).await?;
    info!("Deployment transaction broadcast: {}", transaction_hash);

    Ok(PendingDeployment {
        transaction_hash,
        sender,
        nonce,
    })
}

async fn pick_fees<C: EthRpc>(client: &C) -> Result<TxFees> {
    let block = client.latest_block().await?;
    match block.base_fee_per_gas {
        Some(base_fee) => {
            // Not every node serves eth_maxPriorityFeePerGas.
            let priority = match client.max_priority_fee_per_gas().await {
                Ok(tip) => tip,
                Err(error) => {
                    debug!("eth_maxPriorityFeePerGas unavailable: {}", error);
                    DEFAULT_PRIORITY_FEE_WEI
                }
            };
            let base_fee = base_fee.saturating_to::<u128>();
            Ok(TxFees::Eip1559 {
                max_fee_per_gas: base_fee.saturating_mul(2).saturating_add(priority),
                max_priority_fee_per_gas: priority,
            })
        }
        None => Ok(TxFees::Legacy {
            gas_price: client.gas_price().await?,
        }),
    }
}

fn sign_creation(
    request: &DeployRequest,
    chain_id: u64,
    nonce: u64,
    gas_limit: u64,
    fees: &TxFees,
) -> Result<Bytes> {
    match *fees {
        TxFees::Eip1559 {
            max_fee_per_gas,
            max_priority_fee_per_gas,
        } => {
            let mut tx = TxEip1559 {
                chain_id,
                nonce,
                gas_limit,
                max_fee_per_gas,
                max_priority_fee_per_gas,
                to: TxKind::Create,
                value: U256::ZERO,
                access_list: Default::default(),
                input: request.artifact.bytecode.clone(),
            };
            let signature = request.signer.sign_transaction_sync(&mut tx)?;
            Ok(tx.into_signed(signature).encoded_2718().into())
        }
        TxFees::Legacy { gas_price } => {
            let mut tx = TxLegacy {
                chain_id: Some(chain_id),
                nonce,
                gas_price,
                gas_limit,
                to: TxKind::Create,
                value: U256::ZERO,
                input: request.artifact.bytecode.clone(),
            };
            let signature = request.signer.sign_transaction_sync(&mut tx)?;
            Ok(tx.into_signed(signature).encoded_2718().into())
        }
    }
}

impl PendingDeployment {
    /// Polls until the transaction is mined with the requested depth and the
    /// receipt holds up, yielding the created contract.
    pub async fn confirmed<C: EthRpc>(
        &self,
        client: &C,
        request: &DeployRequest,
        cancel_token: CancellationToken,
    ) -> Result<Deployed> {
        let deadline = request.timeout.map(|timeout| Instant::now() + timeout);

        let receipt = loop {
            if let Some(receipt) = abortable(
                client.get_transaction_receipt(&self.transaction_hash),
                deadline,
                &cancel_token,
                &self.transaction_hash,
            )
            .await??
            {
                if receipt.block_number.is_some() {
                    break receipt;
                }
            }
            abortable(
                sleep(request.poll_interval),
                deadline,
                &cancel_token,
                &self.transaction_hash,
            )
            .await?;
        };

        if receipt.status.is_some_and(|status| status.is_zero()) {
            bail!("Deployment transaction {} reverted", self.transaction_hash);
        }
        let address = receipt.contract_address.ok_or_else(|| {
            anyhow!(
                "Receipt for {} carries no contract address",
                self.transaction_hash
            )
        })?;

        let mined = receipt
            .block_number
            .map(|number| number.to::<u64>())
            .unwrap_or_default();
        if request.confirmations > 1 {
            loop {
                let head = abortable(
                    client.block_number(),
                    deadline,
                    &cancel_token,
                    &self.transaction_hash,
                )
                .await??;
                // Depth counts the mined block itself.
                if head.saturating_sub(mined).saturating_add(1) >= request.confirmations {
                    break;
                }
                abortable(
                    sleep(request.poll_interval),
                    deadline,
                    &cancel_token,
                    &self.transaction_hash,
                )
                .await?;
            }
        }

        info!(
            "Deployment of {} confirmed in block {}",
            request.artifact.contract_name, mined
        );

        Ok(Deployed { address, receipt })
    }
}

// Every step of the wait races the deadline and the shutdown token,
// in-flight RPC calls included.
async fn abortable<T>(
    work: impl std::future::Future<Output = T>,
    deadline: Option<Instant>,
    cancel_token: &CancellationToken,
    transaction_hash: &B256,
) -> Result<T> {
    let timed_out = async {
        match deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    };
    select! {
        value = work => Ok(value),
        _ = timed_out => Err(anyhow!(
            "Timed out waiting for transaction {} to confirm",
            transaction_hash
        )),
        _ = cancel_token.cancelled() => Err(anyhow!(
            "Shutdown requested while waiting for transaction {}",
            transaction_hash
        )),
    }
}
