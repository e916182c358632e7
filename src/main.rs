use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use rps_deploy::{
    artifacts,
    config::Config,
    deploy::{self, DeployRequest},
    eth_client::Client,
    logging, stopper, wallet,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::setup();
    let config = Config::parse();
    info!("{:#?}", config);

    // Artifact and key problems surface before the node is ever contacted.
    let artifact = artifacts::find(&config.artifacts_dir, &config.contract)?;
    let signer = wallet::signer_from_config(&config)?;
    let client = Client::new_from_config(&config)?;

    let cancel_token = CancellationToken::new();
    let stopper_handle = stopper::run(cancel_token.clone());

    let request = DeployRequest::builder()
        .artifact(artifact)
        .signer(signer)
        .maybe_chain_id(config.chain_id)
        .maybe_gas_limit(config.gas_limit)
        .confirmations(config.confirmations)
        .poll_interval(Duration::from_millis(config.poll_interval_ms))
        .maybe_timeout((config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs)))
        .build();

    let deployed = deploy::run(&client, &request, cancel_token.clone()).await?;

    println!("{} deployed to: {}", config.contract, deployed.address);

    cancel_token.cancel();
    let _ = stopper_handle.await;
    Ok(())
}
