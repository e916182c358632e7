use std::{fmt, path::PathBuf};

use clap::Parser;

#[derive(Clone, Parser)]
#[clap(
    version = "0.1.0",
    about = "rps-deploy",
    long_about = r#"Deploys the compiled ConfidentialRockPaperScissors contract and prints its address"#
)]
pub struct Config {
    #[clap(
        long,
        env = "ETH_RPC_URL",
        help = "URL of the Ethereum JSON-RPC endpoint (e.g., http://localhost:8545)"
    )]
    pub rpc_url: String,

    #[clap(
        long,
        env = "ETH_RPC_USER",
        help = "User for HTTP basic auth on the RPC endpoint, if any"
    )]
    pub rpc_user: Option<String>,

    #[clap(
        long,
        env = "ETH_RPC_PASSWORD",
        help = "Password for HTTP basic auth on the RPC endpoint, if any"
    )]
    pub rpc_password: Option<String>,

    #[clap(
        long,
        env = "DEPLOYER_PRIVATE_KEY",
        help = "Hex-encoded private key of the deployer account ('0x' prefix optional)"
    )]
    pub private_key: Option<String>,

    #[clap(
        long,
        env = "DEPLOYER_MNEMONIC_PATH",
        help = "Full path to a file containing the deployer's BIP-39 mnemonic phrase"
    )]
    pub mnemonic_path: Option<PathBuf>,

    #[clap(
        long,
        env = "DEPLOYER_KEY_INDEX",
        help = "Account index under the standard Ethereum derivation path (mnemonic only)",
        default_value = "0"
    )]
    pub key_index: u32,

    #[clap(
        long,
        env = "ARTIFACTS_DIR",
        help = "Directory holding the toolchain's compiled contract artifacts",
        default_value = "artifacts"
    )]
    pub artifacts_dir: PathBuf,

    #[clap(
        long,
        env = "CONTRACT_NAME",
        help = "Name of the contract artifact to deploy",
        default_value = "ConfidentialRockPaperScissors"
    )]
    pub contract: String,

    #[clap(
        long,
        env = "CHAIN_ID",
        help = "Chain id to sign for; fetched via eth_chainId when unset"
    )]
    pub chain_id: Option<u64>,

    #[clap(
        long,
        env = "GAS_LIMIT",
        help = "Gas limit for the deployment; estimated via eth_estimateGas when unset"
    )]
    pub gas_limit: Option<u64>,

    #[clap(
        long,
        env = "CONFIRMATIONS",
        help = "Blocks the deployment must be buried under before it counts as confirmed",
        default_value = "1"
    )]
    pub confirmations: u64,

    #[clap(
        long,
        env = "POLL_INTERVAL_MS",
        help = "Receipt polling interval in milliseconds",
        default_value = "4000"
    )]
    pub poll_interval_ms: u64,

    #[clap(
        long,
        env = "DEPLOY_TIMEOUT_SECS",
        help = "Overall confirmation-wait timeout in seconds (0 waits indefinitely)",
        default_value = "0"
    )]
    pub timeout_secs: u64,
}

// Hand-rolled so the startup log can never leak key material.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("rpc_user", &self.rpc_user)
            .field("rpc_password", &self.rpc_password.as_ref().map(|_| "<redacted>"))
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("mnemonic_path", &self.mnemonic_path)
            .field("key_index", &self.key_index)
            .field("artifacts_dir", &self.artifacts_dir)
            .field("contract", &self.contract)
            .field("chain_id", &self.chain_id)
            .field("gas_limit", &self.gas_limit)
            .field("confirmations", &self.confirmations)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
