use std::fs;

use alloy::signers::local::{MnemonicBuilder, PrivateKeySigner, coins_bip39::English};
use anyhow::{Context, Result, bail};

use crate::config::Config;

/// Builds the deployer's signer from exactly one of the configured key
/// sources.
pub fn signer_from_config(config: &Config) -> Result<PrivateKeySigner> {
    match (&config.private_key, &config.mnemonic_path) {
        (Some(_), Some(_)) => {
            bail!("Both --private-key and --mnemonic-path set, pick one")
        }
        (Some(key), None) => key
            .trim()
            .parse::<PrivateKeySigner>()
            .context("Failed to parse deployer private key"),
        (None, Some(path)) => {
            let phrase = fs::read_to_string(path)
                .with_context(|| format!("Failed to read mnemonic file {}", path.display()))?;
            MnemonicBuilder::<English>::default()
                .phrase(phrase.trim())
                .index(config.key_index)?
                .build()
                .context("Failed to derive deployer key from mnemonic")
        }
        (None, None) => {
            bail!("No deployer key configured, set --private-key or --mnemonic-path")
        }
    }
}
