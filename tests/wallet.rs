use anyhow::Result;
use rps_deploy::{config::Config, test_utils, wallet};
use tempfile::TempDir;

const DEV_PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

fn base_config() -> Config {
    Config {
        rpc_url: "http://127.0.0.1:8545".to_string(),
        rpc_user: None,
        rpc_password: None,
        private_key: None,
        mnemonic_path: None,
        key_index: 0,
        artifacts_dir: "artifacts".into(),
        contract: "ConfidentialRockPaperScissors".to_string(),
        chain_id: None,
        gas_limit: None,
        confirmations: 1,
        poll_interval_ms: 4000,
        timeout_secs: 0,
    }
}

#[test]
fn test_signer_from_private_key() -> Result<()> {
    let mut config = base_config();
    config.private_key = Some(DEV_PRIVATE_KEY.to_string());

    let signer = wallet::signer_from_config(&config)?;
    assert_eq!(
        signer.address().to_string(),
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
    );
    Ok(())
}

#[test]
fn test_signer_from_private_key_without_prefix() -> Result<()> {
    let mut config = base_config();
    config.private_key = Some(DEV_PRIVATE_KEY.trim_start_matches("0x").to_string());

    let signer = wallet::signer_from_config(&config)?;
    assert_eq!(
        signer.address().to_string(),
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
    );
    Ok(())
}

#[test]
fn test_signer_from_mnemonic_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = test_utils::write_mnemonic(dir.path(), DEV_MNEMONIC)?;
    let mut config = base_config();
    config.mnemonic_path = Some(path);

    let signer = wallet::signer_from_config(&config)?;
    assert_eq!(
        signer.address().to_string(),
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
    );
    Ok(())
}

#[test]
fn test_signer_from_mnemonic_file_with_index() -> Result<()> {
    let dir = TempDir::new()?;
    let path = test_utils::write_mnemonic(dir.path(), DEV_MNEMONIC)?;
    let mut config = base_config();
    config.mnemonic_path = Some(path);
    config.key_index = 1;

    let signer = wallet::signer_from_config(&config)?;
    assert_eq!(
        signer.address().to_string(),
        "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
    );
    Ok(())
}

#[test]
fn test_signer_rejects_garbage_key() {
    let mut config = base_config();
    config.private_key = Some("0xnot-a-key".to_string());
    assert!(wallet::signer_from_config(&config).is_err());
}

#[test]
fn test_signer_requires_a_key_source() {
    let config = base_config();
    assert!(wallet::signer_from_config(&config).is_err());
}

#[test]
fn test_signer_rejects_two_key_sources() -> Result<()> {
    let dir = TempDir::new()?;
    let path = test_utils::write_mnemonic(dir.path(), DEV_MNEMONIC)?;
    let mut config = base_config();
    config.private_key = Some(DEV_PRIVATE_KEY.to_string());
    config.mnemonic_path = Some(path);

    let message = wallet::signer_from_config(&config)
        .unwrap_err()
        .to_string();
    assert!(message.contains("pick one"), "unexpected error: {}", message);
    Ok(())
}
