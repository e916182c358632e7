use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::Bytes;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("Artifact for contract '{name}' not found under {}", .dir.display())]
    NotFound { name: String, dir: PathBuf },
    #[error("Multiple artifacts match contract '{name}': {paths:?}")]
    Ambiguous { name: String, paths: Vec<PathBuf> },
    #[error("Artifact for contract '{name}' has no bytecode (abstract contract or interface?)")]
    MissingBytecode { name: String },
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

// https://hardhat.org/hardhat-runner/docs/advanced/artifacts#compilation-artifacts
// removed the deployedBytecode and linkReferences properties this tool never reads
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Bare contract name, matches the file stem
    pub contract_name: String,
    /// Solidity source the contract was compiled from
    #[serde(default)]
    pub source_name: String,
    /// Contract ABI as emitted by the compiler
    pub abi: Value,
    /// Creation bytecode, empty for abstract contracts and interfaces
    pub bytecode: Bytes,
}

impl Artifact {
    /// Number of parameters the constructor declares, 0 when the ABI has no
    /// constructor entry.
    pub fn constructor_param_count(&self) -> usize {
        self.abi
            .as_array()
            .into_iter()
            .flatten()
            .find(|entry| entry["type"] == "constructor")
            .and_then(|entry| entry["inputs"].as_array())
            .map_or(0, Vec::len)
    }
}

/// Resolves a contract by bare name anywhere under the artifacts directory,
/// the way the compiler lays them out (`contracts/<Source>.sol/<Name>.json`).
pub fn find(dir: &Path, name: &str) -> Result<Artifact, Error> {
    if !dir.is_dir() {
        return Err(Error::NotFound {
            name: name.to_string(),
            dir: dir.to_path_buf(),
        });
    }

    let mut matches = vec![];
    collect_matches(dir, name, &mut matches)?;
    matches.sort();

    match matches.as_slice() {
        [] => Err(Error::NotFound {
            name: name.to_string(),
            dir: dir.to_path_buf(),
        }),
        [path] => load(path, name),
        _ => Err(Error::Ambiguous {
            name: name.to_string(),
            paths: matches,
        }),
    }
}

fn collect_matches(dir: &Path, name: &str, matches: &mut Vec<PathBuf>) -> Result<(), Error> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_matches(&path, name, matches)?;
        } else if is_artifact_for(&path, name) {
            matches.push(path);
        }
    }
    Ok(())
}

// Debug companions stem to "<Name>.dbg", so they never collide with the
// artifact proper.
fn is_artifact_for(path: &Path, name: &str) -> bool {
    path.extension().and_then(OsStr::to_str) == Some("json")
        && path.file_stem().and_then(OsStr::to_str) == Some(name)
}

fn load(path: &Path, name: &str) -> Result<Artifact, Error> {
    let artifact: Artifact = serde_json::from_str(&fs::read_to_string(path)?)?;
    if artifact.bytecode.is_empty() {
        return Err(Error::MissingBytecode {
            name: name.to_string(),
        });
    }
    Ok(artifact)
}
