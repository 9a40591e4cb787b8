use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("Error opening key file {0}: {1}")]
    FileOpenError(String, String),

    #[error("Error parsing key file {0}: {1}")]
    ParseError(String, String),

    #[error("Error writing key file {0}: {1}")]
    WriteError(String, String),
}

/// Directory of named keys.
///
/// `<name>_pub.json` holds the address as a JSON string in base58 and
/// `<name>.json` the 64-byte keypair as a JSON array of numbers.
#[derive(Clone, Debug)]
pub struct KeyStore {
    dir: PathBuf,
}

impl KeyStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        KeyStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn public_key_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}_pub.json", name))
    }

    fn keypair_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    pub fn public_key(&self, name: &str) -> Result<Pubkey, KeyStoreError> {
        let path = self.public_key_path(name);
        let address: String = read_json(&path)?;
        Pubkey::from_str(&address)
            .map_err(|err| KeyStoreError::ParseError(path.display().to_string(), err.to_string()))
    }

    pub fn keypair(&self, name: &str) -> Result<Keypair, KeyStoreError> {
        let path = self.keypair_path(name);
        let bytes: Vec<u8> = read_json(&path)?;
        Keypair::from_bytes(&bytes)
            .map_err(|err| KeyStoreError::ParseError(path.display().to_string(), err.to_string()))
    }

    pub fn write_public_key(&self, name: &str, pubkey: &Pubkey) -> Result<(), KeyStoreError> {
        let path = self.public_key_path(name);
        let to_error = |err: String| KeyStoreError::WriteError(path.display().to_string(), err);

        fs::create_dir_all(&self.dir).map_err(|err| to_error(err.to_string()))?;
        let contents =
            serde_json::to_string(&pubkey.to_string()).map_err(|err| to_error(err.to_string()))?;
        fs::write(&path, contents).map_err(|err| to_error(err.to_string()))?;

        debug!("Wrote {} to {}", pubkey, path.display());
        Ok(())
    }

    /// Accepts either a base58 address or the name of a stored key.
    pub fn resolve(&self, name_or_address: &str) -> Result<Pubkey, KeyStoreError> {
        match Pubkey::from_str(name_or_address) {
            Ok(pubkey) => Ok(pubkey),
            Err(_) => self.public_key(name_or_address),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, KeyStoreError> {
    let file = fs::File::open(path)
        .map_err(|err| KeyStoreError::FileOpenError(path.display().to_string(), err.to_string()))?;
    serde_json::from_reader(file)
        .map_err(|err| KeyStoreError::ParseError(path.display().to_string(), err.to_string()))
}
