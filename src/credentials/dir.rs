use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::credentials::{ClientCredentials, CredentialSource, UserCredentials};
use crate::error::TokenError;
use crate::utils::constants::{CLIENT_CREDENTIALS_FILE, USER_CREDENTIALS_FILE};

/// Reads `client.json` and `user.json` from a credentials directory.
#[derive(Debug, Clone)]
pub struct DirCredentialSource {
    dir: PathBuf,
}

impl DirCredentialSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T, TokenError> {
        let path = self.dir.join(file);
        debug!("reading credentials from {}", path.display());
        let content = fs::read_to_string(&path)
            .map_err(|e| TokenError::CredentialResolution(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| TokenError::CredentialResolution(format!("{}: {}", path.display(), e)))
    }
}

impl CredentialSource for DirCredentialSource {
    fn client_credentials(&self) -> Result<ClientCredentials, TokenError> {
        self.read_json(CLIENT_CREDENTIALS_FILE)
    }

    fn user_credentials(&self) -> Result<UserCredentials, TokenError> {
        self.read_json(USER_CREDENTIALS_FILE)
    }
}
