//! Credential store backed by a single JSON file.
//!
//! The file holds an array of `{login, password, firstName, lastName}` objects.
//! A missing file reads as an empty store and is created on the first insert.
//! Every read-modify-write runs under one mutex and the new contents are
//! written to a sibling temp file before being renamed over the original.

use anyhow::{Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs, sync::Mutex};
use tracing::{Instrument, debug, info_span};

use super::credentials::{Credential, CredentialStore, InsertOutcome};

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    login: String,
    password: String,
    first_name: String,
    last_name: String,
}

impl From<UserRecord> for Credential {
    fn from(record: UserRecord) -> Self {
        Self::new(
            record.login,
            SecretString::from(record.password),
            record.first_name,
            record.last_name,
        )
    }
}

impl From<&Credential> for UserRecord {
    fn from(credential: &Credential) -> Self {
        Self {
            login: credential.login.clone(),
            password: credential.password.expose_secret().to_string(),
            first_name: credential.first_name.clone(),
            last_name: credential.last_name.clone(),
        }
    }
}

#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<UserRecord>> {
        let span = info_span!("store.read", store.path = %self.path.display());
        let contents = match fs::read_to_string(&self.path).instrument(span).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("users file not found, treating as empty");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read {}", self.path.display()));
            }
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    async fn write_records(&self, records: &[UserRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records).context("failed to serialize users")?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let span = info_span!("store.write", store.path = %self.path.display());
        async {
            fs::write(&tmp, json)
                .await
                .with_context(|| format!("failed to write {}", tmp.display()))?;
            fs::rename(&tmp, &self.path)
                .await
                .with_context(|| format!("failed to replace {}", self.path.display()))
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<Credential>> {
        let _guard = self.lock.lock().await;
        let records = self.read_records().await?;
        Ok(records
            .into_iter()
            .find(|record| record.login == login)
            .map(Credential::from))
    }

    async fn insert(&self, credential: Credential) -> Result<InsertOutcome> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        if records.iter().any(|record| record.login == credential.login) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        records.push(UserRecord::from(&credential));
        self.write_records(&records).await?;
        Ok(InsertOutcome::Created)
    }

    fn kind(&self) -> &'static str {
        "file"
    }

    async fn check(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.read_records().await.map(|_| ())
    }
}
