use crate::{
    api::{self, AuthConfig, AuthState},
    auth::{CredentialStore, FileCredentialStore, MemoryCredentialStore},
    cli::telemetry,
};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub users_file: Option<PathBuf>,
    pub frontend_base_url: String,
    pub session_ttl_seconds: u64,
}

/// Pick the credential store: the JSON file when configured, memory otherwise.
///
/// # Errors
/// Returns an error if the users file exists but cannot be read or parsed.
pub async fn credential_store(users_file: Option<PathBuf>) -> Result<Arc<dyn CredentialStore>> {
    let Some(path) = users_file else {
        info!("using in-memory credential store");
        return Ok(Arc::new(MemoryCredentialStore::new()));
    };

    let store = FileCredentialStore::new(path);
    store
        .check()
        .await
        .with_context(|| format!("Failed to open users file {}", store.path().display()))?;
    info!(path = %store.path().display(), "using file credential store");
    Ok(Arc::new(store))
}

/// Execute the server action.
/// # Errors
/// Returns an error if the users file is unusable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        port = args.port,
        frontend_base_url = %args.frontend_base_url,
        session_ttl_seconds = args.session_ttl_seconds,
        "starting accesso"
    );

    let credentials = credential_store(args.users_file).await?;
    let config =
        AuthConfig::new(args.frontend_base_url).with_session_ttl_seconds(args.session_ttl_seconds);
    let auth_state = Arc::new(AuthState::new(config, credentials));

    let result = api::new(args.port, auth_state).await;
    telemetry::shutdown_tracer();
    result
}
