//! Sign-in lifecycle against both credential stores, without HTTP.

use accesso::auth::{
    AuthError, AuthService, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    SessionHandle, SessionStore,
};
use anyhow::{Context, Result};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tempfile::tempdir;

async fn full_lifecycle(credentials: Arc<dyn CredentialStore>) -> Result<()> {
    let service = AuthService::new(credentials, SessionStore::default());
    let mut markers: HashMap<String, String> = HashMap::new();

    service
        .register(Some("Ada"), Some("Lovelace"), Some("ada"), Some("engine"))
        .await?;

    let session = service.login("ada", "engine").await?;
    let profile = service
        .current_user(&session.handle, |login| markers.get(login).cloned())
        .await?;
    assert_eq!(profile.first_name, "Ada");
    assert_eq!(profile.last_name, "Lovelace");
    assert_eq!(profile.last_logged, None);

    let marker = service.logout(&session.handle).await?;
    markers.insert(marker.login.clone(), marker.timestamp()?);
    assert!(matches!(
        service.authenticate(&session.handle).await,
        Err(AuthError::Unauthenticated)
    ));

    let again = service.login("ada", "engine").await?;
    let profile = service
        .current_user(&again.handle, |login| markers.get(login).cloned())
        .await?;
    assert_eq!(profile.last_logged, Some(marker.timestamp()?));
    Ok(())
}

#[tokio::test]
async fn lifecycle_with_memory_store() -> Result<()> {
    full_lifecycle(Arc::new(MemoryCredentialStore::new())).await
}

#[tokio::test]
async fn lifecycle_with_file_store() -> Result<()> {
    let dir = tempdir()?;
    full_lifecycle(Arc::new(FileCredentialStore::new(dir.path().join("users.json")))).await
}

#[tokio::test]
async fn file_store_survives_restart() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("users.json");

    let first = AuthService::new(
        Arc::new(FileCredentialStore::new(path.clone())),
        SessionStore::default(),
    );
    first
        .register(Some("Ada"), Some("Lovelace"), Some("ada"), Some("engine"))
        .await?;
    let old_session = first.login("ada", "engine").await?;

    // Credentials persist; sessions do not.
    let second = AuthService::new(
        Arc::new(FileCredentialStore::new(path)),
        SessionStore::default(),
    );
    assert!(second.authenticate(&old_session.handle).await.is_err());
    let outcome = second.login("ada", "engine").await?;
    assert_eq!(outcome.identity.login, "ada");
    assert!(matches!(
        second
            .register(Some("A"), Some("B"), Some("ada"), Some("x"))
            .await,
        Err(AuthError::Conflict)
    ));
    Ok(())
}

async fn racing_registrations(credentials: Arc<dyn CredentialStore>) -> Result<()> {
    let service = Arc::new(AuthService::new(credentials, SessionStore::default()));

    let mut tasks = Vec::new();
    for i in 0..100 {
        let service = service.clone();
        tasks.push(tokio::spawn(async move {
            let password = format!("pw-{i}");
            service
                .register(Some("Ada"), Some("Lovelace"), Some("ada"), Some(&password))
                .await
                .map(|_| i)
        }));
    }

    let mut winners = Vec::new();
    let mut conflicts = 0;
    for task in tasks {
        match task.await? {
            Ok(i) => winners.push(i),
            Err(AuthError::Conflict) => conflicts += 1,
            Err(err) => return Err(err).context("unexpected registration failure"),
        }
    }
    assert_eq!(winners.len(), 1);
    assert_eq!(conflicts, 99);

    // The stored password is the winner's.
    let winner = winners.first().context("no winner")?;
    service.login("ada", &format!("pw-{winner}")).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_memory() -> Result<()> {
    racing_registrations(Arc::new(MemoryCredentialStore::new())).await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_file() -> Result<()> {
    let dir = tempdir()?;
    racing_registrations(Arc::new(FileCredentialStore::new(dir.path().join("users.json")))).await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_logout_succeeds_once() -> Result<()> {
    let service = Arc::new(AuthService::new(
        Arc::new(MemoryCredentialStore::new()),
        SessionStore::default(),
    ));
    service
        .register(Some("Ada"), Some("Lovelace"), Some("ada"), Some("engine"))
        .await?;
    let handle = service.login("ada", "engine").await?.handle;

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let service = service.clone();
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move { service.logout(&handle).await }));
    }

    let mut ok = 0;
    for task in tasks {
        match task.await? {
            Ok(_) => ok += 1,
            Err(AuthError::NoSession) => {}
            Err(err) => return Err(err).context("unexpected logout failure"),
        }
    }
    assert_eq!(ok, 1);
    Ok(())
}

#[tokio::test]
async fn sessions_per_login_are_independent() -> Result<()> {
    let service = AuthService::new(
        Arc::new(MemoryCredentialStore::new()),
        SessionStore::default(),
    );
    service
        .register(Some("Ada"), Some("Lovelace"), Some("ada"), Some("engine"))
        .await?;

    let laptop = service.login("ada", "engine").await?;
    let phone = service.login("ada", "engine").await?;
    assert_ne!(laptop.handle, phone.handle);

    service.logout(&laptop.handle).await?;
    assert!(service.authenticate(&phone.handle).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn expired_session_is_rejected() -> Result<()> {
    let service = AuthService::new(
        Arc::new(MemoryCredentialStore::new()),
        SessionStore::new(Duration::from_millis(30)),
    );
    service
        .register(Some("Ada"), Some("Lovelace"), Some("ada"), Some("engine"))
        .await?;
    let session = service.login("ada", "engine").await?;
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert!(matches!(
        service.current_user(&session.handle, |_| None).await,
        Err(AuthError::Unauthenticated)
    ));
    assert!(matches!(
        service.logout(&session.handle).await,
        Err(AuthError::NoSession)
    ));
    Ok(())
}

#[tokio::test]
async fn forged_handle_is_rejected() {
    let service = AuthService::new(
        Arc::new(MemoryCredentialStore::new()),
        SessionStore::default(),
    );
    let forged = SessionHandle::new("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
    assert!(service.authenticate(&forged).await.is_err());
}
