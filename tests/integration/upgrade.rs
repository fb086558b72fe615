use anyhow::Result;
use chief_cli::core::ChiefError;
use chief_cli::remote::Endpoints;
use chief_cli::upgrade::checksum::sha256_hex;
use chief_cli::upgrade::{BinaryUpdater, SelfUpdater};
use tempfile::TempDir;
use tokio::fs;

const NEW_BUILD: &[u8] = b"#!/bin/sh\necho chief v2\n";

async fn release_host(binary: &'static [u8]) -> mockito::ServerGuard {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/chief-linux-amd64")
        .with_status(200)
        .with_body(binary)
        .create_async()
        .await;
    server
}

/// The published build replaces the executable and the backup is removed.
#[tokio::test]
async fn test_self_update_end_to_end() -> Result<()> {
    let temp = TempDir::new()?;
    let exe = temp.path().join("chief");
    fs::write(&exe, b"#!/bin/sh\necho chief v1\n").await?;

    let server = release_host(NEW_BUILD).await;
    let endpoints = Endpoints::from_origin(&server.url());
    let updater = SelfUpdater::new(&exe, endpoints.cli_binary_url());

    let before = updater.current_build_id().await?;
    assert_ne!(before, sha256_hex(NEW_BUILD));

    updater.replace(&sha256_hex(NEW_BUILD)).await?;

    assert_eq!(fs::read(&exe).await?, NEW_BUILD);
    assert_eq!(updater.current_build_id().await?, sha256_hex(NEW_BUILD));
    assert!(!temp.path().join("chief.backup").exists());
    Ok(())
}

/// A download that does not match the published id never reaches disk.
#[tokio::test]
async fn test_mismatched_download_is_rejected() -> Result<()> {
    let temp = TempDir::new()?;
    let exe = temp.path().join("chief");
    fs::write(&exe, b"original").await?;

    let server = release_host(b"truncated").await;
    let updater = SelfUpdater::new(&exe, format!("{}/chief-linux-amd64", server.url()));

    let err = updater.replace(&sha256_hex(NEW_BUILD)).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ChiefError>(),
        Some(ChiefError::ChecksumMismatch { .. })
    ));
    assert_eq!(fs::read(&exe).await?, b"original");
    assert!(!temp.path().join("chief.backup").exists());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_self_update_keeps_file_mode() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new()?;
    let exe = temp.path().join("chief");
    fs::write(&exe, b"original").await?;
    fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o700)).await?;

    let server = release_host(NEW_BUILD).await;
    SelfUpdater::new(&exe, format!("{}/chief-linux-amd64", server.url()))
        .replace(&sha256_hex(NEW_BUILD))
        .await?;

    let mode = fs::metadata(&exe).await?.permissions().mode();
    assert_eq!(mode & 0o777, 0o700);
    Ok(())
}
