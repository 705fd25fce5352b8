//! Integration tests for credential helper functionality
#![cfg(unix)]

use anyhow::Result;
use regcred::auth::{decode_auth, encoded_auth_with, BackendChain};
use regcred::config::{Config, Env};
use regcred::AuthError;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

fn write_helper(dir: &Path, name: &str, username: &str, secret: &str) -> Result<()> {
    let helper_path = dir.join(format!("docker-credential-{}", name));
    fs::write(
        &helper_path,
        format!(
            "#!/bin/sh\nread server\necho '{{\"Username\":\"{}\",\"Secret\":\"{}\"}}'\n",
            username, secret
        ),
    )?;

    let mut perms = fs::metadata(&helper_path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&helper_path, perms)?;
    Ok(())
}

fn env_for(config_dir: &Path) -> Env {
    Env {
        docker_config: Some(config_dir.to_path_buf()),
        ..Default::default()
    }
}

fn config_with_helpers(helper_dir: &Path) -> Config {
    Config {
        helper_dirs: vec![helper_dir.to_path_buf()],
        ..Default::default()
    }
}

#[test]
fn test_per_registry_helper() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    write_helper(tmp_dir.path(), "mock", "helper-user", "helper-pass")?;
    fs::write(
        tmp_dir.path().join("config.json"),
        r#"{"credHelpers": {"mock.registry.io": "mock"}}"#,
    )?;

    let chain = BackendChain::from_config(
        &config_with_helpers(tmp_dir.path()),
        &env_for(tmp_dir.path()),
    );

    let encoded = encoded_auth_with(&chain, "mock.registry.io/test/image")?;
    let credential = decode_auth(&encoded)?;
    assert_eq!(credential.username, "helper-user");
    assert_eq!(credential.password, "helper-pass");
    assert_eq!(credential.server_address.as_deref(), Some("mock.registry.io"));

    // Other registries fall back to the file store
    assert_eq!(encoded_auth_with(&chain, "other.registry.io/test/image")?, "");
    Ok(())
}

#[test]
fn test_global_store_wins_over_helper() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    write_helper(tmp_dir.path(), "defaultstore", "store-user", "store-pass")?;
    write_helper(tmp_dir.path(), "mock", "helper-user", "helper-pass")?;
    fs::write(
        tmp_dir.path().join("config.json"),
        r#"{
            "credsStore": "defaultstore",
            "credHelpers": {"mock.registry.io": "mock"},
            "auths": {"mock.registry.io": {"username": "file-user", "password": "file-pass"}}
        }"#,
    )?;

    let chain = BackendChain::from_config(
        &config_with_helpers(tmp_dir.path()),
        &env_for(tmp_dir.path()),
    );

    let credential = chain.resolve("mock.registry.io/test/image")?.unwrap();
    assert_eq!(credential.username, "store-user");
    assert_eq!(credential.password, "store-pass");
    Ok(())
}

#[test]
fn test_missing_helper_is_an_error() -> Result<()> {
    let tmp_dir = TempDir::new()?;
    fs::write(
        tmp_dir.path().join("config.json"),
        r#"{"credsStore": "not-installed"}"#,
    )?;

    let env = Env {
        path: Some(tmp_dir.path().as_os_str().to_owned()),
        ..env_for(tmp_dir.path())
    };
    let chain = BackendChain::from_config(&Config::default(), &env);

    let err = chain.resolve("any.registry.io/image").unwrap_err();
    match err {
        AuthError::StoreLookup { helper, .. } => {
            assert_eq!(helper, "docker-credential-not-installed")
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}
