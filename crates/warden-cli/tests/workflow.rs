//! Drive the CLI handlers against a temporary workspace.

use assert_matches::assert_matches;
use std::path::Path;
use warden_cli::commands::{history, timelock};
use warden_cli::{CliConfig, HostClock, Workspace};
use warden_core::{PrincipalId, TimelockDelay};
use warden_timelock::TimelockError;

const T0: u64 = 1_700_000_000;

fn workspace(dir: &Path, at: u64) -> Workspace {
    let config = CliConfig::load(&dir.join("config.toml")).unwrap();
    Workspace::open(config, HostClock::from_override(Some(at)))
}

fn rejection(err: anyhow::Error) -> TimelockError {
    err.downcast::<TimelockError>().unwrap()
}

#[tokio::test]
async fn scripted_transfer_across_invocations() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[timelock]\ndefault_delay_secs = 3600\n",
    )
    .unwrap();
    let a = PrincipalId::from_label("ops-a");
    let b = PrincipalId::from_label("ops-b");

    let out = timelock::init(&workspace(dir.path(), T0), a).await.unwrap();
    assert!(out.contains("default delay 3600s"));

    let out = timelock::set_timelock(&workspace(dir.path(), T0), a, b, 100)
        .await
        .unwrap();
    assert!(out.contains("TimelockConfigured"));

    let out = timelock::init_unlock(&workspace(dir.path(), T0 + 1), b)
        .await
        .unwrap();
    assert!(out.contains(&format!("TimelockInitiated({b})")));

    let show = timelock::show(&workspace(dir.path(), T0 + 1)).await.unwrap();
    assert!(show.contains("pending"));

    let err = timelock::complete_unlock(&workspace(dir.path(), T0 + 100), b)
        .await
        .unwrap_err();
    assert_matches!(rejection(err), TimelockError::TooEarly { .. });

    timelock::complete_unlock(&workspace(dir.path(), T0 + 101), b)
        .await
        .unwrap();
    let owner = timelock::owner(&workspace(dir.path(), T0 + 101)).await.unwrap();
    assert_eq!(owner.trim(), b.to_string());

    let text = history::history(&workspace(dir.path(), T0 + 200), false)
        .await
        .unwrap();
    assert!(text.contains("completed #3"));
}

#[tokio::test]
async fn rejection_carries_stable_reason() {
    let dir = tempfile::tempdir().unwrap();
    let a = PrincipalId::from_label("ops-a");
    let stranger = PrincipalId::from_label("ops-c");
    let ws = workspace(dir.path(), T0);
    timelock::init(&ws, a).await.unwrap();

    let err = rejection(timelock::cancel_unlock(&ws, stranger).await.unwrap_err());
    assert_eq!(err.to_string(), "restricted to owner");
    assert_eq!(err.code(), "NOT_AUTHORIZED");

    let err = rejection(timelock::init_unlock(&ws, stranger).await.unwrap_err());
    assert_eq!(err.to_string(), "Address denied");
}

#[tokio::test]
async fn defaults_apply_without_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let ws = workspace(dir.path(), T0);
    timelock::init(&ws, PrincipalId::from_label("ops-a"))
        .await
        .unwrap();

    let view = ws.service().get_owner_timelock().await.unwrap();
    assert_eq!(view.delay, TimelockDelay::from_days(365));
    assert!(dir.path().join("state.json").exists());
    assert!(dir.path().join("audit.jsonl").exists());

    let json = history::history(&ws, true).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["records_applied"], 1);
}

#[tokio::test]
async fn commands_before_init_fail() {
    let dir = tempfile::tempdir().unwrap();
    let err = timelock::owner(&workspace(dir.path(), T0)).await.unwrap_err();
    assert_matches!(rejection(err), TimelockError::Store(_));
}
