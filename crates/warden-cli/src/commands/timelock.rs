//! Protocol subcommands: bootstrap, reads, and the four transitions.

use anyhow::Result;
use std::fmt::Write as _;
use tracing::info;
use warden_core::{PrincipalId, TimelockDelay};

use super::{render_principal, render_records, Workspace};

/// `warden init --owner <principal>`
pub async fn init(ws: &Workspace, owner: PrincipalId) -> Result<String> {
    let view = ws.service().initialize(owner, &ws.config().timelock).await?;
    info!(
        state = %ws.config().storage.state_path.display(),
        audit = %ws.config().storage.audit_path.display(),
        "workspace initialized"
    );
    Ok(format!(
        "initialized: owner {}, default delay {}\n",
        owner, view.delay
    ))
}

/// `warden owner`
pub async fn owner(ws: &Workspace) -> Result<String> {
    Ok(format!("{}\n", ws.service().owner().await?))
}

/// `warden show`
pub async fn show(ws: &Workspace) -> Result<String> {
    let snapshot = ws.service().snapshot().await?;
    let view = snapshot.get_owner_timelock();

    let mut out = String::new();
    writeln!(out, "owner:        {}", render_principal(snapshot.owner()))?;
    writeln!(out, "candidate:    {}", render_principal(view.candidate))?;
    writeln!(out, "delay:        {} ({}s)", view.delay, view.delay.as_secs())?;
    match snapshot.pending_ready_at() {
        Some(ready_at) => writeln!(
            out,
            "requested_at: {} (pending, ready at {})",
            view.requested_at, ready_at
        )?,
        None => writeln!(out, "requested_at: {} (idle)", view.requested_at)?,
    }
    Ok(out)
}

/// `warden set-timelock --caller --candidate --delay-secs`
pub async fn set_timelock(
    ws: &Workspace,
    caller: PrincipalId,
    candidate: PrincipalId,
    delay_secs: u64,
) -> Result<String> {
    let records = ws
        .service()
        .set_owner_timelock(caller, candidate, TimelockDelay::from_secs(delay_secs))
        .await?;
    Ok(render_records(&records))
}

/// `warden init-unlock --caller`
pub async fn init_unlock(ws: &Workspace, caller: PrincipalId) -> Result<String> {
    let records = ws.service().init_owner_unlock(caller).await?;
    Ok(render_records(&records))
}

/// `warden complete-unlock --caller`
pub async fn complete_unlock(ws: &Workspace, caller: PrincipalId) -> Result<String> {
    let records = ws.service().complete_owner_unlock(caller).await?;
    Ok(render_records(&records))
}

/// `warden cancel-unlock --caller`
pub async fn cancel_unlock(ws: &Workspace, caller: PrincipalId) -> Result<String> {
    let records = ws.service().cancel_owner_unlock(caller).await?;
    Ok(render_records(&records))
}
