//! `warden history`

use anyhow::Result;
use std::fmt::Write as _;
use warden_timelock::RequestOutcome;

use super::{render_principal, Workspace};

pub async fn history(ws: &Workspace, json: bool) -> Result<String> {
    let history = ws.service().history().await?;
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&history)?));
    }

    let mut out = String::new();
    writeln!(out, "ownership changes:")?;
    for change in &history.ownership_changes {
        writeln!(
            out,
            "  #{} @{} {} -> {}",
            change.sequence,
            change.at,
            render_principal(change.previous_owner),
            change.new_owner
        )?;
    }

    writeln!(out, "unlock requests:")?;
    if history.requests.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for request in &history.requests {
        let outcome = match request.outcome {
            RequestOutcome::Pending => match request.ready_at() {
                Some(ready_at) => format!("pending, ready at {ready_at}"),
                None => "pending".to_string(),
            },
            RequestOutcome::Completed { sequence, at } => format!("completed #{sequence} @{at}"),
            RequestOutcome::Canceled { sequence, at } => format!("canceled #{sequence} @{at}"),
            RequestOutcome::Superseded { sequence, at } => {
                format!("superseded by reconfiguration #{sequence} @{at}")
            }
            RequestOutcome::Reinitiated { sequence, at } => {
                format!("restarted #{sequence} @{at}")
            }
        };
        writeln!(
            out,
            "  #{} @{} {}: {}",
            request.initiated_sequence, request.initiated_at, request.candidate, outcome
        )?;
    }
    Ok(out)
}
