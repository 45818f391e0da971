//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::sync::Arc;

use shopdesk_core::{MutationOutcome, Resource, ResourceView, Snapshot};

use crate::error::{self, CliError};
use crate::output;

/// Fetch the collection once and return the resulting snapshot.
pub async fn load<T: Resource>(view: &ResourceView<T>) -> Result<Snapshot<T>, CliError> {
    view.refresh().await?;
    Ok(view.snapshot())
}

/// Resolve an identifier to an item: exact id first, then `alt` (email,
/// code, name...) against the loaded snapshot.
pub fn resolve<T: Resource>(
    view: &ResourceView<T>,
    identifier: &str,
    alt: impl Fn(&T, &str) -> bool,
) -> Result<Arc<T>, CliError> {
    if let Some(item) = view.find(identifier) {
        return Ok(item);
    }
    view.snapshot()
        .iter()
        .find(|item| alt(item, identifier))
        .cloned()
        .ok_or_else(|| CliError::NotFound {
            resource_type: T::KIND.into(),
            identifier: identifier.into(),
            list_command: error::list_command(T::KIND),
        })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Report how a mutation settled.
pub fn report<T>(outcome: &MutationOutcome<T>, done: &str, quiet: bool) {
    match outcome {
        MutationOutcome::Committed(_) => output::notice(done, quiet),
        MutationOutcome::Discarded => output::notice(
            "The list was reloaded while the change was in flight; \
             the next refresh will show the final state",
            quiet,
        ),
    }
}

pub fn money(amount: f64) -> String {
    format!("{amount:.2}")
}
