//! Profile id resolution under `<root>/userdata`

use std::fs;
use std::path::Path;

use tracing::debug;

use super::{first_found, Probe, ProbeFn};
use crate::error::{BackupError, BackupResult};

/// Directory names under `<root>/userdata`, sorted for a stable probe order
fn profile_dirs(runtime_root: &Path) -> BackupResult<Vec<String>> {
    let userdata = runtime_root.join("userdata");
    let entries = fs::read_dir(&userdata).map_err(|e| {
        BackupError::profile_not_found(format!("{} unreadable: {}", userdata.display(), e))
    })?;

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    Ok(names)
}

/// First profile that holds data for `app_id`
pub fn resolve_profile_id(runtime_root: &Path, app_id: &str) -> BackupResult<String> {
    let userdata = runtime_root.join("userdata");
    profile_dirs(runtime_root)?
        .into_iter()
        .find(|name| userdata.join(name).join(app_id).exists())
        .ok_or_else(|| BackupError::profile_not_found(format!("no profile holds app {}", app_id)))
}

/// First purely numeric profile directory
pub fn resolve_any_profile_id(runtime_root: &Path) -> BackupResult<String> {
    profile_dirs(runtime_root)?
        .into_iter()
        .find(|name| !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()))
        .ok_or_else(|| BackupError::profile_not_found("no numeric profile directory"))
}

/// Profile holding the app's data, else any numeric profile
pub fn resolve_profile_chain(runtime_root: &Path, app_id: &str) -> BackupResult<String> {
    let probes: Vec<ProbeFn<'_, String>> = vec![
        Box::new(|| Probe::from_option(resolve_profile_id(runtime_root, app_id).ok())),
        Box::new(|| Probe::from_option(resolve_any_profile_id(runtime_root).ok())),
    ];

    let profile_id = first_found(&probes).ok_or_else(|| {
        BackupError::profile_not_found(format!(
            "no profile under {}",
            runtime_root.join("userdata").display()
        ))
    })?;
    debug!(profile_id = %profile_id, "Resolved profile id");
    Ok(profile_id)
}
