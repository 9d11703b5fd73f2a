//! App id lookup through Steam's `appmanifest_<id>.acf` files

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{first_found, Probe, ProbeFn};

/// Lower-case and drop everything that is not alphanumeric
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Extract the value of a `"name"  "<value>"` line from a manifest
pub fn parse_manifest_name(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("\"name\"")?;
    let rest = rest.trim_start().strip_prefix('"')?;
    let end = rest.rfind('"')?;
    Some(&rest[..end])
}

/// App id encoded in a manifest filename
pub fn app_id_from_manifest(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let id = file_name.strip_prefix("appmanifest_")?.strip_suffix(".acf")?;
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Manifest files under `<root>/steamapps`, sorted for a stable match order
fn manifest_files(runtime_root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(runtime_root.join("steamapps")) else {
        return Vec::new();
    };

    let mut manifests: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| app_id_from_manifest(path).is_some())
        .collect();
    manifests.sort();
    manifests
}

/// Does the manifest declare a name matching `wanted` (already normalized)?
fn manifest_matches(path: &Path, wanted: &str) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };

    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| parse_manifest_name(&line).map(normalize_name))
        .any(|name| name == wanted || name.contains(wanted))
}

/// Find the app id whose manifest name fuzzily matches `wanted_name`
pub fn find_app_id_fuzzy(runtime_root: &Path, wanted_name: &str) -> Option<String> {
    let wanted = normalize_name(wanted_name);
    manifest_files(runtime_root)
        .into_iter()
        .find(|path| manifest_matches(path, &wanted))
        .and_then(|path| app_id_from_manifest(&path))
}

/// Resolve the game's app id, falling back to `fallback_id`. Never fails.
pub fn resolve_app_id(runtime_root: &Path, wanted_name: &str, fallback_id: &str) -> String {
    let probes: Vec<ProbeFn<'_, String>> = vec![
        Box::new(|| Probe::from_option(find_app_id_fuzzy(runtime_root, wanted_name))),
        Box::new(|| Probe::Found(fallback_id.to_string())),
    ];

    let app_id = first_found(&probes).unwrap_or_else(|| fallback_id.to_string());
    debug!(app_id = %app_id, wanted = wanted_name, "Resolved app id");
    app_id
}
