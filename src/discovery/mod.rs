//! Environment discovery
//!
//! Locates the Steam install, the game's app id and the active profile. None of
//! these are fixed on disk, so every lookup is an ordered list of probes tried
//! until one finds something.
//!
//! - `runtime`: install root detection and Steam shutdown
//! - `app_id`: fuzzy app id lookup through the app manifests
//! - `profile`: profile (userdata) id resolution

pub mod app_id;
pub mod profile;
pub mod runtime;

use std::path::{Path, PathBuf};

pub use app_id::resolve_app_id;
pub use profile::{resolve_any_profile_id, resolve_profile_chain, resolve_profile_id};
pub use runtime::{detect_runtime_root, wait_for_quiescence, RuntimeControl, SteamRuntime};

/// Outcome of a single discovery probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    Found(T),
    NotApplicable,
}

impl<T> Probe<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Probe::Found(v),
            None => Probe::NotApplicable,
        }
    }
}

/// A boxed probe in a fallback chain
pub type ProbeFn<'a, T> = Box<dyn Fn() -> Probe<T> + 'a>;

/// Run probes in order and return the first `Found` value
pub fn first_found<T>(probes: &[ProbeFn<'_, T>]) -> Option<T> {
    probes.iter().find_map(|probe| match probe() {
        Probe::Found(value) => Some(value),
        Probe::NotApplicable => None,
    })
}

/// Everything discovered about the live environment for one operation
#[derive(Debug, Clone)]
pub struct Environment {
    pub runtime_root: PathBuf,
    pub app_id: String,
    pub profile_id: String,
}

impl Environment {
    /// Live compatdata tree of the game
    pub fn compatdata_dir(&self) -> PathBuf {
        compatdata_dir(&self.runtime_root, &self.app_id)
    }

    /// Live per-profile userdata tree of the game
    pub fn userdata_dir(&self) -> PathBuf {
        self.runtime_root
            .join("userdata")
            .join(&self.profile_id)
            .join(&self.app_id)
    }
}

/// `<root>/steamapps/compatdata/<app_id>`
pub fn compatdata_dir(runtime_root: &Path, app_id: &str) -> PathBuf {
    runtime_root.join("steamapps").join("compatdata").join(app_id)
}
