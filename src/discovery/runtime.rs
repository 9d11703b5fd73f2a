//! Steam install detection and shutdown
//!
//! Shutdown is best-effort: the request is fire-and-forget and the wait gives
//! up silently once the timeout elapses.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{first_found, Probe, ProbeFn};

/// Control over the external launcher process
pub trait RuntimeControl {
    /// Ask the runtime to exit. Must not block or fail.
    fn request_shutdown(&self, runtime_root: &Path);

    /// Whether the runtime is still running
    fn is_running(&self) -> bool;
}

/// First candidate that contains `steamapps`, else the first candidate
pub fn detect_runtime_root(candidates: &[PathBuf]) -> PathBuf {
    let mut probes: Vec<ProbeFn<'_, PathBuf>> = Vec::with_capacity(candidates.len() + 1);
    for candidate in candidates {
        probes.push(Box::new(move || {
            if candidate.join("steamapps").is_dir() {
                Probe::Found(candidate.clone())
            } else {
                Probe::NotApplicable
            }
        }));
    }
    probes.push(Box::new(|| Probe::from_option(candidates.first().cloned())));

    let root = first_found(&probes).unwrap_or_default();
    debug!(root = %root.display(), "Detected Steam root");
    root
}

/// Ask the runtime to shut down, then poll until it exits or `timeout` passes
///
/// Returns whether the runtime was seen to stop.
pub fn wait_for_quiescence(
    runtime: &dyn RuntimeControl,
    runtime_root: &Path,
    poll: Duration,
    timeout: Duration,
) -> bool {
    runtime.request_shutdown(runtime_root);

    let deadline = Instant::now() + timeout;
    loop {
        if !runtime.is_running() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            warn!(timeout_ms = timeout.as_millis() as u64, "Steam still running, continuing anyway");
            return false;
        }
        thread::sleep(poll.min(deadline - now));
    }
}

/// The real Steam client
#[derive(Debug, Clone)]
pub struct SteamRuntime {
    process_name: String,
}

impl SteamRuntime {
    pub fn new(process_name: impl Into<String>) -> Self {
        Self {
            process_name: process_name.into(),
        }
    }

    /// Shutdown scripts shipped inside the install root
    fn shutdown_scripts(runtime_root: &Path) -> [PathBuf; 2] {
        [
            runtime_root.join("steam.sh"),
            runtime_root.join("ubuntu12_32").join("steam"),
        ]
    }

    fn spawn_detached(program: &Path) {
        let result = Command::new(program)
            .arg("-shutdown")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match result {
            Ok(_) => info!(program = %program.display(), "Requested Steam shutdown"),
            Err(e) => debug!(program = %program.display(), error = %e, "Shutdown request failed"),
        }
    }
}

impl RuntimeControl for SteamRuntime {
    fn request_shutdown(&self, runtime_root: &Path) {
        if let Ok(steam) = which::which(&self.process_name) {
            Self::spawn_detached(&steam);
        }
        for script in Self::shutdown_scripts(runtime_root) {
            if script.is_file() {
                Self::spawn_detached(&script);
            }
        }
    }

    fn is_running(&self) -> bool {
        let Ok(pgrep) = which::which("pgrep") else {
            debug!("pgrep not available, assuming Steam is not running");
            return false;
        };
        Command::new(pgrep)
            .arg("-x")
            .arg(&self.process_name)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}
