//! Fixtures for engine tests: a fake Steam install and a fake runtime

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use super::BackupManager;
use crate::config::EngineConfig;
use crate::copy::{NativeCopier, TransferSummary, TreeCopier};
use crate::error::{BackupError, BackupResult};
use crate::discovery::RuntimeControl;

pub const APP_ID: &str = "3241660";
pub const PROFILE_ID: &str = "123456";
pub const LABEL: &str = "REPO";

/// Runtime that is never running and counts shutdown requests
#[derive(Clone, Default)]
pub struct FakeRuntime {
    pub shutdown_requests: Arc<AtomicU32>,
}

impl RuntimeControl for FakeRuntime {
    fn request_shutdown(&self, _runtime_root: &Path) {
        self.shutdown_requests.fetch_add(1, Ordering::SeqCst);
    }

    fn is_running(&self) -> bool {
        false
    }
}

/// Copier that behaves like `NativeCopier` until its `fail_on`-th call (1-based)
pub struct FailingCopier {
    inner: NativeCopier,
    fail_on: u32,
    calls: AtomicU32,
}

impl FailingCopier {
    pub fn new(fail_on: u32) -> Self {
        Self {
            inner: NativeCopier::new(),
            fail_on,
            calls: AtomicU32::new(0),
        }
    }
}

impl TreeCopier for FailingCopier {
    fn copy_tree(&self, source: &Path, dest: &Path) -> BackupResult<Option<TransferSummary>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(BackupError::Io("No space left on device".to_string()));
        }
        self.inner.copy_tree(source, dest)
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

pub struct TestEnv {
    pub temp: TempDir,
    pub manager: BackupManager,
    pub runtime: FakeRuntime,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_copier(Box::new(NativeCopier::new()))
    }

    pub fn with_copier(copier: Box<dyn TreeCopier>) -> Self {
        let temp = TempDir::new().unwrap();
        let steam = temp.path().join("Steam");
        fs::create_dir_all(steam.join("steamapps")).unwrap();
        fs::create_dir_all(steam.join("userdata").join(PROFILE_ID)).unwrap();

        let config = EngineConfig {
            backups_root: temp.path().join("Backups"),
            home_dir: temp.path().to_path_buf(),
            label: LABEL.to_string(),
            app_name: "repo".to_string(),
            fallback_app_id: APP_ID.to_string(),
            runtime_roots: vec![steam],
            save_path: ["AppData", "LocalLow", "semiwork", "Repo"].iter().collect(),
            process_name: "steam".to_string(),
            shutdown_timeout: Duration::from_millis(50),
            shutdown_poll: Duration::from_millis(5),
        };

        let runtime = FakeRuntime::default();
        let manager = BackupManager::new(config, copier, Box::new(runtime.clone()));

        Self {
            temp,
            manager,
            runtime,
        }
    }

    pub fn steam(&self) -> PathBuf {
        self.temp.path().join("Steam")
    }

    pub fn backups_root(&self) -> PathBuf {
        self.temp.path().join("Backups")
    }

    pub fn live_compatdata(&self) -> PathBuf {
        self.steam().join("steamapps/compatdata").join(APP_ID)
    }

    pub fn live_userdata(&self) -> PathBuf {
        self.steam().join("userdata").join(PROFILE_ID).join(APP_ID)
    }

    pub fn live_user_dir(&self) -> PathBuf {
        self.live_compatdata().join("pfx/drive_c/users/steamuser")
    }

    pub fn live_saves(&self) -> PathBuf {
        self.live_user_dir().join("AppData/LocalLow/semiwork/Repo")
    }

    pub fn shutdown_requests(&self) -> u32 {
        self.runtime.shutdown_requests.load(Ordering::SeqCst)
    }

    /// Populate live compatdata, userdata and saves; returns total file bytes
    pub fn seed_live_data(&self) -> u64 {
        write_file(&self.live_compatdata().join("version.txt"), b"proton-9");
        write_file(&self.live_userdata().join("remote/settings.cfg"), b"fov=90");
        write_file(&self.live_saves().join("Saves/slot1.es3"), b"level=4;money=120");
        (b"proton-9".len() + b"fov=90".len() + b"level=4;money=120".len()) as u64
    }
}

pub fn write_file(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Names of the direct children of `dir` starting with `prefix`
pub fn children_with_prefix(dir: &Path, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .filter(|name| name.starts_with(prefix))
        .collect();
    names.sort();
    names
}
