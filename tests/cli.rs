use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Sandbox {
    temp: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Backups")).unwrap();
        Self { temp }
    }

    fn backups(&self) -> std::path::PathBuf {
        self.temp.path().join("Backups")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("repo-backup").unwrap();
        cmd.env("HOME", self.temp.path())
            .env("REPO_BACKUP_CONFIG_DIR", self.temp.path().join("cfg"))
            .env("REPO_BACKUP_ROOT", self.backups())
            .env_remove("RUST_LOG");
        cmd
    }

    fn make_backup(&self, name: &str, bytes: usize) {
        write(&self.backups().join(name).join("compatdata/3241660/data.bin"), bytes);
    }
}

fn write(path: &Path, bytes: usize) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, vec![0u8; bytes]).unwrap();
}

#[test]
fn list_without_backups() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No backups found"));
}

#[test]
fn list_shows_newest_first() {
    let sandbox = Sandbox::new();
    sandbox.make_backup("REPO-20250101-1200", 10);
    sandbox.make_backup("REPO-20250301-1200", 2048);

    let output = sandbox.cmd().arg("list").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let newer = stdout.find("REPO-20250301-1200").unwrap();
    let older = stdout.find("REPO-20250101-1200").unwrap();
    assert!(newer < older);
    assert!(stdout.contains("2.0 KiB"));
    assert!(stdout.contains("Total: 2 backup(s)"));
}

#[test]
fn list_as_json() {
    let sandbox = Sandbox::new();
    sandbox.make_backup("REPO-20250101-1200", 10);

    let output = sandbox.cmd().args(["list", "--json"]).output().unwrap();
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(entries[0]["name"], "REPO-20250101-1200");
    assert_eq!(entries[0]["size_bytes"], 10);
}

#[test]
fn info_defaults_to_latest() {
    let sandbox = Sandbox::new();
    sandbox.make_backup("REPO-20250101-1200", 10);
    sandbox.make_backup("REPO-20250301-1200", 10);

    sandbox
        .cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("REPO-20250301-1200"))
        .stdout(predicate::str::contains("App ID: 3241660"));
}

#[test]
fn rename_and_delete() {
    let sandbox = Sandbox::new();
    sandbox.make_backup("REPO-20250101-1200", 10);

    sandbox
        .cmd()
        .args(["rename", "REPO-20250101-1200", "REPO-before-boss"])
        .assert()
        .success();
    assert!(sandbox.backups().join("REPO-before-boss").is_dir());

    sandbox
        .cmd()
        .args(["delete", "REPO-before-boss", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted REPO-before-boss"));
    assert!(!sandbox.backups().join("REPO-before-boss").exists());
}

#[test]
fn delete_without_force_keeps_backup() {
    let sandbox = Sandbox::new();
    sandbox.make_backup("REPO-20250101-1200", 10);

    sandbox
        .cmd()
        .args(["delete", "REPO-20250101-1200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert!(sandbox.backups().join("REPO-20250101-1200").is_dir());
}

#[test]
fn delete_rejects_traversal() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.temp.path().join("precious")).unwrap();

    sandbox
        .cmd()
        .args(["delete", "../precious", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path violation"));
    assert!(sandbox.temp.path().join("precious").is_dir());
}

#[test]
fn rename_onto_existing_fails() {
    let sandbox = Sandbox::new();
    sandbox.make_backup("REPO-a", 10);
    sandbox.make_backup("REPO-b", 10);

    sandbox
        .cmd()
        .args(["rename", "REPO-a", "REPO-b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert!(sandbox.backups().join("REPO-a").is_dir());
}

#[test]
fn restore_without_force_only_previews() {
    let sandbox = Sandbox::new();
    sandbox.make_backup("REPO-20250101-1200", 10);

    sandbox
        .cmd()
        .args(["restore", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("REPO-20250101-1200"));
}

#[test]
fn size_sums_all_backups() {
    let sandbox = Sandbox::new();
    sandbox.make_backup("REPO-20250101-1200", 512);
    sandbox.make_backup("REPO-20250102-1200", 1024);
    sandbox.make_backup("OTHER-20250102-1200", 4096);

    sandbox
        .cmd()
        .arg("size")
        .assert()
        .success()
        .stdout(predicate::str::contains("1.5 KiB (1536 bytes)"));
}

#[test]
fn label_flag_selects_other_backups() {
    let sandbox = Sandbox::new();
    sandbox.make_backup("OTHER-20250102-1200", 10);

    sandbox
        .cmd()
        .args(["--label", "OTHER", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OTHER-20250102-1200"));
}

#[test]
fn config_init_writes_settings() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Label:       REPO"));
    assert!(sandbox.temp.path().join("cfg/config.json").is_file());
}
