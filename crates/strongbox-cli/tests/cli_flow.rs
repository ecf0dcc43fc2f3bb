use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const EMAIL: &str = "alice@example.com";
const MASTER: &str = "test-master-password-123";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_strongbox"))
}

struct Env {
    root: TempDir,
}

impl Env {
    fn new() -> Self {
        let root = TempDir::new().expect("temp dir");
        std::fs::create_dir_all(root.path().join("config")).expect("config dir");
        std::fs::create_dir_all(root.path().join("data")).expect("data dir");
        Self { root }
    }

    fn config_home(&self) -> PathBuf {
        self.root.path().join("config")
    }

    fn data_home(&self) -> PathBuf {
        self.root.path().join("data")
    }

    fn vault_file(&self) -> PathBuf {
        self.data_home().join("strongbox").join("vault.json")
    }

    fn command(&self, password: &str, args: &[&str]) -> Command {
        let mut cmd = Command::new(bin());
        cmd.args(args)
            .env_clear()
            .env("HOME", self.root.path())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_DATA_HOME", self.data_home())
            .env("STRONGBOX_EMAIL", EMAIL)
            .env("STRONGBOX_MASTER_PASSWORD", password)
            .stdin(Stdio::null());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(MASTER, args).output().expect("run strongbox")
    }

    fn run_with_password(&self, password: &str, args: &[&str]) -> Output {
        self.command(password, args).output().expect("run strongbox")
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(MASTER, args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn strongbox");
        child
            .stdin
            .take()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("write stdin");
        child.wait_with_output().expect("wait strongbox")
    }

    fn init(&self) {
        let output = self.run(&["init"]);
        assert_success(&output);
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed\nstdout: {}\nstderr: {}",
        stdout(output),
        stderr(output)
    );
}

fn read_file(path: &Path) -> String {
    std::fs::read_to_string(path).expect("read file")
}

#[test]
fn test_init_writes_vault_and_config() {
    let env = Env::new();
    let output = env.run(&["init"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Initialized vault for alice@example.com"));

    let config = read_file(&env.config_home().join("strongbox").join("config.toml"));
    assert!(config.contains(EMAIL));
    assert!(config.contains("vault.json"));

    let vault = read_file(&env.vault_file());
    assert!(vault.contains("\"format_version\""));
    assert!(vault.contains(EMAIL));
    assert!(!vault.contains(MASTER));
    assert!(env.data_home().join("strongbox").join("identity-cache.json").exists());
}

#[test]
fn test_init_twice_is_rejected() {
    let env = Env::new();
    env.init();
    let output = env.run(&["init"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("already exists"));
}

#[test]
fn test_init_rejects_short_master_password() {
    let env = Env::new();
    let output = env.run_with_password("short", &["init"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(!env.vault_file().exists());
}

#[test]
fn test_add_list_show_round_trip() {
    let env = Env::new();
    env.init();

    let added = env.run_with_stdin(
        &["add", "GitHub", "--username", "alice", "--password-stdin"],
        "gh-Secret-Pass-1\n",
    );
    assert_success(&added);
    assert!(stdout(&added).contains("Added record"));

    let generated = env.run(&["-q", "add", "Mail", "--generate", "--favorite"]);
    assert_success(&generated);
    let mail_id = stdout(&generated).trim().to_string();
    assert_eq!(mail_id.len(), 36);

    let on_disk = read_file(&env.vault_file());
    assert!(!on_disk.contains("gh-Secret-Pass-1"));
    assert!(!on_disk.contains("GitHub"));

    let listed = env.run(&["list", "--json"]);
    assert_success(&listed);
    let records: serde_json::Value = serde_json::from_str(&stdout(&listed)).expect("json");
    let records = records.as_array().expect("array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "GitHub");
    assert_eq!(records[1]["name"], "Mail");
    assert_eq!(records[1]["favorite"], true);
    assert!(!stdout(&listed).contains("gh-Secret-Pass-1"));

    let favorites = env.run(&["list", "--favorites", "--json"]);
    let favorites: serde_json::Value = serde_json::from_str(&stdout(&favorites)).expect("json");
    assert_eq!(favorites.as_array().map(Vec::len), Some(1));

    let github_id = records[0]["id"].as_str().expect("id").to_string();
    let shown = env.run(&["show", &github_id[..23], "--json"]);
    assert_success(&shown);
    let record: serde_json::Value = serde_json::from_str(&stdout(&shown)).expect("json");
    assert_eq!(record["password"], "gh-Secret-Pass-1");
    assert_eq!(record["username"], "alice");

    let masked = env.run(&["show", &github_id]);
    assert_success(&masked);
    assert!(!stdout(&masked).contains("gh-Secret-Pass-1"));
    assert!(stdout(&masked).contains("********"));
}

#[test]
fn test_edit_favorite_delete() {
    let env = Env::new();
    env.init();
    let added = env.run(&["-q", "add", "Bank", "--generate"]);
    assert_success(&added);
    let id = stdout(&added).trim().to_string();

    assert_success(&env.run_with_stdin(
        &["edit", &id, "--password-stdin", "--category", "other"],
        "n3w-Bank-Pass!\n",
    ));
    assert_success(&env.run(&["favorite", &id]));

    let shown = env.run(&["show", &id, "--json"]);
    let record: serde_json::Value = serde_json::from_str(&stdout(&shown)).expect("json");
    assert_eq!(record["password"], "n3w-Bank-Pass!");
    assert_eq!(record["category"], "other");
    assert_eq!(record["favorite"], true);

    let refused = env.run(&["delete", &id]);
    assert_eq!(refused.status.code(), Some(4));

    assert_success(&env.run(&["delete", &id, "--yes"]));
    let missing = env.run(&["show", &id]);
    assert_eq!(missing.status.code(), Some(3));
}

#[test]
fn test_wrong_master_password_is_generic() {
    let env = Env::new();
    env.init();
    let output = env.run_with_password("not-the-password", &["list"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("Invalid master password"));
}

#[test]
fn test_missing_vault_is_not_found() {
    let env = Env::new();
    let output = env.run(&["list"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("No vault found"));
}

#[test]
fn test_audit_json() {
    let env = Env::new();
    env.init();
    for name in ["One", "Two"] {
        assert_success(&env.run_with_stdin(
            &["add", name, "--password-stdin"],
            "Shared-Pass-2024!\n",
        ));
    }
    assert_success(&env.run_with_stdin(&["add", "Weak", "--password-stdin"], "abc\n"));

    let output = env.run(&["audit", "--json"]);
    assert_success(&output);
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(report["total_passwords"], 3);
    assert_eq!(report["reused_passwords"], 2);
    assert_eq!(report["weak_passwords"], 1);
    assert!(report["score"].as_u64().expect("score") < 100);
    let kinds: Vec<&str> = report["issues"]
        .as_array()
        .expect("issues")
        .iter()
        .filter_map(|issue| issue["kind"].as_str())
        .collect();
    assert!(kinds.contains(&"weak_password"));
    assert!(kinds.contains(&"reused_password"));
}

#[test]
fn test_generate_needs_no_vault() {
    let env = Env::new();
    let output = env.run(&["generate", "--length", "32", "--no-symbols"]);
    assert_success(&output);
    let password = stdout(&output).trim().to_string();
    assert_eq!(password.chars().count(), 32);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));

    let invalid = env.run(&["generate", "--length", "4"]);
    assert_eq!(invalid.status.code(), Some(4));
}

#[test]
fn test_shell_lock_blocks_commands() {
    let env = Env::new();
    env.init();
    let output = env.run_with_stdin(
        &["shell"],
        "add \"Wifi Note\" --category secure_note --notes 'router in hall'\nlist\nlock\nlist\nexit\n",
    );
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("Added record"));
    assert!(out.contains("Wifi Note"));
    assert!(out.contains("Vault locked."));
    assert!(stderr(&output).contains("Vault is locked"));
}

#[test]
fn test_delete_tampered_record() {
    let env = Env::new();
    env.init();
    let added = env.run(&["-q", "add", "Broken", "--generate"]);
    assert_success(&added);
    let id = stdout(&added).trim().to_string();

    let mut document: serde_json::Value =
        serde_json::from_str(&read_file(&env.vault_file())).expect("json");
    document["records"][EMAIL][0]["ciphertext"] =
        serde_json::Value::String("Z2FyYmFnZSBjaXBoZXJ0ZXh0IGJ5dGVz".to_string());
    std::fs::write(env.vault_file(), document.to_string()).expect("write vault");

    let listed = env.run(&["list"]);
    assert_success(&listed);
    assert!(stderr(&listed).contains("could not be decrypted"));

    let deleted = env.run(&["delete", &id, "--yes"]);
    assert_success(&deleted);
    assert!(stdout(&deleted).contains("unreadable record"));
    assert_eq!(env.run(&["show", &id]).status.code(), Some(3));
}

#[test]
fn test_blank_record_id_is_invalid() {
    let env = Env::new();
    env.init();
    assert_success(&env.run(&["add", "Only", "--generate"]));

    let output = env.run(&["delete", "", "--yes"]);
    assert_eq!(output.status.code(), Some(4));
    let listed = env.run(&["list", "--json"]);
    let records: serde_json::Value = serde_json::from_str(&stdout(&listed)).expect("json");
    assert_eq!(records.as_array().map(Vec::len), Some(1));
}
