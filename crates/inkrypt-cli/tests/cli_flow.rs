use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const PIN: &str = "2468";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_inkrypt"))
}

/// Isolated XDG homes so runs never touch the real config or data.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir should be created"),
        }
    }

    fn config_home(&self) -> PathBuf {
        self.dir.path().join("c")
    }

    fn data_home(&self) -> PathBuf {
        self.dir.path().join("d")
    }

    fn journal_path(&self) -> PathBuf {
        self.data_home().join("inkrypt").join("inkrypt.db")
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn command(&self, pin: Option<&str>) -> Command {
        let mut cmd = Command::new(bin());
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_DATA_HOME", self.data_home())
            .env_remove("INKRYPT_JOURNAL")
            .env_remove("INKRYPT_CONFIG")
            .env_remove("INKRYPT_ARCHIVE_PASSWORD")
            .env_remove("INKRYPT_PIN")
            .stdin(Stdio::null());
        if let Some(pin) = pin {
            cmd.env("INKRYPT_PIN", pin);
        }
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(Some(PIN))
            .args(args)
            .output()
            .expect("command should run")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{:?} failed: stdout={}, stderr={}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    fn run_json(&self, args: &[&str]) -> serde_json::Value {
        serde_json::from_str(&self.run_ok(args)).expect("output should be json")
    }

    fn init(&self) {
        self.run_ok(&["init"]);
    }
}

fn exit_code(output: &Output) -> Option<i32> {
    output.status.code()
}

fn first_id(value: &serde_json::Value) -> i64 {
    value.as_array().expect("json array")[0]
        .get("id")
        .and_then(|v| v.as_i64())
        .expect("entry id")
}

#[test]
fn test_cli_init_add_list_show() {
    let sandbox = Sandbox::new();
    let out = sandbox.run_ok(&["init"]);
    assert!(out.contains("Initialized new journal"));
    assert!(sandbox.journal_path().exists());
    assert!(sandbox
        .config_home()
        .join("inkrypt")
        .join("config.toml")
        .exists());

    sandbox.run_ok(&["add", "First", "--body", "Hello from CLI", "--tag", "work"]);

    let list = sandbox.run_json(&["list", "--json"]);
    assert_eq!(list.as_array().expect("json array").len(), 1);
    let id = first_id(&list);

    let show = sandbox.run_ok(&["show", &id.to_string()]);
    assert!(show.contains("Title: First"));
    assert!(show.contains("Tags: work"));
    assert!(show.contains("Hello from CLI"));
}

#[test]
fn test_cli_journal_file_holds_no_plaintext() {
    let sandbox = Sandbox::new();
    sandbox.init();
    sandbox.run_ok(&["add", "Unmistakable title", "--body", "secret body text"]);

    let bytes = std::fs::read(sandbox.journal_path()).expect("journal should exist");
    for needle in [&b"Unmistakable"[..], &b"secret body"[..]] {
        assert!(!bytes.windows(needle.len()).any(|w| w == needle));
    }
}

#[test]
fn test_cli_wrong_pin_exits_auth_failed() {
    let sandbox = Sandbox::new();
    sandbox.init();

    let output = sandbox
        .command(Some("1357"))
        .arg("list")
        .output()
        .expect("command should run");
    assert_eq!(exit_code(&output), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Incorrect PIN"));
}

#[test]
fn test_cli_missing_pin_without_tty_is_invalid_input() {
    let sandbox = Sandbox::new();
    sandbox.init();

    let output = sandbox
        .command(None)
        .arg("list")
        .output()
        .expect("command should run");
    assert_eq!(exit_code(&output), Some(4));
}

#[test]
fn test_cli_commands_before_init_report_not_found() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["list"]);
    assert_eq!(exit_code(&output), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("inkrypt init"));
}

#[test]
fn test_cli_init_twice_is_rejected() {
    let sandbox = Sandbox::new();
    sandbox.init();
    let output = sandbox.run(&["init"]);
    assert_eq!(exit_code(&output), Some(4));
}

#[test]
fn test_cli_init_short_pin_leaves_setup_pending() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command(Some("12"))
        .arg("init")
        .output()
        .expect("command should run");
    assert_eq!(exit_code(&output), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least 4"));
    assert!(!sandbox.journal_path().exists());

    sandbox.init();
}

#[test]
fn test_cli_unlock_reports_counts() {
    let sandbox = Sandbox::new();
    sandbox.init();
    sandbox.run_ok(&["add", "One", "--body", ""]);

    let out = sandbox.run_ok(&["unlock"]);
    assert!(out.contains("1 entry, 0 templates"));
}

#[test]
fn test_cli_search_is_case_insensitive() {
    let sandbox = Sandbox::new();
    sandbox.init();
    sandbox.run_ok(&["add", "Morning", "--body", "Hello world"]);
    sandbox.run_ok(&["add", "Evening", "--body", "Quiet night"]);

    let hits = sandbox.run_json(&["search", "HELLO", "--json"]);
    let hits = hits.as_array().expect("json array");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["title"], "Morning");

    let blank = sandbox.run_json(&["search", "   ", "--json"]);
    assert!(blank.as_array().expect("json array").is_empty());
}

#[test]
fn test_cli_edit_and_delete() {
    let sandbox = Sandbox::new();
    sandbox.init();
    sandbox.run_ok(&["add", "Draft", "--body", "v1", "--tag", "a"]);
    let id = first_id(&sandbox.run_json(&["list", "--json"])).to_string();

    sandbox.run_ok(&["edit", &id, "--title", "Final", "--body", "v2", "--clear-tags"]);
    let entry = sandbox.run_json(&["show", &id, "--json"]);
    assert_eq!(entry["title"], "Final");
    assert_eq!(entry["content"], "v2");
    assert!(entry["tags"].as_array().expect("tags").is_empty());

    let nothing = sandbox.run(&["edit", &id]);
    assert_eq!(exit_code(&nothing), Some(4));

    sandbox.run_ok(&["delete", &id]);
    assert_eq!(exit_code(&sandbox.run(&["show", &id])), Some(3));
    assert_eq!(exit_code(&sandbox.run(&["delete", &id])), Some(3));
}

#[test]
fn test_cli_templates() {
    let sandbox = Sandbox::new();
    sandbox.init();
    sandbox.run_ok(&["template", "add", "Weekly", "--body", "Wins:"]);
    sandbox.run_ok(&["template", "add", "Daily", "--body", "Mood:"]);

    let templates = sandbox.run_json(&["template", "list", "--json"]);
    let templates = templates.as_array().expect("json array");
    let names: Vec<_> = templates
        .iter()
        .map(|t| t["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Daily", "Weekly"]);
    let daily = templates[0]["id"].as_i64().expect("id").to_string();

    sandbox.run_ok(&["add", "Today", "--template", &daily]);
    let entry = sandbox.run_json(&["list", "--json"]);
    assert_eq!(entry[0]["content"], "Mood:");
    assert_eq!(entry[0]["template_id"].as_i64(), daily.parse().ok());

    assert!(sandbox
        .run_ok(&["template", "show", &daily])
        .contains("Mood:"));
    sandbox.run_ok(&["template", "delete", &daily]);
    assert_eq!(
        exit_code(&sandbox.run(&["template", "show", &daily])),
        Some(3)
    );
    assert_eq!(
        exit_code(&sandbox.run(&["add", "Again", "--template", &daily])),
        Some(3)
    );
}

#[test]
fn test_cli_markdown_export_import() {
    let sandbox = Sandbox::new();
    sandbox.init();
    sandbox.run_ok(&["add", "Test Entry 1", "--body", "Content 1"]);
    sandbox.run_ok(&["add", "Test Entry 2", "--body", "Content 2"]);

    let dest = sandbox.path("journal.md");
    let dest_arg = dest.to_string_lossy().to_string();
    sandbox.run_ok(&["export", "markdown", "--output", &dest_arg]);
    let text = std::fs::read_to_string(&dest).expect("export should exist");
    assert!(text.starts_with("# Inkrypt Export\n\nExported: "));
    assert!(text.contains("## Test Entry 1"));

    let out = sandbox.run_ok(&["import", "markdown", &dest_arg]);
    assert!(out.contains("Imported 2 entries"));
    let list = sandbox.run_json(&["list", "--json"]);
    assert_eq!(list.as_array().expect("json array").len(), 4);

    let missing = sandbox.run(&["import", "markdown", "/definitely/not/here.md"]);
    assert_eq!(exit_code(&missing), Some(3));
}

#[test]
fn test_cli_default_export_lands_in_export_dir() {
    let sandbox = Sandbox::new();
    sandbox.init();
    sandbox.run_ok(&["add", "Entry", "--body", "x"]);

    let written = sandbox.run_ok(&["--quiet", "export", "markdown"]);
    let written = PathBuf::from(written.trim());
    assert!(written.exists());
    assert_eq!(
        written.parent(),
        Some(sandbox.data_home().join("inkrypt").join("exports").as_path())
    );
}

#[test]
fn test_cli_archive_round_trip_across_reset() {
    let sandbox = Sandbox::new();
    sandbox.init();
    sandbox.run_ok(&["add", "Test Entry 1", "--body", "Content 1"]);
    sandbox.run_ok(&["add", "Test Entry 2", "--body", "Content 2\nline two"]);

    let archive = sandbox.path("bundle.zip");
    let archive_arg = archive.to_string_lossy().to_string();
    let export = sandbox
        .command(Some(PIN))
        .args(["export", "archive", "--output", &archive_arg])
        .env("INKRYPT_ARCHIVE_PASSWORD", "testpassword")
        .output()
        .expect("command should run");
    assert!(export.status.success());
    assert!(archive.exists());

    sandbox.run_ok(&["reset", "--yes"]);
    assert!(!sandbox.journal_path().exists());
    sandbox.init();

    let wrong = sandbox
        .command(Some(PIN))
        .args(["import", "archive", &archive_arg])
        .env("INKRYPT_ARCHIVE_PASSWORD", "wrongpassword")
        .output()
        .expect("command should run");
    assert_eq!(exit_code(&wrong), Some(6));
    assert!(sandbox
        .run_json(&["list", "--json"])
        .as_array()
        .expect("json array")
        .is_empty());

    let import = sandbox
        .command(Some(PIN))
        .args(["import", "archive", &archive_arg])
        .env("INKRYPT_ARCHIVE_PASSWORD", "testpassword")
        .output()
        .expect("command should run");
    assert!(import.status.success());
    assert!(String::from_utf8_lossy(&import.stdout).contains("Imported 2 entries"));

    let list = sandbox.run_json(&["list", "--json"]);
    let list = list.as_array().expect("json array");
    assert!(list
        .iter()
        .any(|e| e["title"] == "Test Entry 2" && e["content"] == "Content 2\nline two"));

    let missing = sandbox
        .command(Some(PIN))
        .args(["import", "archive", "/definitely/not/here.zip"])
        .env("INKRYPT_ARCHIVE_PASSWORD", "testpassword")
        .output()
        .expect("command should run");
    assert_eq!(exit_code(&missing), Some(3));
}

#[test]
fn test_cli_archive_export_without_password_rejected() {
    let sandbox = Sandbox::new();
    sandbox.init();
    let archive = sandbox.path("bundle.zip");

    let output = sandbox
        .command(Some(PIN))
        .args(["export", "archive", "--output"])
        .arg(&archive)
        .output()
        .expect("command should run");
    assert_eq!(exit_code(&output), Some(4));
    assert!(!archive.exists());
}

#[test]
fn test_cli_reset_requires_confirmation() {
    let sandbox = Sandbox::new();
    sandbox.init();

    let output = sandbox.run(&["reset"]);
    assert_eq!(exit_code(&output), Some(4));
    assert!(sandbox.journal_path().exists());

    // Reset needs no PIN.
    let output = sandbox
        .command(None)
        .args(["reset", "--yes"])
        .output()
        .expect("command should run");
    assert!(output.status.success());
    assert!(!sandbox.journal_path().exists());
    assert_eq!(exit_code(&sandbox.run(&["list"])), Some(3));
}

#[test]
fn test_cli_attachments_are_encrypted_and_extractable() {
    let sandbox = Sandbox::new();
    sandbox.init();

    let image = sandbox.path("photo.png");
    let payload = b"\x89PNG not really an image";
    std::fs::write(&image, payload).expect("write should succeed");

    let image_arg = image.to_string_lossy().to_string();
    sandbox.run_ok(&[
        "add",
        "With photo",
        "--body",
        "see attached",
        "--image",
        &image_arg,
    ]);
    let list = sandbox.run_json(&["list", "--json"]);
    let id = first_id(&list).to_string();
    let stored = PathBuf::from(list[0]["media_paths"][0].as_str().expect("media path"));
    assert!(stored.starts_with(sandbox.data_home().join("inkrypt").join("media")));
    let on_disk = std::fs::read(&stored).expect("vault file should exist");
    assert!(!on_disk.windows(4).any(|w| w == b"PNG "));

    let extract = sandbox.path("out");
    let extract_arg = extract.to_string_lossy().to_string();
    sandbox.run_ok(&["show", &id, "--extract-media", &extract_arg]);
    let extracted = extracted_file(&extract);
    assert_eq!(std::fs::read(extracted).expect("read"), payload);

    sandbox.run_ok(&["delete", &id]);
    assert!(!stored.exists());
}

fn extracted_file(dir: &Path) -> PathBuf {
    std::fs::read_dir(dir)
        .expect("extract dir should exist")
        .next()
        .expect("one file should be extracted")
        .expect("dir entry")
        .path()
}

#[test]
fn test_cli_journal_override() {
    let sandbox = Sandbox::new();
    let custom = sandbox.path("elsewhere").join("mine.db");
    let custom_arg = custom.to_string_lossy().to_string();

    sandbox.run_ok(&["--journal", &custom_arg, "init"]);
    assert!(custom.exists());
    assert!(sandbox.path("elsewhere").join("mine.settings.json").exists());

    // init recorded the custom path in the config.
    sandbox.run_ok(&["add", "Routed", "--body", "via config"]);
    let list = sandbox.run_json(&["--journal", &custom_arg, "list", "--json"]);
    assert_eq!(list[0]["title"], "Routed");
}

#[test]
fn test_cli_completions() {
    let sandbox = Sandbox::new();
    let out = sandbox.run_ok(&["completions", "bash"]);
    assert!(out.contains("inkrypt"));
}
