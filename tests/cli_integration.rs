//! Integration tests for the PassVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  The
//! master key comes from `PASSVAULT_MASTER_KEY` and passwords are piped
//! on stdin, so no test ever hits an interactive prompt.  Each project
//! dir gets a `.passvault.toml` with the cheapest Argon2 settings.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const MASTER: &str = "abc123XY!";

/// Helper: get a Command pointing at the passvault binary.
fn passvault() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("passvault").expect("binary should exist")
}

/// Helper: a temp project dir with fast KDF settings.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child(".passvault.toml")
        .write_str("argon2_memory_kib = 8192\nargon2_iterations = 1\nargon2_parallelism = 1\n")
        .unwrap();
    tmp
}

/// Helper: a command run inside `dir` with `key` as the master key.
fn in_vault(dir: &TempDir, key: &str) -> Command {
    let mut cmd = passvault();
    cmd.current_dir(dir.path())
        .env("PASSVAULT_MASTER_KEY", key)
        .env_remove("PASSVAULT_LOG");
    cmd
}

fn add(dir: &TempDir, website: &str, password: &str) {
    in_vault(dir, MASTER)
        .args(["add", website])
        .write_stdin(format!("{password}\n"))
        .assert()
        .success();
}

#[test]
fn help_flag_shows_usage() {
    passvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted password vault"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("wipe"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn version_flag_shows_version() {
    passvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("passvault"));
}

#[test]
fn no_args_shows_help() {
    passvault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn add_then_list_shows_the_record() {
    let tmp = project();
    in_vault(&tmp, MASTER)
        .args(["add", "example.com", "--nickname", "work"])
        .write_stdin("Tr0ub4dor&3zz\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved password for example.com (work)"));

    tmp.child(".passvault/passwords.pwvault")
        .assert(predicate::path::exists());

    in_vault(&tmp, MASTER)
        .args(["list", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com"))
        .stdout(predicate::str::contains("work"))
        .stdout(predicate::str::contains("Tr0ub4dor&3zz"));
}

#[test]
fn list_masks_passwords_by_default() {
    let tmp = project();
    add(&tmp, "example.com", "Tr0ub4dor&3zz");

    in_vault(&tmp, MASTER)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com"))
        .stdout(predicate::str::contains("Tr0ub4dor&3zz").not());
}

#[test]
fn wrong_master_key_fails() {
    let tmp = project();
    add(&tmp, "example.com", "pw");

    in_vault(&tmp, "Zyx987WV?")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wrong master key"));
}

#[test]
fn weak_master_key_is_refused() {
    let tmp = project();
    in_vault(&tmp, "abc")
        .args(["add", "example.com"])
        .write_stdin("pw\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("too weak"));

    tmp.child(".passvault/passwords.pwvault")
        .assert(predicate::path::missing());
}

#[test]
fn delete_by_index() {
    let tmp = project();
    add(&tmp, "a.com", "one");
    add(&tmp, "b.com", "two");

    in_vault(&tmp, MASTER)
        .args(["delete", "1", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted password for a.com"));

    in_vault(&tmp, MASTER)
        .args(["list", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("b.com"))
        .stdout(predicate::str::contains("a.com").not());
}

#[test]
fn delete_out_of_range_fails() {
    let tmp = project();
    add(&tmp, "a.com", "one");

    in_vault(&tmp, MASTER)
        .args(["delete", "5", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no entry #5"));
}

#[test]
fn wipe_removes_vault_and_frees_the_master_key() {
    let tmp = project();
    add(&tmp, "a.com", "one");

    passvault()
        .current_dir(tmp.path())
        .args(["wipe", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault wiped"));

    tmp.child(".passvault/passwords.pwvault")
        .assert(predicate::path::missing());

    // A different master key may now start a fresh vault.
    in_vault(&tmp, "Zyx987WV?")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No passwords"));
}

#[test]
fn generate_prints_password_of_requested_length() {
    let tmp = project();
    passvault()
        .current_dir(tmp.path())
        .args(["generate", "--length", "32"])
        .assert()
        .success()
        .stdout(predicate::function(|out: &str| out.trim_end().chars().count() == 32));
}

#[test]
fn generate_rejects_short_length() {
    let tmp = project();
    passvault()
        .current_dir(tmp.path())
        .args(["generate", "--length", "4"])
        .assert()
        .failure();
}

#[test]
fn add_with_generate_stores_a_password() {
    let tmp = project();
    in_vault(&tmp, MASTER)
        .args(["add", "gen.com", "--generate", "--length", "16"])
        .assert()
        .success();

    in_vault(&tmp, MASTER)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("gen.com"));
}

#[test]
fn strength_reports_score() {
    let tmp = project();
    in_vault(&tmp, "Tr0ub4dor&3zz")
        .arg("strength")
        .assert()
        .success()
        .stdout(predicate::str::contains("100%"))
        .stdout(predicate::str::contains("Accepted"));

    in_vault(&tmp, "abcdefgh")
        .arg("strength")
        .assert()
        .success()
        .stdout(predicate::str::contains("40%"));
}

#[test]
fn serve_answers_over_stdio() {
    let tmp = project();
    let request = r#"{"id":7,"channel":"get-passwords","payload":"{\"masterKey\":\"abc123XY!\"}"}"#;

    passvault()
        .current_dir(tmp.path())
        .arg("serve")
        .write_stdin(format!("{request}\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"id":7,"response":[]}"#));
}

#[test]
fn completions_bash_succeeds() {
    passvault()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("passvault"));
}

#[test]
fn completions_unknown_shell_is_rejected_by_parser() {
    passvault()
        .args(["completions", "csh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn vault_dir_flag_overrides_config() {
    let tmp = project();
    in_vault(&tmp, MASTER)
        .args(["--vault-dir", "elsewhere", "add", "a.com"])
        .write_stdin("one\n")
        .assert()
        .success();

    tmp.child("elsewhere/passwords.pwvault")
        .assert(predicate::path::exists());
}

#[cfg(feature = "audit-log")]
#[test]
fn audit_records_operations_without_secrets() {
    let tmp = project();
    add(&tmp, "secret-site.com", "one");

    passvault()
        .current_dir(tmp.path())
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("secret-site.com").not());
}
