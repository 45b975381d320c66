mod common;

use assert_fs::prelude::*;
use predicates::prelude::*;

use common::{
    PASSPHRASE, csirt, csirt_with_key, encrypt, encrypt_to, history, keys, protected_keys,
};

// ─── Single message decrypt ──────────────────────────────────────

#[test]
fn decrypt_text_prints_plaintext() {
    let dir = assert_fs::TempDir::new().unwrap();

    csirt_with_key(dir.path())
        .args(["decrypt", "--text", &encrypt("incident 4711 confirmed")])
        .assert()
        .success()
        .stdout(predicate::str::contains("incident 4711 confirmed"));
}

#[test]
fn decrypt_reads_stdin() {
    let dir = assert_fs::TempDir::new().unwrap();

    csirt_with_key(dir.path())
        .arg("decrypt")
        .write_stdin(encrypt("Grüße aus dem SOC 🚀"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Grüße aus dem SOC 🚀"));
}

#[test]
fn decrypt_text_records_text_history() {
    let dir = assert_fs::TempDir::new().unwrap();
    let ciphertext = encrypt("recorded");

    csirt_with_key(dir.path())
        .args(["decrypt", "--text", &ciphertext])
        .assert()
        .success();

    let records = history(dir.path());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["type"], "text");
    assert_eq!(records[0]["input"], ciphertext.as_str());
    assert_eq!(records[0]["output"], "recorded");
    assert!(records[0].get("filename").is_none());
}

#[test]
fn decrypt_file_records_file_history_and_writes_output() {
    let dir = assert_fs::TempDir::new().unwrap();
    let mail = dir.child("report.eml");
    mail.write_str(&format!("Subject: phishing\n\n{}", encrypt("mail body")))
        .unwrap();
    let out = dir.child("plain.txt");

    csirt_with_key(dir.path())
        .args(["decrypt", mail.path().to_str().unwrap(), "--output"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("written to"));

    out.assert("mail body");
    let records = history(dir.path());
    assert_eq!(records[0]["type"], "file");
    assert_eq!(records[0]["filename"], "report.eml");
}

#[test]
fn whole_key_file_replaces_fragments() {
    let dir = assert_fs::TempDir::new().unwrap();
    let key = dir.child("team.asc");
    key.write_str(&keys().secret_armored).unwrap();

    csirt(dir.path())
        .args(["decrypt", "--text", &encrypt("via key file"), "--key-file"])
        .arg(key.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("via key file"));
}

// ─── Passphrase-protected key ────────────────────────────────────

/// A data dir holding the protected key as a whole key file.
fn protected_key_file(dir: &assert_fs::TempDir) -> std::path::PathBuf {
    let key = dir.child("protected.asc");
    key.write_str(&protected_keys().secret_armored).unwrap();
    key.path().to_path_buf()
}

#[test]
fn protected_key_opens_with_passphrase_flag() {
    let dir = assert_fs::TempDir::new().unwrap();
    let key = protected_key_file(&dir);
    let ciphertext = encrypt_to(&protected_keys().public_armored, "behind a passphrase");

    csirt(dir.path())
        .args(["decrypt", "--text", &ciphertext, "--passphrase", PASSPHRASE, "--key-file"])
        .arg(&key)
        .assert()
        .success()
        .stdout(predicate::str::contains("behind a passphrase"));
}

#[test]
fn protected_key_opens_with_passphrase_env() {
    let dir = assert_fs::TempDir::new().unwrap();
    let key = protected_key_file(&dir);
    let ciphertext = encrypt_to(&protected_keys().public_armored, "from CSIRT_PGP_PASSPHRASE");

    csirt(dir.path())
        .env("CSIRT_PGP_PASSPHRASE", PASSPHRASE)
        .args(["decrypt", "--text", &ciphertext, "--key-file"])
        .arg(&key)
        .assert()
        .success()
        .stdout(predicate::str::contains("from CSIRT_PGP_PASSPHRASE"));
}

#[test]
fn protected_key_opens_with_configured_passphrase_var() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("config.toml")
        .write_str("[key]\npassphrase_var = \"TEAM_KEY_PASS\"\n")
        .unwrap();
    let key = protected_key_file(&dir);
    let ciphertext = encrypt_to(&protected_keys().public_armored, "from the config");

    csirt(dir.path())
        .env("TEAM_KEY_PASS", PASSPHRASE)
        .args(["decrypt", "--text", &ciphertext, "--key-file"])
        .arg(&key)
        .assert()
        .success()
        .stdout(predicate::str::contains("from the config"));
}

#[test]
fn wrong_passphrase_cannot_unlock() {
    let dir = assert_fs::TempDir::new().unwrap();
    let key = protected_key_file(&dir);
    let ciphertext = encrypt_to(&protected_keys().public_armored, "x");

    csirt(dir.path())
        .args(["decrypt", "--text", &ciphertext, "--passphrase", "guess", "--key-file"])
        .arg(&key)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not unlock the private key"));

    assert!(!dir.path().join("history.json").exists());
}

#[test]
fn missing_passphrase_cannot_unlock() {
    let dir = assert_fs::TempDir::new().unwrap();
    let key = protected_key_file(&dir);
    let ciphertext = encrypt_to(&protected_keys().public_armored, "x");

    csirt(dir.path())
        .args(["decrypt", "--text", &ciphertext, "--key-file"])
        .arg(&key)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not unlock the private key"));
}

// ─── Input validation ────────────────────────────────────────────

#[test]
fn empty_input_is_reported() {
    let dir = assert_fs::TempDir::new().unwrap();

    csirt(dir.path())
        .args(["decrypt", "--text", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input seems EMPTY!"));
}

#[test]
fn plain_text_is_not_a_pgp_message() {
    let dir = assert_fs::TempDir::new().unwrap();

    csirt(dir.path())
        .args(["decrypt", "--text", "hello there"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Enter a valid PGP encrypted text."));
}

#[test]
fn truncated_armor_is_misformed() {
    let dir = assert_fs::TempDir::new().unwrap();
    let ciphertext = encrypt("cut off");
    let truncated: String = ciphertext
        .lines()
        .take_while(|l| !l.starts_with("-----END"))
        .collect::<Vec<_>>()
        .join("\n");

    csirt_with_key(dir.path())
        .args(["decrypt", "--text", &truncated])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Enter a valid input in PGP format."));
}

#[test]
fn indented_armor_is_not_a_pgp_message() {
    let dir = assert_fs::TempDir::new().unwrap();
    let indented: String = encrypt("indented")
        .lines()
        .map(|l| format!("    {l}\n"))
        .collect();

    csirt_with_key(dir.path())
        .args(["decrypt", "--text", &indented])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Enter a valid PGP encrypted text."));
}

#[test]
fn malformed_input_writes_no_history() {
    let dir = assert_fs::TempDir::new().unwrap();

    csirt_with_key(dir.path())
        .args(["decrypt", "--text", "nope"])
        .assert()
        .failure();

    assert!(!dir.path().join("history.json").exists());
}

#[test]
fn missing_fragments_name_the_variables() {
    let dir = assert_fs::TempDir::new().unwrap();

    csirt(dir.path())
        .args(["decrypt", "--text", &encrypt("x")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Private key not found"))
        .stderr(predicate::str::contains("PGP_KEY_PART1"));
}

#[test]
fn scrambled_fragments_fail_to_unlock() {
    let dir = assert_fs::TempDir::new().unwrap();
    let mut fragments = common::fragments();
    fragments.swap(0, 1);

    let mut cmd = csirt(dir.path());
    for (var, fragment) in common::FRAGMENT_VARS.iter().zip(fragments) {
        cmd.env(var, fragment);
    }
    cmd.args(["decrypt", "--text", &encrypt("x")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not unlock the private key"));
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = assert_fs::TempDir::new().unwrap();
    let doc = dir.child("message.docx");
    doc.write_str(&encrypt("x")).unwrap();

    csirt_with_key(dir.path())
        .args(["decrypt", doc.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid file type: message.docx"));
}

#[test]
fn missing_file_is_reported() {
    let dir = assert_fs::TempDir::new().unwrap();

    csirt_with_key(dir.path())
        .args(["decrypt", "does-not-exist.pgp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}
