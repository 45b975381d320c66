#![allow(dead_code)]

use std::path::Path;
use std::sync::OnceLock;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use pgp::composed::{
    Deserializable, KeyType, Message, MessageBuilder, SecretKeyParamsBuilder, SignedPublicKey,
    SignedSecretKey, SubkeyParamsBuilder,
};
use pgp::crypto::ecc_curve::ECCCurve;
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::types::{Password, PublicKeyTrait};
use rand::thread_rng;

pub const FRAGMENT_VARS: [&str; 4] = ["PGP_KEY_PART1", "PGP_KEY_PART2", "PGP_KEY_PART3", "PGP_KEY_PART4"];

/// Passphrase of `protected_keys()`.
pub const PASSPHRASE: &str = "tlp:amber";

pub struct Keys {
    pub secret_armored: String,
    pub public_armored: String,
}

/// One throwaway key pair per test binary.
pub fn keys() -> &'static Keys {
    static KEYS: OnceLock<Keys> = OnceLock::new();
    KEYS.get_or_init(|| generate(None))
}

/// A second key pair, locked with `PASSPHRASE`.
pub fn protected_keys() -> &'static Keys {
    static KEYS: OnceLock<Keys> = OnceLock::new();
    KEYS.get_or_init(|| generate(Some(PASSPHRASE)))
}

fn generate(passphrase: Option<&str>) -> Keys {
    let mut encrypt = SubkeyParamsBuilder::default();
    encrypt
        .key_type(KeyType::ECDH(ECCCurve::Curve25519))
        .can_sign(false)
        .can_encrypt(true)
        .can_authenticate(false)
        .passphrase(passphrase.map(str::to_string));

    let mut params = SecretKeyParamsBuilder::default();
    params
        .key_type(KeyType::Ed25519Legacy)
        .can_certify(true)
        .can_sign(true)
        .can_encrypt(false)
        .passphrase(passphrase.map(str::to_string))
        .primary_user_id("CSIRT Integration <soc@example.org>".into())
        .subkeys(vec![encrypt.build().unwrap()]);

    let secret = params
        .build()
        .unwrap()
        .generate(thread_rng())
        .unwrap()
        .sign(&mut thread_rng(), &Password::from(passphrase.unwrap_or_default()))
        .unwrap();
    let public = SignedPublicKey::from(secret.clone());

    Keys {
        secret_armored: secret.to_armored_string(Default::default()).unwrap(),
        public_armored: public.to_armored_string(Default::default()).unwrap(),
    }
}

/// The private key body split across the four fragment variables.
pub fn fragments() -> Vec<String> {
    let body = keys()
        .secret_armored
        .lines()
        .map(str::trim_end)
        .skip(1)
        .skip_while(|l| !l.is_empty())
        .skip(1)
        .take_while(|l| !l.starts_with("-----END"))
        .collect::<Vec<_>>()
        .join("\n");

    let chars: Vec<char> = body.chars().collect();
    let size = chars.len().div_ceil(FRAGMENT_VARS.len());
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}

/// Encrypt `plaintext` to the test key, armored.
pub fn encrypt(plaintext: &str) -> String {
    encrypt_to(&keys().public_armored, plaintext)
}

/// Encrypt `plaintext` to `public_armored`, armored.
pub fn encrypt_to(public_armored: &str, plaintext: &str) -> String {
    let (public, _) = SignedPublicKey::from_string(public_armored).unwrap();
    let subkey = public
        .public_subkeys
        .iter()
        .find(|sub| sub.is_encryption_key())
        .unwrap();

    let mut builder = MessageBuilder::from_bytes("", plaintext.as_bytes().to_vec())
        .seipd_v1(thread_rng(), SymmetricKeyAlgorithm::AES256);
    builder.encrypt_to_key(thread_rng(), subkey).unwrap();
    builder
        .to_armored_string(thread_rng(), Default::default())
        .unwrap()
}

/// Decrypt `armored` with the unprotected test key. Returns the plaintext
/// and whether a signature by `signer_public` verifies.
pub fn open_and_verify(armored: &str, signer_public: &str) -> (String, bool) {
    let (secret, _) = SignedSecretKey::from_string(&keys().secret_armored).unwrap();
    let (signer, _) = SignedPublicKey::from_string(signer_public).unwrap();

    let (message, _) = Message::from_armor(std::io::Cursor::new(armored.as_bytes().to_vec())).unwrap();
    let mut message = message.decrypt(&Password::from(""), &secret).unwrap();
    while message.is_compressed() {
        message = message.decompress().unwrap();
    }
    let plaintext = message.as_data_string().unwrap();
    let verified = message.is_one_pass_signed() && message.verify(&signer).is_ok();
    (plaintext, verified)
}

/// csirt-pgp pointed at `data_dir`, with a clean key environment.
pub fn csirt(data_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("csirt-pgp");
    cmd.arg("--config").arg(data_dir).env("NO_COLOR", "1");
    for var in FRAGMENT_VARS {
        cmd.env_remove(var);
    }
    for var in ["PGP_PASSPHRASE", "CSIRT_PGP_PASSPHRASE", "PGP_PUBLIC_KEY", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}

/// Like `csirt`, with the private key exported in fragments.
pub fn csirt_with_key(data_dir: &Path) -> Command {
    let mut cmd = csirt(data_dir);
    for (var, fragment) in FRAGMENT_VARS.iter().zip(fragments()) {
        cmd.env(var, fragment);
    }
    cmd
}

/// Parsed `history.json` in `data_dir`.
pub fn history(data_dir: &Path) -> Vec<serde_json::Value> {
    let content = std::fs::read_to_string(data_dir.join("history.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}
