use zeroize::Zeroizing;

use crate::config::app_config::KeySection;
use crate::core::errors::{Result, ToolkitError};
use crate::core::models::key_material::ArmoredKey;

/// Rebuild the armored private key from its configured fragments.
///
/// Fragments are concatenated exactly as given, in order. Empty fragments
/// are kept as-is; only a set where every fragment is empty (or no
/// fragment at all) counts as missing key material.
pub fn assemble_key<S: AsRef<str>>(fragments: &[S]) -> Result<ArmoredKey> {
    if fragments.iter().all(|f| f.as_ref().is_empty()) {
        return Err(ToolkitError::MissingKeyMaterial {
            vars: format!("{} fragment(s), all empty", fragments.len()),
        });
    }

    let body: Zeroizing<String> = Zeroizing::new(fragments.iter().map(|f| f.as_ref()).collect());
    Ok(ArmoredKey::from_body(&body))
}

/// Read the fragments named in `[key] fragment_vars` from the environment
/// and assemble them. Unset variables read as empty fragments.
pub fn assemble_from_env(section: &KeySection) -> Result<ArmoredKey> {
    let fragments: Vec<Zeroizing<String>> = section
        .fragment_vars
        .iter()
        .map(|var| Zeroizing::new(std::env::var(var).unwrap_or_default()))
        .collect();
    let fragments: Vec<&str> = fragments.iter().map(|f| f.as_str()).collect();

    assemble_key(&fragments).map_err(|e| match e {
        ToolkitError::MissingKeyMaterial { .. } => ToolkitError::MissingKeyMaterial {
            vars: section.fragment_vars.join(", "),
        },
        other => other,
    })
}

/// Resolve the key passphrase: an explicit value wins, then the configured
/// environment variable. Absence is valid; unprotected keys need none.
pub fn resolve_passphrase(
    explicit: Option<&str>,
    section: &KeySection,
) -> Option<Zeroizing<String>> {
    if let Some(value) = explicit.filter(|v| !v.is_empty()) {
        return Some(Zeroizing::new(value.to_string()));
    }
    std::env::var(&section.passphrase_var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(Zeroizing::new)
}
