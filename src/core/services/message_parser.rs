use crate::core::errors::{Result, ToolkitError};
use crate::core::models::armored_message::ArmoredMessage;

pub const MESSAGE_HEADER: &str = "-----BEGIN PGP MESSAGE-----";
pub const MESSAGE_FOOTER: &str = "-----END PGP MESSAGE-----";

/// Check that `raw` holds a well-formed PGP message armor block.
///
/// Text before the begin line or after the end line (mail headers,
/// signatures, quoting) is tolerated. Armor lines must start at the first
/// column; trailing whitespace and CRLF endings are ignored. This is a pure
/// syntax check: it never decrypts and never touches key material.
pub fn validate(raw: &str) -> Result<ArmoredMessage> {
    if raw.trim().is_empty() {
        return Err(ToolkitError::EmptyInput);
    }

    let lines: Vec<&str> = raw.lines().map(str::trim_end).collect();

    let begin = lines
        .iter()
        .position(|l| *l == MESSAGE_HEADER)
        .ok_or(ToolkitError::NotPgpMessage)?;

    let end = lines[begin + 1..]
        .iter()
        .position(|l| *l == MESSAGE_FOOTER)
        .map(|i| begin + 1 + i)
        .ok_or_else(|| misformed("missing end line"))?;

    check_block(&lines[begin + 1..end])?;

    let mut block = lines[begin..=end].join("\n");
    block.push('\n');

    Ok(ArmoredMessage::new(raw.to_string(), block))
}

fn misformed(detail: &str) -> ToolkitError {
    ToolkitError::MisformedArmor {
        detail: detail.to_string(),
    }
}

/// Validate the lines between the begin and end markers.
fn check_block(lines: &[&str]) -> Result<()> {
    let header_count = lines
        .iter()
        .take_while(|l| !l.is_empty() && is_armor_header(l))
        .count();

    let mut rest = &lines[header_count..];
    match rest.first() {
        Some(l) if l.is_empty() => rest = &rest[1..],
        _ if header_count > 0 => {
            return Err(misformed("armor headers must be followed by a blank line"));
        }
        _ => {}
    }

    let mut body: Vec<&str> = rest.iter().copied().filter(|l| !l.is_empty()).collect();

    if let Some(last) = body.last()
        && let Some(checksum) = last.strip_prefix('=')
    {
        if checksum.len() != 4 || !checksum.bytes().all(is_base64_char) {
            return Err(misformed("malformed checksum line"));
        }
        body.pop();
    }

    let data: String = body.concat();
    if data.is_empty() {
        return Err(misformed("empty body"));
    }

    let unpadded = data.trim_end_matches('=');
    if data.len() - unpadded.len() > 2 || !unpadded.bytes().all(is_base64_char) {
        return Err(misformed("invalid character in armored body"));
    }
    if data.len() % 4 != 0 {
        return Err(misformed("truncated armored body"));
    }

    Ok(())
}

/// `Version: x`, `Comment: y`, ...
fn is_armor_header(line: &str) -> bool {
    match line.split_once(": ") {
        Some((key, _)) => {
            !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        }
        None => false,
    }
}

fn is_base64_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/'
}
