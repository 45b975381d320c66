/// Ciphertext that passed armor validation.
///
/// Only `message_parser::validate` can build one, so holding an
/// `ArmoredMessage` means the envelope was already checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmoredMessage {
    text: String,
    block: String,
}

impl ArmoredMessage {
    pub(crate) fn new(text: String, block: String) -> Self {
        Self { text, block }
    }

    /// The full input text, including anything around the armor block.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Just the `BEGIN PGP MESSAGE` .. `END PGP MESSAGE` lines, with
    /// trailing whitespace removed and LF line endings.
    pub fn armor_block(&self) -> &str {
        &self.block
    }
}
