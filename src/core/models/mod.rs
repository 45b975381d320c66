pub mod armored_message;
pub mod batch_item;
pub mod decryption_record;
pub mod key_material;
pub mod plaintext;
