pub mod batch;
pub mod decrypt;
pub mod encrypt;
pub mod history;
pub mod init;
pub mod key_helpers;
