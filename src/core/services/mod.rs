pub mod batch_runner;
pub mod decryptor;
pub mod history_recorder;
pub mod key_assembler;
pub mod message_parser;
