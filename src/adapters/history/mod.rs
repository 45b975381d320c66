pub mod json_history_store;
pub mod memory_history_store;
