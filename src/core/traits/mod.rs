pub mod history;
pub mod pgp_backend;
