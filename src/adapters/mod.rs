pub mod history;
pub mod pgp;
