// masked-fastmail/src/commands/mod.rs
pub mod alias;

pub use alias::{list_aliases, lookup_or_create, set_description, set_state};
