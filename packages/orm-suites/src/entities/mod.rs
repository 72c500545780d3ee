//! Entities the suites create tables for.

pub mod appetizer;
pub mod blog;
pub mod entree;
pub mod entry;
pub mod kv;
pub mod note;
pub mod tag;
