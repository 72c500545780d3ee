//! One module per suite. Each exposes `NAME` and a `suite()` constructor used
//! by the catalog.

pub mod core_suite;
pub mod gfk;
pub mod kv;
pub mod migrate;
pub mod postgres;
pub mod signals;
pub mod sqlite_ext;
