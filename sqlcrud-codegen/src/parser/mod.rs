//! Schema inspection: DDL scripts and TOML snapshots into the table model

mod inspector;
mod metadata;
mod schema_parser;
mod snapshot;

pub use inspector::*;
pub use metadata::*;
pub use schema_parser::*;
pub use snapshot::*;
