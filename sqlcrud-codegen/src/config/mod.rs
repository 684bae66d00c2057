//! Configuration for sqlcrud-codegen

pub mod defaults;
mod settings;

pub use settings::*;
