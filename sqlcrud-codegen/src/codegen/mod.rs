//! Code generation module

mod base_repository;
mod code_generator;
mod model_generator;
mod naming;
mod output;
mod procedure_generator;
mod procedure_plan;
mod repository_generator;
mod type_catalog;

#[cfg(test)]
mod fixtures;

pub use base_repository::*;
pub use code_generator::*;
pub use model_generator::*;
pub use naming::*;
pub use output::*;
pub use procedure_generator::*;
pub use procedure_plan::*;
pub use repository_generator::*;
pub use type_catalog::*;
