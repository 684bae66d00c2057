//! TOML schema snapshots
//!
//! A snapshot records the rows a live inspection would return:
//!
//! ```toml
//! [[tables]]
//! name = "Orders"
//!
//! [[tables.columns]]
//! name = "Id"
//! data_type = "int"
//! precision = "10"
//! scale = "0"
//! is_identity = true
//!
//! [[tables.primary_keys]]
//! column_name = "Id"
//!
//! [[tables.foreign_keys]]
//! fk_name = "FK_Orders_Customers"
//! column_name = "CustomerId"
//! ```

use serde::Deserialize;

use super::inspector::SchemaInspector;
use super::metadata::RawTable;
use crate::error::{CodegenError, Result};

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    tables: Vec<RawTable>,
}

/// Inspector over a TOML snapshot file
#[derive(Debug, Clone, Default)]
pub struct SnapshotInspector {
    tables: Vec<RawTable>,
}

impl SnapshotInspector {
    /// Parse snapshot text
    pub fn from_toml(content: &str) -> Result<Self> {
        let snapshot: Snapshot = toml::from_str(content)?;

        for (i, table) in snapshot.tables.iter().enumerate() {
            if table.name.trim().is_empty() {
                return Err(CodegenError::ValidationError(format!(
                    "Snapshot table #{} has no name",
                    i + 1
                )));
            }
            if snapshot.tables[..i].iter().any(|t| t.name == table.name) {
                return Err(CodegenError::ValidationError(format!(
                    "Table {} appears more than once in snapshot",
                    table.name
                )));
            }
        }

        Ok(Self {
            tables: snapshot.tables,
        })
    }
}

impl SchemaInspector for SnapshotInspector {
    fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    fn inspect(&self, table_name: &str) -> Result<RawTable> {
        self.tables
            .iter()
            .find(|t| t.name == table_name)
            .cloned()
            .ok_or_else(|| {
                CodegenError::ValidationError(format!(
                    "Table not found in snapshot: {}",
                    table_name
                ))
            })
    }
}
