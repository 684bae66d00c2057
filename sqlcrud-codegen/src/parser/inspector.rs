//! Schema inspection seam

use std::path::Path;

use tracing::{debug, info};

use super::metadata::{RawTable, Table};
use super::schema_parser::DdlInspector;
use super::snapshot::SnapshotInspector;
use crate::error::Result;

/// Source of raw schema rows.
///
/// Implementations report tables in a stable order and return the rows the
/// database would give back for one table; turning them into [`Table`]s is
/// left to [`Table::from_raw`].
pub trait SchemaInspector {
    /// Names of all user tables, in reporting order
    fn table_names(&self) -> Vec<String>;

    /// Raw column and key rows for one table
    fn inspect(&self, table_name: &str) -> Result<RawTable>;

    /// Inspect every table and build the schema model
    fn load_tables(&self) -> Result<Vec<Table>> {
        let mut tables = Vec::new();
        for name in self.table_names() {
            let raw = self.inspect(&name)?;
            let table = Table::from_raw(&raw)?;
            debug!(
                "Loaded table {} ({} columns, {} pk, {} fk)",
                table.name,
                table.column_count(),
                table.primary_key_count(),
                table.foreign_key_count()
            );
            tables.push(table);
        }
        Ok(tables)
    }
}

/// Load a schema file, picking the inspector by extension:
/// `.toml` is a snapshot, anything else is a T-SQL DDL script.
pub fn load_schema(path: &Path) -> Result<Vec<Table>> {
    let content = std::fs::read_to_string(path)?;
    let inspector: Box<dyn SchemaInspector> = if is_snapshot(path) {
        info!("Reading schema snapshot: {}", path.display());
        Box::new(SnapshotInspector::from_toml(&content)?)
    } else {
        info!("Parsing DDL script: {}", path.display());
        Box::new(DdlInspector::parse(&content)?)
    };
    inspector.load_tables()
}

fn is_snapshot(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}
