//! Schema model shared by every generator

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::warn;

use crate::error::{CodegenError, Result};

/// Length value SQL Server reports for `(max)` columns
pub const MAX_LENGTH: i64 = -1;

/// Metadata for a database table
///
/// Key members are stored as indexes into `columns`, so a primary or foreign
/// key always refers to the very column the generators iterate over.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Table name
    pub name: String,

    columns: Vec<Column>,
    primary_keys: Vec<usize>,
    foreign_keys: IndexMap<String, Vec<usize>>,
}

/// Metadata for a column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Type name as reported by the server (e.g. "nvarchar"), case preserved
    pub data_type: String,

    /// Character or byte length; `Some(-1)` for `(max)`
    pub length: Option<i64>,

    /// Numeric precision
    pub precision: Option<i64>,

    /// Numeric scale
    pub scale: Option<i64>,

    pub is_identity: bool,
    pub is_rowguidcol: bool,
    pub is_computed: bool,
}

/// One column row as returned by the schema inspector
///
/// Facets are the driver's strings; an empty string means "not reported".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ColumnRow {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub precision: String,
    #[serde(default)]
    pub scale: String,
    #[serde(default)]
    pub is_identity: bool,
    #[serde(default)]
    pub is_rowguidcol: bool,
    #[serde(default)]
    pub is_computed: bool,
}

/// One primary key row (`sp_pkeys` shape)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrimaryKeyRow {
    pub column_name: String,
}

/// One foreign key member row (`sp_fkeys` shape)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForeignKeyRow {
    /// Constraint name; rows sharing a name form one composite key
    pub fk_name: String,
    pub column_name: String,
}

/// Everything the inspector reports for one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawTable {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnRow>,
    #[serde(default)]
    pub primary_keys: Vec<PrimaryKeyRow>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyRow>,
}

impl Table {
    /// Create an empty table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a table from inspector rows.
    ///
    /// Columns keep row order. Key rows are resolved by column name; rows that
    /// name an unknown column are skipped.
    pub fn from_raw(raw: &RawTable) -> Result<Self> {
        let mut table = Table::new(raw.name.clone());

        for row in &raw.columns {
            table.push_column(Column::from_row(row)?);
        }

        for pk in &raw.primary_keys {
            if !table.add_primary_key(&pk.column_name) {
                warn!(
                    "Primary key column {} not found in table {}",
                    pk.column_name, table.name
                );
            }
        }

        for fk in &raw.foreign_keys {
            if !table.add_foreign_key_column(&fk.fk_name, &fk.column_name) {
                warn!(
                    "Foreign key {} references unknown column {} in table {}",
                    fk.fk_name, fk.column_name, table.name
                );
            }
        }

        Ok(table)
    }

    /// Append a column, returning its position
    pub fn push_column(&mut self, column: Column) -> usize {
        self.columns.push(column);
        self.columns.len() - 1
    }

    /// Mark the named column as a primary key member.
    /// Returns false if the column does not exist.
    pub fn add_primary_key(&mut self, column_name: &str) -> bool {
        match self.column_index(column_name) {
            Some(idx) => {
                if !self.primary_keys.contains(&idx) {
                    self.primary_keys.push(idx);
                }
                true
            }
            None => false,
        }
    }

    /// Append the named column to a foreign key constraint, creating the
    /// constraint entry on first use. Returns false, leaving the keys
    /// untouched, if the column does not exist.
    pub fn add_foreign_key_column(&mut self, fk_name: &str, column_name: &str) -> bool {
        match self.column_index(column_name) {
            Some(idx) => {
                self.foreign_keys
                    .entry(fk_name.to_string())
                    .or_default()
                    .push(idx);
                true
            }
            None => false,
        }
    }

    /// Columns in driver order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Primary key columns in key order
    pub fn primary_keys(&self) -> Vec<&Column> {
        self.primary_keys.iter().map(|&i| &self.columns[i]).collect()
    }

    /// Foreign keys in constraint order, each with its member columns
    pub fn foreign_keys(&self) -> Vec<(&str, Vec<&Column>)> {
        self.foreign_keys
            .iter()
            .map(|(name, members)| {
                (
                    name.as_str(),
                    members.iter().map(|&i| &self.columns[i]).collect(),
                )
            })
            .collect()
    }

    /// Check if the column at `index` is part of the primary key
    pub fn is_primary_key_index(&self, index: usize) -> bool {
        self.primary_keys.contains(&index)
    }

    /// Check if a column is part of the primary key
    pub fn is_primary_key_column(&self, column_name: &str) -> bool {
        self.column_index(column_name)
            .map(|idx| self.is_primary_key_index(idx))
            .unwrap_or(false)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn primary_key_count(&self) -> usize {
        self.primary_keys.len()
    }

    /// Number of foreign key constraints (not member columns)
    pub fn foreign_key_count(&self) -> usize {
        self.foreign_keys.len()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

impl Column {
    /// Create a column with no facets or flags
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ..Default::default()
        }
    }

    /// Convert an inspector row, parsing the facet strings
    pub fn from_row(row: &ColumnRow) -> Result<Self> {
        Ok(Self {
            name: row.name.clone(),
            data_type: row.data_type.clone(),
            length: parse_facet(&row.name, "length", &row.length)?,
            precision: parse_facet(&row.name, "precision", &row.precision)?,
            scale: parse_facet(&row.name, "scale", &row.scale)?,
            is_identity: row.is_identity,
            is_rowguidcol: row.is_rowguidcol,
            is_computed: row.is_computed,
        })
    }

    pub fn with_length(mut self, length: i64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: i64, scale: Option<i64>) -> Self {
        self.precision = Some(precision);
        self.scale = scale;
        self
    }

    pub fn identity(mut self) -> Self {
        self.is_identity = true;
        self
    }

    pub fn rowguidcol(mut self) -> Self {
        self.is_rowguidcol = true;
        self
    }

    /// Identity and rowguid columns are populated by the server on insert
    pub fn is_server_generated(&self) -> bool {
        self.is_identity || self.is_rowguidcol
    }
}

/// Parse a driver facet string. Empty means unset; `max` maps to [`MAX_LENGTH`].
pub fn parse_facet(column: &str, facet: &'static str, value: &str) -> Result<Option<i64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.eq_ignore_ascii_case("max") {
        return Ok(Some(MAX_LENGTH));
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| CodegenError::InvalidFacet {
            column: column.to_string(),
            facet,
            value: value.to_string(),
        })
}
