//! T-SQL DDL inspector using sqlparser-rs

use indexmap::IndexMap;
use sqlparser::ast::{
    ColumnDef, ColumnOption, CreateTable, Expr, ForeignKeyConstraint, Ident, IndexColumn,
    ObjectName, PrimaryKeyConstraint, Statement, TableConstraint,
};
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::Parser;

use super::inspector::SchemaInspector;
use super::metadata::{ColumnRow, ForeignKeyRow, PrimaryKeyRow, RawTable};
use crate::codegen::{lookup_type, FacetKind};
use crate::error::{CodegenError, Result};

/// Inspector over the `CREATE TABLE` statements of a T-SQL script.
///
/// Reports what SQL Server's catalog views would: lowercase type names,
/// facets per type family, `IDENTITY` columns and named key constraints.
/// `ROWGUIDCOL` has no representation in the parsed AST; use a snapshot
/// for tables that need it.
#[derive(Debug, Clone, Default)]
pub struct DdlInspector {
    tables: IndexMap<String, RawTable>,
}

impl DdlInspector {
    /// Parse a DDL script. `GO` batch separators are accepted.
    pub fn parse(sql: &str) -> Result<Self> {
        let script = strip_batch_separators(sql);
        let dialect = MsSqlDialect {};
        let statements = Parser::parse_sql(&dialect, &script)?;

        let mut tables = IndexMap::new();
        for stmt in statements {
            if let Statement::CreateTable(create_table) = stmt {
                let table = extract_raw_table(&create_table);
                if tables.contains_key(&table.name) {
                    return Err(CodegenError::ParseError(format!(
                        "Table {} is defined more than once",
                        table.name
                    )));
                }
                tables.insert(table.name.clone(), table);
            }
        }

        Ok(Self { tables })
    }
}

impl SchemaInspector for DdlInspector {
    fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    fn inspect(&self, table_name: &str) -> Result<RawTable> {
        self.tables.get(table_name).cloned().ok_or_else(|| {
            CodegenError::ValidationError(format!("Table not found in script: {}", table_name))
        })
    }
}

/// Replace lines consisting only of `GO` with statement terminators
fn strip_batch_separators(sql: &str) -> String {
    sql.lines()
        .map(|line| {
            if line.trim().eq_ignore_ascii_case("go") {
                ";"
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract raw rows from a CREATE TABLE statement
fn extract_raw_table(create: &CreateTable) -> RawTable {
    let name = extract_table_name(&create.name);

    let mut columns = Vec::new();
    let mut primary_keys = Vec::new();
    let mut foreign_keys = Vec::new();

    for col_def in &create.columns {
        let (row, col_pk) = extract_column_row(col_def);
        if col_pk {
            primary_keys.push(PrimaryKeyRow {
                column_name: row.name.clone(),
            });
        }
        columns.push(row);
    }

    for constraint in &create.constraints {
        match constraint {
            TableConstraint::PrimaryKey(PrimaryKeyConstraint {
                columns: pk_cols, ..
            }) => {
                primary_keys = pk_cols
                    .iter()
                    .map(|c| PrimaryKeyRow {
                        column_name: extract_ident_from_index_column(c),
                    })
                    .collect();
            }
            TableConstraint::ForeignKey(ForeignKeyConstraint {
                name: fk_name,
                columns: fk_cols,
                ..
            }) => {
                let member_names: Vec<String> = fk_cols.iter().map(extract_ident).collect();
                let fk_name = fk_name
                    .as_ref()
                    .map(extract_ident)
                    .unwrap_or_else(|| format!("FK_{}_{}", name, member_names.join("_")));
                for column_name in member_names {
                    foreign_keys.push(ForeignKeyRow {
                        fk_name: fk_name.clone(),
                        column_name,
                    });
                }
            }
            _ => {}
        }
    }

    RawTable {
        name,
        columns,
        primary_keys,
        foreign_keys,
    }
}

/// Extract a column row and whether it carries a column-level PRIMARY KEY
fn extract_column_row(col_def: &ColumnDef) -> (ColumnRow, bool) {
    let (type_name, args) = split_type(&col_def.data_type.to_string());

    let mut row = ColumnRow {
        name: extract_ident(&col_def.name),
        ..Default::default()
    };

    match lookup_type(&type_name).map(|info| info.facet) {
        Some(FacetKind::Length) => {
            row.length = args.first().cloned().unwrap_or_default();
        }
        Some(FacetKind::PrecisionScale) => {
            if let Some(precision) = args.first() {
                row.precision = precision.clone();
                row.scale = args.get(1).cloned().unwrap_or_else(|| "0".to_string());
            }
        }
        Some(FacetKind::Precision) => {
            row.precision = args.first().cloned().unwrap_or_default();
        }
        Some(FacetKind::None) | None => {}
    }
    row.data_type = type_name;

    let mut col_is_primary = false;
    for option in &col_def.options {
        match &option.option {
            ColumnOption::PrimaryKey(_) => {
                col_is_primary = true;
            }
            ColumnOption::Generated { .. } => {
                row.is_computed = true;
            }
            ColumnOption::DialectSpecific(tokens) => {
                let token_str = tokens
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_uppercase();
                if token_str.contains("ROWGUIDCOL") {
                    row.is_rowguidcol = true;
                }
            }
            other => {
                if other.to_string().to_uppercase().starts_with("IDENTITY") {
                    row.is_identity = true;
                }
            }
        }
    }

    (row, col_is_primary)
}

/// Split a rendered type such as `NVARCHAR(50)` or `DECIMAL(10,2)` into a
/// lowercase type name and its arguments
fn split_type(rendered: &str) -> (String, Vec<String>) {
    match rendered.find('(') {
        Some(open) => {
            let name = rendered[..open].trim().to_lowercase();
            let close = rendered.rfind(')').unwrap_or(rendered.len());
            let args = rendered[open + 1..close.max(open + 1)]
                .split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect();
            (name, args)
        }
        None => (rendered.trim().to_lowercase(), Vec::new()),
    }
}

/// Extract a simple string from an ObjectName
fn extract_table_name(name: &ObjectName) -> String {
    name.0
        .last()
        .and_then(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .unwrap_or_default()
}

/// Extract a string from an Ident, brackets already removed by the parser
fn extract_ident(ident: &Ident) -> String {
    ident.value.clone()
}

/// Extract a column name string from an IndexColumn
fn extract_ident_from_index_column(ic: &IndexColumn) -> String {
    match &ic.column.expr {
        Expr::Identifier(ident) => ident.value.clone(),
        other => format!("{}", other),
    }
}
