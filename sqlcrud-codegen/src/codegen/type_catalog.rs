//! SQL Server to C# type catalog
//!
//! One row per supported SQL Server type carries everything the generators
//! need: the C# property type, its default initializer, the `DbType` used for
//! Dapper parameters, the conversion applied to scalar results, and which
//! facets belong in a T-SQL parameter declaration.

use crate::error::{CodegenError, Result};
use crate::parser::{Column, MAX_LENGTH};

/// Which column facets a T-SQL parameter declaration carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    /// `(n)` or `(max)`
    Length,
    /// `(p)` or `(p, s)`
    PrecisionScale,
    /// `(p)`
    Precision,
    None,
}

/// Catalog entry for one SQL Server type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    /// SQL Server type name, lowercase
    pub name: &'static str,
    /// C# type of properties and arguments
    pub target_type: &'static str,
    /// `System.Data.DbType` member passed to `DynamicParameters.Add`
    pub sql_param_type: &'static str,
    /// C# property initializer
    pub default_literal: &'static str,
    /// Function or cast applied to an `ExecuteScalar` result
    pub conversion_fn: &'static str,
    pub facet: FacetKind,
}

macro_rules! entry {
    ($name:literal, $target:literal, $dbtype:literal, $default:literal, $conv:literal, $facet:ident) => {
        TypeInfo {
            name: $name,
            target_type: $target,
            sql_param_type: $dbtype,
            default_literal: $default,
            conversion_fn: $conv,
            facet: FacetKind::$facet,
        }
    };
}

/// Every supported type, alphabetical
pub static CATALOG: &[TypeInfo] = &[
    entry!("bigint", "long", "DbType.Int64", "0", "Convert.ToInt64", None),
    entry!("binary", "byte[]", "DbType.Binary", "new byte[0]", "(byte[])", Length),
    entry!("bit", "bool", "DbType.Boolean", "false", "Convert.ToBoolean", None),
    entry!("char", "string", "DbType.String", "String.Empty", "Convert.ToString", Length),
    entry!("date", "DateTime", "DbType.Date", "DateTime.Now", "Convert.ToDateTime", None),
    entry!("datetime", "DateTime", "DbType.DateTime", "DateTime.Now", "Convert.ToDateTime", None),
    entry!("decimal", "decimal", "DbType.Decimal", "Decimal.Zero", "Convert.ToDecimal", PrecisionScale),
    entry!("float", "double", "DbType.Double", "0.0", "Convert.ToDouble", Precision),
    entry!("image", "byte[]", "DbType.Binary", "new byte[0]", "(byte[])", None),
    entry!("int", "int", "DbType.Int32", "0", "Convert.ToInt32", None),
    entry!("money", "decimal", "DbType.Decimal", "Decimal.Zero", "Convert.ToDecimal", None),
    entry!("nchar", "string", "DbType.StringFixedLength", "String.Empty", "Convert.ToString", Length),
    entry!("ntext", "string", "DbType.String", "String.Empty", "Convert.ToString", None),
    entry!("numeric", "decimal", "DbType.Decimal", "Decimal.Zero", "Convert.ToDecimal", PrecisionScale),
    entry!("nvarchar", "string", "DbType.String", "String.Empty", "Convert.ToString", Length),
    entry!("real", "float", "DbType.Single", "0.0F", "Convert.ToSingle", None),
    entry!("smalldatetime", "DateTime", "DbType.DateTime", "DateTime.Now", "Convert.ToDateTime", None),
    entry!("smallint", "short", "DbType.Int16", "0", "Convert.ToInt16", None),
    entry!("smallmoney", "decimal", "DbType.Decimal", "Decimal.Zero", "Convert.ToDecimal", None),
    entry!("sql_variant", "object", "DbType.Object", "null", "(object)", None),
    entry!("sysname", "string", "DbType.String", "String.Empty", "Convert.ToString", None),
    entry!("text", "string", "DbType.String", "String.Empty", "Convert.ToString", None),
    entry!("time", "TimeSpan", "DbType.Time", "TimeSpan.Zero", "(TimeSpan)", None),
    entry!("timestamp", "byte[]", "DbType.Binary", "new byte[0]", "(byte[])", None),
    entry!("tinyint", "byte", "DbType.Byte", "0", "Convert.ToByte", None),
    entry!("uniqueidentifier", "Guid", "DbType.Guid", "Guid.Empty", "(Guid)", None),
    entry!("varbinary", "byte[]", "DbType.Binary", "new byte[0]", "(byte[])", Length),
    entry!("varchar", "string", "DbType.String", "String.Empty", "Convert.ToString", Length),
    entry!("xml", "string", "DbType.Xml", "String.Empty", "Convert.ToString", None),
];

/// Case-insensitive catalog lookup
pub fn lookup_type(type_name: &str) -> Option<&'static TypeInfo> {
    let type_name = type_name.trim();
    CATALOG
        .iter()
        .find(|info| info.name.eq_ignore_ascii_case(type_name))
}

/// Resolve a type name, failing with `UnsupportedType` for anything unknown
pub fn resolve_type(type_name: &str) -> Result<&'static TypeInfo> {
    lookup_type(type_name).ok_or_else(|| CodegenError::UnsupportedType(type_name.to_string()))
}

/// Resolve a column's type
pub fn resolve_column(column: &Column) -> Result<&'static TypeInfo> {
    resolve_type(&column.data_type)
}

impl TypeInfo {
    /// Facet suffix of a T-SQL parameter declaration for `column`, e.g. `(50)`
    pub fn facet_suffix(&self, column: &Column) -> String {
        match self.facet {
            FacetKind::Length => match column.length {
                Some(MAX_LENGTH) => "(max)".to_string(),
                Some(length) => format!("({})", length),
                None => String::new(),
            },
            FacetKind::PrecisionScale => match (column.precision, column.scale) {
                (Some(p), Some(s)) => format!("({}, {})", p, s),
                (Some(p), None) => format!("({})", p),
                (None, _) => String::new(),
            },
            FacetKind::Precision => column
                .precision
                .map(|p| format!("({})", p))
                .unwrap_or_default(),
            FacetKind::None => String::new(),
        }
    }

    /// Apply the conversion to a C# expression
    pub fn convert(&self, expr: &str) -> String {
        format!("{}({})", self.conversion_fn, expr)
    }
}
