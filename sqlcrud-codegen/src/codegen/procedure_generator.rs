//! T-SQL stored procedure generator

use tracing::debug;

use crate::error::Result;
use crate::parser::{Column, Table};

use super::procedure_plan::{plan_procedures, Operation, PlannedProcedure};
use super::type_catalog::resolve_column;

/// Separator written before every procedure in single-file mode
pub const BANNER: &str = "\n/******************************************************************************\n******************************************************************************/\n";

/// Options shared by every procedure of a run
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcedureOptions<'a> {
    /// Prepended to every procedure name
    pub prefix: &'a str,
    /// Login granted EXECUTE; empty means no GRANT blocks
    pub grant_login_name: &'a str,
}

/// Script text of one procedure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProcedure {
    pub name: String,
    pub sql: String,
}

/// Generate the CRUD procedures for a table, in plan order
pub fn generate_procedures(
    table: &Table,
    options: &ProcedureOptions,
) -> Result<Vec<GeneratedProcedure>> {
    plan_procedures(table, options.prefix)
        .iter()
        .map(|planned| {
            let sql = render_procedure(table, planned, options.grant_login_name)?;
            debug!("Generated procedure {}", planned.name);
            Ok(GeneratedProcedure {
                name: planned.name.clone(),
                sql,
            })
        })
        .collect()
}

/// Concatenate procedures into one script, each preceded by [`BANNER`]
pub fn single_file_script(procedures: &[GeneratedProcedure]) -> String {
    let mut script = String::new();
    for procedure in procedures {
        script.push_str(BANNER);
        script.push_str(&procedure.sql);
    }
    script
}

/// Script creating a database user for the grant login.
/// `database_name` may be empty, in which case no USE statement is emitted.
pub fn grant_user_script(database_name: &str, login: &str) -> String {
    let mut sql = String::new();
    if !database_name.is_empty() {
        sql.push_str(&format!("USE [{}]\nGO\n\n", database_name));
    }
    sql.push_str(&format!(
        "if not exists (select * from sys.database_principals where name = N'{}')\n",
        login.replace('\'', "''")
    ));
    sql.push_str(&format!("\tCREATE USER [{0}] FOR LOGIN [{0}]\n", login));
    sql.push_str("GO\n");
    sql
}

/// T-SQL parameter declaration for a column, e.g. `@Name nvarchar(50)`.
/// With `check_output`, identity and rowguid columns are marked `OUTPUT`.
pub fn parameter_string(column: &Column, check_output: bool) -> Result<String> {
    let info = resolve_column(column)?;
    let mut param = format!(
        "@{} {}{}",
        column.name,
        info.name,
        info.facet_suffix(column)
    );
    if check_output && column.is_server_generated() {
        param.push_str(" OUTPUT");
    }
    Ok(param)
}

fn render_procedure(table: &Table, planned: &PlannedProcedure, grant_login: &str) -> Result<String> {
    let mut sql = String::new();

    // Drop guard
    sql.push_str(&format!(
        "if exists (select * from dbo.sysobjects where id = object_id(N'[dbo].[{0}]') and OBJECTPROPERTY(id, N'IsProcedure') = 1)\n",
        planned.name
    ));
    sql.push_str(&format!("\tdrop procedure [dbo].[{}]\n", planned.name));
    sql.push_str("GO\n\n");

    // Header and parameter list
    sql.push_str(&format!("CREATE PROCEDURE [dbo].[{}]\n", planned.name));
    let check_output = planned.operation == Operation::Insert;
    let params = planned
        .columns
        .iter()
        .map(|c| parameter_string(c, check_output))
        .collect::<Result<Vec<_>>>()?;
    if !params.is_empty() {
        sql.push_str("(\n\t");
        sql.push_str(&params.join(",\n\t"));
        sql.push_str("\n)\n");
    }
    sql.push_str("\nAS\n\nSET NOCOUNT ON\n\n");

    match planned.operation {
        Operation::Insert => render_insert_body(&mut sql, table),
        Operation::Update => {
            let assignments: Vec<String> = table
                .columns()
                .iter()
                .enumerate()
                .filter(|(i, _)| !table.is_primary_key_index(*i))
                .map(|(_, c)| format!("[{0}] = @{0}", c.name))
                .collect();
            sql.push_str(&format!("UPDATE [{}]\n", table.name));
            sql.push_str(&format!("SET {}\n", assignments.join(",\n\t")));
            render_where(&mut sql, &table.primary_keys());
        }
        Operation::Delete | Operation::DeleteAllBy => {
            sql.push_str(&format!("DELETE FROM [{}]\n", table.name));
            render_where(&mut sql, &planned.columns);
        }
        Operation::Select | Operation::SelectAllBy => {
            render_select_list(&mut sql, table);
            render_where(&mut sql, &planned.columns);
        }
        Operation::SelectAll => render_select_list(&mut sql, table),
    }

    sql.push_str("GO\n");

    if !grant_login.is_empty() {
        sql.push_str(&format!(
            "\nGRANT EXECUTE ON [dbo].[{}] TO [{}]\nGO\n",
            planned.name, grant_login
        ));
    }

    Ok(sql)
}

fn render_insert_body(sql: &mut String, table: &Table) {
    if let Some(guid) = table.columns().iter().find(|c| c.is_rowguidcol) {
        sql.push_str(&format!("SET @{} = NEWID()\n\n", guid.name));
    }

    let inserted: Vec<&Column> = table.columns().iter().filter(|c| !c.is_identity).collect();
    sql.push_str(&format!("INSERT INTO [{}]\n", table.name));
    if inserted.is_empty() {
        sql.push_str("DEFAULT VALUES\n");
    } else {
        let names: Vec<String> = inserted.iter().map(|c| format!("[{}]", c.name)).collect();
        let values: Vec<String> = inserted.iter().map(|c| format!("@{}", c.name)).collect();
        sql.push_str(&format!("(\n\t{}\n)\n", names.join(",\n\t")));
        sql.push_str(&format!("VALUES\n(\n\t{}\n)\n", values.join(",\n\t")));
    }

    match table.columns().iter().find(|c| c.is_server_generated()) {
        Some(c) if c.is_identity => sql.push_str("\nSELECT SCOPE_IDENTITY()\n"),
        Some(c) => sql.push_str(&format!("\nSELECT @{}\n", c.name)),
        None => {}
    }
}

fn render_select_list(sql: &mut String, table: &Table) {
    let names: Vec<String> = table
        .columns()
        .iter()
        .map(|c| format!("[{}]", c.name))
        .collect();
    sql.push_str(&format!("SELECT {}\n", names.join(",\n\t")));
    sql.push_str(&format!("FROM [{}]\n", table.name));
}

fn render_where(sql: &mut String, columns: &[&Column]) {
    let conditions: Vec<String> = columns
        .iter()
        .map(|c| format!("[{0}] = @{0}", c.name))
        .collect();
    sql.push_str(&format!("WHERE {}\n", conditions.join("\n\tAND ")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::fixtures;
    use crate::error::CodegenError;
    use crate::parser::MAX_LENGTH;

    fn options() -> ProcedureOptions<'static> {
        ProcedureOptions {
            prefix: "",
            grant_login_name: "",
        }
    }

    fn find<'a>(procs: &'a [GeneratedProcedure], name: &str) -> &'a GeneratedProcedure {
        procs
            .iter()
            .find(|p| p.name == name)
            .unwrap_or_else(|| panic!("missing procedure {name}"))
    }

    #[test]
    fn test_parameter_string_facets() {
        let col = Column::new("Name", "nvarchar").with_length(50);
        assert_eq!(parameter_string(&col, false).unwrap(), "@Name nvarchar(50)");

        let col = Column::new("Body", "NVARCHAR").with_length(MAX_LENGTH);
        assert_eq!(parameter_string(&col, false).unwrap(), "@Body nvarchar(max)");

        let col = Column::new("Price", "decimal").with_precision(10, Some(2));
        assert_eq!(parameter_string(&col, false).unwrap(), "@Price decimal(10, 2)");

        let col = Column::new("Ratio", "float").with_precision(53, None);
        assert_eq!(parameter_string(&col, false).unwrap(), "@Ratio float(53)");

        let col = Column::new("Flag", "bit");
        assert_eq!(parameter_string(&col, false).unwrap(), "@Flag bit");
    }

    #[test]
    fn test_parameter_string_output() {
        let id = Column::new("Id", "int").identity();
        assert_eq!(parameter_string(&id, true).unwrap(), "@Id int OUTPUT");
        assert_eq!(parameter_string(&id, false).unwrap(), "@Id int");

        let guid = Column::new("RowId", "uniqueidentifier").rowguidcol();
        assert_eq!(
            parameter_string(&guid, true).unwrap(),
            "@RowId uniqueidentifier OUTPUT"
        );
    }

    #[test]
    fn test_unsupported_type_propagates() {
        let mut table = fixtures::orders();
        table.push_column(Column::new("Shape", "geometry"));
        let err = generate_procedures(&table, &options()).unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedType(ref t) if t == "geometry"));
    }

    #[test]
    fn test_insert_with_identity() {
        let table = fixtures::orders();
        let procs = generate_procedures(&table, &options()).unwrap();
        let insert = find(&procs, "OrdersInsert");

        let expected = "if exists (select * from dbo.sysobjects where id = object_id(N'[dbo].[OrdersInsert]') and OBJECTPROPERTY(id, N'IsProcedure') = 1)\n\
\tdrop procedure [dbo].[OrdersInsert]\n\
GO\n\
\n\
CREATE PROCEDURE [dbo].[OrdersInsert]\n\
(\n\
\t@Id int OUTPUT,\n\
\t@CustomerId int,\n\
\t@RegionId int,\n\
\t@Total decimal(10, 2),\n\
\t@Note nvarchar(max)\n\
)\n\
\n\
AS\n\
\n\
SET NOCOUNT ON\n\
\n\
INSERT INTO [Orders]\n\
(\n\
\t[CustomerId],\n\
\t[RegionId],\n\
\t[Total],\n\
\t[Note]\n\
)\n\
VALUES\n\
(\n\
\t@CustomerId,\n\
\t@RegionId,\n\
\t@Total,\n\
\t@Note\n\
)\n\
\n\
SELECT SCOPE_IDENTITY()\n\
GO\n";
        assert_eq!(insert.sql, expected);
    }

    #[test]
    fn test_update_and_delete_use_primary_key() {
        let table = fixtures::orders();
        let procs = generate_procedures(&table, &options()).unwrap();

        let update = find(&procs, "OrdersUpdate");
        assert!(update.sql.contains("\t@Id int,\n"));
        assert!(!update.sql.contains("OUTPUT"));
        assert!(update.sql.contains(
            "UPDATE [Orders]\nSET [CustomerId] = @CustomerId,\n\t[RegionId] = @RegionId,\n\t[Total] = @Total,\n\t[Note] = @Note\nWHERE [Id] = @Id\nGO\n"
        ));

        let delete = find(&procs, "OrdersDelete");
        assert!(delete.sql.contains("(\n\t@Id int\n)\n"));
        assert!(delete.sql.contains("DELETE FROM [Orders]\nWHERE [Id] = @Id\nGO\n"));
    }

    #[test]
    fn test_select_procedures() {
        let table = fixtures::orders();
        let procs = generate_procedures(&table, &options()).unwrap();

        let select_all = find(&procs, "OrdersSelectAll");
        assert!(select_all.sql.contains("CREATE PROCEDURE [dbo].[OrdersSelectAll]\n\nAS\n"));
        assert!(select_all.sql.contains(
            "SELECT [Id],\n\t[CustomerId],\n\t[RegionId],\n\t[Total],\n\t[Note]\nFROM [Orders]\nGO\n"
        ));

        let by_fk = find(&procs, "OrdersSelectAllByCustomerId_RegionId");
        assert!(by_fk.sql.contains("(\n\t@CustomerId int,\n\t@RegionId int\n)\n"));
        assert!(by_fk
            .sql
            .contains("FROM [Orders]\nWHERE [CustomerId] = @CustomerId\n\tAND [RegionId] = @RegionId\nGO\n"));
    }

    #[test]
    fn test_rowguid_insert() {
        let table = fixtures::documents();
        let procs = generate_procedures(&table, &options()).unwrap();
        let insert = find(&procs, "DocumentsInsert");
        assert!(insert.sql.contains("\t@DocumentGuid uniqueidentifier OUTPUT,\n"));
        assert!(insert.sql.contains("SET NOCOUNT ON\n\nSET @DocumentGuid = NEWID()\n\nINSERT INTO [Documents]\n"));
        assert!(insert.sql.contains("\t[DocumentGuid],\n\t[Title]\n"));
        assert!(insert.sql.ends_with("\nSELECT @DocumentGuid\nGO\n"));
    }

    #[test]
    fn test_table_without_primary_key() {
        let table = fixtures::audit_log();
        let procs = generate_procedures(&table, &options()).unwrap();
        assert_eq!(procs.len(), 1);
        assert_eq!(procs[0].name, "AuditLogInsert");
        assert!(!procs[0].sql.contains("SCOPE_IDENTITY"));
    }

    #[test]
    fn test_prefix_and_grant() {
        let table = fixtures::audit_log();
        let opts = ProcedureOptions {
            prefix: "usp_",
            grant_login_name: "app_user",
        };
        let procs = generate_procedures(&table, &opts).unwrap();
        assert_eq!(procs[0].name, "usp_AuditLogInsert");
        assert!(procs[0]
            .sql
            .ends_with("GO\n\nGRANT EXECUTE ON [dbo].[usp_AuditLogInsert] TO [app_user]\nGO\n"));
    }

    #[test]
    fn test_identity_only_table_uses_default_values() {
        let mut table = Table::new("Counters");
        table.push_column(Column::new("Id", "bigint").identity());
        table.add_primary_key("Id");
        let procs = generate_procedures(&table, &options()).unwrap();
        assert!(procs[0].sql.contains("INSERT INTO [Counters]\nDEFAULT VALUES\n\nSELECT SCOPE_IDENTITY()\n"));
    }

    #[test]
    fn test_single_file_script() {
        let table = fixtures::orders();
        let procs = generate_procedures(&table, &options()).unwrap();
        let script = single_file_script(&procs);
        assert_eq!(script.matches(BANNER).count(), procs.len());
        assert!(script.starts_with(BANNER));

        let parts: Vec<&str> = script.split(BANNER).skip(1).collect();
        for (part, proc) in parts.iter().zip(&procs) {
            assert_eq!(*part, proc.sql);
        }
    }

    #[test]
    fn test_grant_user_script() {
        let sql = grant_user_script("Sales", "app_user");
        assert!(sql.starts_with("USE [Sales]\nGO\n\n"));
        assert!(sql.contains("\tCREATE USER [app_user] FOR LOGIN [app_user]\nGO\n"));

        let sql = grant_user_script("", "app_user");
        assert!(sql.starts_with("if not exists"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let table = fixtures::orders();
        let first = generate_procedures(&table, &options()).unwrap();
        let second = generate_procedures(&table, &options()).unwrap();
        assert_eq!(first, second);
    }
}
