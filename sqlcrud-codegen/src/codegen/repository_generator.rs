//! Repository generator - generates Dapper data-access classes that call the
//! generated stored procedures

use tracing::debug;

use crate::error::Result;
use crate::parser::{Column, Table};

use super::naming::{argument_name, class_name, to_pascal};
use super::procedure_plan::{plan_procedures, Operation, PlannedProcedure};
use super::type_catalog::resolve_column;

/// Generate the repository class source for a table.
///
/// One method per planned procedure, in plan order; each method calls its
/// procedure by full name.
pub fn generate_repository(table: &Table, prefix: &str, namespace: &str) -> Result<String> {
    let class = class_name(&table.name);
    debug!("Generating repository {}Repo for table {}", class, table.name);

    // Fail before emitting anything if a column type is unknown
    for column in table.columns() {
        resolve_column(column)?;
    }

    let mut methods = Vec::new();
    for planned in plan_procedures(table, prefix) {
        let method = match planned.operation {
            Operation::Insert => generate_insert_method(table, &class, &planned)?,
            Operation::Update => generate_update_method(table, &class, &planned)?,
            Operation::Delete | Operation::DeleteAllBy => {
                generate_delete_method(table, &planned)?
            }
            Operation::Select | Operation::SelectAll | Operation::SelectAllBy => {
                generate_select_method(table, &class, &planned)?
            }
        };
        methods.push(method);
    }

    let mut code = String::new();
    code.push_str("using System;\n");
    code.push_str("using System.Collections.Generic;\n");
    code.push_str("using System.Data;\n");
    code.push_str("using System.Linq;\n");
    code.push_str("using Dapper;\n\n");
    code.push_str(&format!("namespace {}\n{{\n", namespace));
    code.push_str(&format!("    public class {}Repo : BaseRepository\n    {{\n", class));
    code.push_str("        #region Methods\n\n");
    code.push_str(&methods.join("\n"));
    code.push_str("\n        #endregion\n");
    code.push_str("    }\n}\n");

    Ok(code)
}

/// Entity argument name for Insert/Update, e.g. "aOrder"
fn entity_variable(class: &str) -> String {
    format!("a{}", class)
}

/// `vParams.Add(...)` line for a column
fn param_add(column: &Column, value: &str, direction: Option<&str>) -> Result<String> {
    let info = resolve_column(column)?;
    let direction = direction
        .map(|d| format!(", direction: ParameterDirection.{}", d))
        .unwrap_or_default();
    Ok(format!(
        "                vParams.Add(\"@{}\", {}, dbType: {}{});\n",
        column.name, value, info.sql_param_type, direction
    ))
}

/// Typed argument list from parameter columns, e.g. "int customerId, int regionId"
fn argument_list(columns: &[&Column]) -> Result<String> {
    let args = columns
        .iter()
        .map(|c| -> Result<String> {
            Ok(format!(
                "{} {}",
                resolve_column(c)?.target_type,
                argument_name(&c.name)
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(args.join(", "))
}

fn execute_non_query(procedure: &str) -> String {
    let mut code = String::new();
    code.push_str(&format!(
        "                int iResult = vConn.Execute(\"{}\", vParams, commandType: CommandType.StoredProcedure);\n",
        procedure
    ));
    code.push_str("                if (iResult == -1) blResult = true;\n");
    code
}

fn generate_insert_method(table: &Table, class: &str, planned: &PlannedProcedure) -> Result<String> {
    let entity = entity_variable(class);
    let generated_key = table.columns().iter().find(|c| c.is_server_generated());

    let mut code = String::new();
    code.push_str("        /// <summary>\n");
    code.push_str(&format!(
        "        /// Saves a record to the {} table.\n",
        table.name
    ));
    code.push_str("        /// Returns true if the record was saved.\n");
    code.push_str("        /// </summary>\n");
    code.push_str(&format!(
        "        public bool {}({} {})\n        {{\n",
        planned.suffix, class, entity
    ));
    code.push_str("            var blResult = false;\n");
    code.push_str("            using (var vConn = OpenConnection())\n            {\n");
    code.push_str("                var vParams = new DynamicParameters();\n");
    for column in &planned.columns {
        let value = format!("{}.{}", entity, to_pascal(&column.name));
        let direction = column.is_server_generated().then_some("InputOutput");
        code.push_str(&param_add(column, &value, direction)?);
    }

    match generated_key {
        Some(key) => {
            let info = resolve_column(key)?;
            code.push_str(&format!(
                "                var vResult = vConn.ExecuteScalar(\"{}\", vParams, commandType: CommandType.StoredProcedure);\n",
                planned.name
            ));
            code.push_str("                if (vResult != null && vResult != DBNull.Value)\n");
            code.push_str("                {\n");
            code.push_str(&format!(
                "                    {}.{} = {};\n",
                entity,
                to_pascal(&key.name),
                info.convert("vResult")
            ));
            code.push_str("                    blResult = true;\n");
            code.push_str("                }\n");
        }
        None => code.push_str(&execute_non_query(&planned.name)),
    }

    code.push_str("            }\n");
    code.push_str("            return blResult;\n");
    code.push_str("        }\n");
    Ok(code)
}

fn generate_update_method(table: &Table, class: &str, planned: &PlannedProcedure) -> Result<String> {
    let entity = entity_variable(class);

    let mut code = String::new();
    code.push_str("        /// <summary>\n");
    code.push_str(&format!(
        "        /// Updates a record in the {} table.\n",
        table.name
    ));
    code.push_str("        /// </summary>\n");
    code.push_str(&format!(
        "        public bool {}({} {})\n        {{\n",
        planned.suffix, class, entity
    ));
    code.push_str("            var blResult = false;\n");
    code.push_str("            using (var vConn = OpenConnection())\n            {\n");
    code.push_str("                var vParams = new DynamicParameters();\n");
    for column in &planned.columns {
        let value = format!("{}.{}", entity, to_pascal(&column.name));
        code.push_str(&param_add(column, &value, None)?);
    }
    code.push_str(&execute_non_query(&planned.name));
    code.push_str("            }\n");
    code.push_str("            return blResult;\n");
    code.push_str("        }\n");
    Ok(code)
}

fn generate_delete_method(table: &Table, planned: &PlannedProcedure) -> Result<String> {
    let summary = if planned.operation == Operation::Delete {
        format!("Deletes a record from the {} table by its primary key.", table.name)
    } else {
        format!("Deletes all records from the {} table by a foreign key.", table.name)
    };

    let mut code = String::new();
    code.push_str("        /// <summary>\n");
    code.push_str(&format!("        /// {}\n", summary));
    code.push_str("        /// </summary>\n");
    code.push_str(&format!(
        "        public bool {}({})\n        {{\n",
        planned.suffix,
        argument_list(&planned.columns)?
    ));
    code.push_str("            var blResult = false;\n");
    code.push_str("            using (var vConn = OpenConnection())\n            {\n");
    code.push_str("                var vParams = new DynamicParameters();\n");
    for column in &planned.columns {
        code.push_str(&param_add(column, &argument_name(&column.name), None)?);
    }
    code.push_str(&execute_non_query(&planned.name));
    code.push_str("            }\n");
    code.push_str("            return blResult;\n");
    code.push_str("        }\n");
    Ok(code)
}

fn generate_select_method(table: &Table, class: &str, planned: &PlannedProcedure) -> Result<String> {
    let (summary, return_type, finisher) = match planned.operation {
        Operation::Select => (
            format!("Selects a single record from the {} table.", table.name),
            class.to_string(),
            "SingleOrDefault",
        ),
        Operation::SelectAll => (
            format!("Selects all records from the {} table.", table.name),
            format!("List<{}>", class),
            "ToList",
        ),
        _ => (
            format!("Selects all records from the {} table by a foreign key.", table.name),
            format!("List<{}>", class),
            "ToList",
        ),
    };

    let mut code = String::new();
    code.push_str("        /// <summary>\n");
    code.push_str(&format!("        /// {}\n", summary));
    code.push_str("        /// </summary>\n");
    code.push_str(&format!(
        "        public {} {}({})\n        {{\n",
        return_type,
        planned.suffix,
        argument_list(&planned.columns)?
    ));
    code.push_str("            using (var vConn = OpenConnection())\n            {\n");
    if planned.columns.is_empty() {
        code.push_str(&format!(
            "                return vConn.Query<{}>(\"{}\", commandType: CommandType.StoredProcedure).{}();\n",
            class, planned.name, finisher
        ));
    } else {
        code.push_str("                var vParams = new DynamicParameters();\n");
        for column in &planned.columns {
            code.push_str(&param_add(column, &argument_name(&column.name), None)?);
        }
        code.push_str(&format!(
            "                return vConn.Query<{}>(\"{}\", vParams, commandType: CommandType.StoredProcedure).{}();\n",
            class, planned.name, finisher
        ));
    }
    code.push_str("            }\n");
    code.push_str("        }\n");
    Ok(code)
}
