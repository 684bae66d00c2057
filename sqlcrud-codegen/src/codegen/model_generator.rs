//! Model generator - generates C# entity classes from table metadata

use tracing::debug;

use crate::error::Result;
use crate::parser::Table;

use super::naming::{class_name, to_pascal};
use super::type_catalog::resolve_column;

/// Generate the model class source for a table.
///
/// One auto-property per column, in column order, initialized to the
/// catalog default for its type.
pub fn generate_model(table: &Table, namespace: &str) -> Result<String> {
    let class = class_name(&table.name);
    debug!("Generating model {} for table {}", class, table.name);

    let mut properties = Vec::with_capacity(table.column_count());
    for column in table.columns() {
        let info = resolve_column(column)?;
        let property = to_pascal(&column.name);
        let mut prop = String::new();
        prop.push_str("        /// <summary>\n");
        prop.push_str(&format!("        /// Gets or sets the {} value.\n", property));
        prop.push_str("        /// </summary>\n");
        prop.push_str(&format!(
            "        public {} {} {{ get; set; }} = {};\n",
            info.target_type, property, info.default_literal
        ));
        properties.push(prop);
    }

    let mut code = String::new();
    code.push_str("using System;\n\n");
    code.push_str(&format!("namespace {}\n{{\n", namespace));
    code.push_str(&format!("    public class {}\n    {{\n", class));
    code.push_str("        #region Properties\n\n");
    code.push_str(&properties.join("\n"));
    code.push_str("\n        #endregion\n");
    code.push_str("    }\n}\n");

    Ok(code)
}
