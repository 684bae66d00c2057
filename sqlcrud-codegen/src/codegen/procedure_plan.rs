//! Which CRUD procedures a table gets, and with which parameters
//!
//! Both the T-SQL generator and the repository generator walk the same plan,
//! so every procedure has exactly one calling method and vice versa.

use crate::parser::{Column, Table};

use super::naming::key_columns_suffix;

/// CRUD operation kinds, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Update,
    Delete,
    DeleteAllBy,
    Select,
    SelectAll,
    SelectAllBy,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "Insert",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
            Operation::DeleteAllBy => "DeleteAllBy",
            Operation::Select => "Select",
            Operation::SelectAll => "SelectAll",
            Operation::SelectAllBy => "SelectAllBy",
        }
    }

    /// Operations that modify rows and report success as `bool`
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Operation::Insert | Operation::Update | Operation::Delete | Operation::DeleteAllBy
        )
    }
}

/// One procedure of a table's plan
#[derive(Debug, Clone)]
pub struct PlannedProcedure<'a> {
    pub operation: Operation,
    /// Operation plus key suffix, e.g. "SelectAllByCustomerId_RegionId".
    /// Also the repository method name.
    pub suffix: String,
    /// Full procedure name: prefix + table + suffix
    pub name: String,
    /// Parameter columns, in declaration order
    pub columns: Vec<&'a Column>,
}

/// Build the procedure plan for a table.
///
/// Insert always exists. Update needs a primary key and at least one column
/// outside both the key and the foreign keys' count. Delete needs a primary
/// key. Select and SelectAll need a primary key and more columns than foreign
/// keys. Each foreign key adds DeleteAllBy and SelectAllBy.
pub fn plan_procedures<'a>(table: &'a Table, prefix: &str) -> Vec<PlannedProcedure<'a>> {
    let column_count = table.column_count();
    let pk_count = table.primary_key_count();
    let fk_count = table.foreign_key_count();
    let all_columns: Vec<&Column> = table.columns().iter().collect();
    let primary_keys = table.primary_keys();
    let foreign_keys = table.foreign_keys();

    let make = |operation: Operation, key_suffix: &str, columns: Vec<&'a Column>| {
        let suffix = format!("{}{}", operation.as_str(), key_suffix);
        PlannedProcedure {
            operation,
            name: format!("{}{}{}", prefix, table.name, suffix),
            suffix,
            columns,
        }
    };

    let mut plan = vec![make(Operation::Insert, "", all_columns.clone())];

    if pk_count > 0 && column_count != pk_count && column_count != fk_count {
        plan.push(make(Operation::Update, "", all_columns));
    }

    if pk_count > 0 {
        plan.push(make(Operation::Delete, "", primary_keys.clone()));
    }

    for (_, members) in &foreign_keys {
        plan.push(make(
            Operation::DeleteAllBy,
            &key_columns_suffix(members),
            members.clone(),
        ));
    }

    if pk_count > 0 && fk_count != column_count {
        plan.push(make(Operation::Select, "", primary_keys));
        plan.push(make(Operation::SelectAll, "", Vec::new()));
    }

    for (_, members) in &foreign_keys {
        plan.push(make(
            Operation::SelectAllBy,
            &key_columns_suffix(members),
            members.clone(),
        ));
    }

    plan
}
