//! Naming utilities for code generation

use crate::parser::Column;

/// Lower-case the first character, leaving the rest untouched
pub fn to_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Upper-case the first character, leaving the rest untouched
pub fn to_pascal(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a table name to a class name.
///
/// Pascal-cases the name and drops one trailing `s`/`S`, unless the character
/// before it is the same letter ("Address", "Class"). This is a heuristic:
/// "Status" becomes "Statu" and stays that way so output is stable.
pub fn class_name(table_name: &str) -> String {
    let pascal = to_pascal(table_name);
    let chars: Vec<char> = pascal.chars().collect();
    if chars.len() < 2 {
        return pascal;
    }

    let last = chars[chars.len() - 1];
    let before = chars[chars.len() - 2];
    if (last == 's' || last == 'S') && before != last {
        chars[..chars.len() - 1].iter().collect()
    } else {
        pascal
    }
}

/// Key part of a per-foreign-key operation name, appended after
/// `DeleteAllBy`/`SelectAllBy`.
/// e.g., [CustomerId, RegionId] -> "CustomerId_RegionId"
pub fn key_columns_suffix(columns: &[&Column]) -> String {
    let parts: Vec<String> = columns.iter().map(|c| to_pascal(&c.name)).collect();
    parts.join("_")
}

/// Check if a name is a reserved C# keyword
pub fn is_csharp_keyword(name: &str) -> bool {
    matches!(
        name,
        "abstract"
            | "as"
            | "base"
            | "bool"
            | "break"
            | "byte"
            | "case"
            | "catch"
            | "char"
            | "checked"
            | "class"
            | "const"
            | "continue"
            | "decimal"
            | "default"
            | "delegate"
            | "do"
            | "double"
            | "else"
            | "enum"
            | "event"
            | "explicit"
            | "extern"
            | "false"
            | "finally"
            | "fixed"
            | "float"
            | "for"
            | "foreach"
            | "goto"
            | "if"
            | "implicit"
            | "in"
            | "int"
            | "interface"
            | "internal"
            | "is"
            | "lock"
            | "long"
            | "namespace"
            | "new"
            | "null"
            | "object"
            | "operator"
            | "out"
            | "override"
            | "params"
            | "private"
            | "protected"
            | "public"
            | "readonly"
            | "ref"
            | "return"
            | "sbyte"
            | "sealed"
            | "short"
            | "sizeof"
            | "stackalloc"
            | "static"
            | "string"
            | "struct"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "uint"
            | "ulong"
            | "unchecked"
            | "unsafe"
            | "ushort"
            | "using"
            | "virtual"
            | "void"
            | "volatile"
            | "while"
    )
}

/// Escape an identifier with `@` if it's a C# keyword
pub fn escape_identifier(name: &str) -> String {
    if is_csharp_keyword(name) {
        format!("@{}", name)
    } else {
        name.to_string()
    }
}

/// Argument name for a column in a generated method signature
pub fn argument_name(column_name: &str) -> String {
    escape_identifier(&to_camel(column_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversion() {
        assert_eq!(to_camel("Foo"), "foo");
        assert_eq!(to_camel("CustomerID"), "customerID");
        assert_eq!(to_camel(""), "");
        assert_eq!(to_pascal("foo"), "Foo");
        assert_eq!(to_pascal("order_id"), "Order_id");
        assert_eq!(to_pascal(""), "");
    }

    #[test]
    fn test_class_name() {
        assert_eq!(class_name("Orders"), "Order");
        assert_eq!(class_name("Items"), "Item");
        assert_eq!(class_name("Address"), "Address");
        assert_eq!(class_name("Class"), "Class");
        assert_eq!(class_name("customers"), "Customer");
        assert_eq!(class_name("PRODUCTS"), "PRODUCT");
        assert_eq!(class_name("Person"), "Person");
    }

    #[test]
    fn test_class_name_heuristic_is_stable() {
        assert_eq!(class_name("Status"), "Statu");
        assert_eq!(class_name("s"), "S");
        assert_eq!(class_name(""), "");
        assert_eq!(class_name("BOSS"), "BOSS");
    }

    #[test]
    fn test_key_columns_suffix() {
        let a = Column::new("customerId", "int");
        let b = Column::new("RegionId", "int");
        assert_eq!(key_columns_suffix(&[&a, &b]), "CustomerId_RegionId");
        assert_eq!(key_columns_suffix(&[&b]), "RegionId");
    }

    #[test]
    fn test_escape_identifier() {
        assert_eq!(argument_name("Class"), "@class");
        assert_eq!(argument_name("Event"), "@event");
        assert_eq!(argument_name("OrderId"), "orderId");
        assert!(is_csharp_keyword("namespace"));
        assert!(!is_csharp_keyword("Namespace"));
    }
}
