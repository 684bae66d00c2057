//! Tables shared by the generator tests

use crate::parser::{Column, Table, MAX_LENGTH};

/// Identity PK, a composite FK and mixed facets
pub fn orders() -> Table {
    let mut table = Table::new("Orders");
    table.push_column(Column::new("Id", "int").with_precision(10, Some(0)).identity());
    table.push_column(Column::new("CustomerId", "int"));
    table.push_column(Column::new("RegionId", "int"));
    table.push_column(Column::new("Total", "decimal").with_precision(10, Some(2)));
    table.push_column(Column::new("Note", "nvarchar").with_length(MAX_LENGTH));
    table.add_primary_key("Id");
    table.add_foreign_key_column("FK_Orders_Customers", "CustomerId");
    table.add_foreign_key_column("FK_Orders_Customers", "RegionId");
    table
}

/// No primary key
pub fn audit_log() -> Table {
    let mut table = Table::new("AuditLog");
    table.push_column(Column::new("Message", "nvarchar").with_length(200));
    table.push_column(Column::new("LoggedAt", "datetime"));
    table
}

/// Rowguid primary key
pub fn documents() -> Table {
    let mut table = Table::new("Documents");
    table.push_column(Column::new("DocumentGuid", "uniqueidentifier").rowguidcol());
    table.push_column(Column::new("Title", "nvarchar").with_length(200));
    table.add_primary_key("DocumentGuid");
    table
}

/// Link table: every column is in the key and in a foreign key
pub fn order_tags() -> Table {
    let mut table = Table::new("OrderTags");
    table.push_column(Column::new("OrderId", "int"));
    table.push_column(Column::new("TagId", "int"));
    table.add_primary_key("OrderId");
    table.add_primary_key("TagId");
    table.add_foreign_key_column("FK_OrderTags_Orders", "OrderId");
    table.add_foreign_key_column("FK_OrderTags_Tags", "TagId");
    table
}

/// Single-column key plus as many foreign keys as columns
pub fn customer_regions() -> Table {
    let mut table = Table::new("CustomerRegions");
    table.push_column(Column::new("CustomerId", "int"));
    table.push_column(Column::new("RegionId", "int"));
    table.add_primary_key("CustomerId");
    table.add_foreign_key_column("FK_CustomerRegions_Customers", "CustomerId");
    table.add_foreign_key_column("FK_CustomerRegions_Regions", "RegionId");
    table
}
