//! Checks the scripts and classes that build.rs generated from schema/sales.toml

use std::fs;
use std::path::{Path, PathBuf};

use sqlcrud_codegen::codegen::BANNER;
use sqlcrud_codegen::CodegenBuilder;

fn out_dir() -> PathBuf {
    PathBuf::from(env!("OUT_DIR"))
}

fn read(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {}: {}", path.display(), e))
}

/// Name declared by a procedure script
fn procedure_name(sql: &str) -> &str {
    let start = sql
        .find("CREATE PROCEDURE [dbo].[")
        .expect("no CREATE PROCEDURE")
        + "CREATE PROCEDURE [dbo].[".len();
    let end = start + sql[start..].find(']').unwrap();
    &sql[start..end]
}

fn single_script() -> String {
    read(out_dir().join("SQL/StoredProcedures.sql"))
}

const EXPECTED_PROCEDURES: &[&str] = &[
    "usp_CustomersInsert",
    "usp_CustomersUpdate",
    "usp_CustomersDelete",
    "usp_CustomersSelect",
    "usp_CustomersSelectAll",
    "usp_OrdersInsert",
    "usp_OrdersUpdate",
    "usp_OrdersDelete",
    "usp_OrdersDeleteAllByCustomerId_RegionId",
    "usp_OrdersSelect",
    "usp_OrdersSelectAll",
    "usp_OrdersSelectAllByCustomerId_RegionId",
    "usp_AuditLogInsert",
    "usp_DocumentsInsert",
    "usp_DocumentsUpdate",
    "usp_DocumentsDelete",
    "usp_DocumentsSelect",
    "usp_DocumentsSelectAll",
];

#[test]
fn test_single_script_lists_procedures_in_table_order() {
    let script = single_script();
    let names: Vec<&str> = script.split(BANNER).skip(1).map(procedure_name).collect();
    assert_eq!(names, EXPECTED_PROCEDURES);
}

#[test]
fn test_single_script_starts_with_user_script() {
    let script = single_script();
    let head = script.split(BANNER).next().unwrap();
    assert!(head.starts_with("USE [Sales]\nGO\n\n"));
    assert!(head.contains("CREATE USER [app_user] FOR LOGIN [app_user]"));
    assert_eq!(head, read(out_dir().join("multi/SQL/GrantUserPermissions.sql")));
}

#[test]
fn test_multiple_files_match_single_script() {
    let script = single_script();
    for part in script.split(BANNER).skip(1) {
        let name = procedure_name(part);
        let file = read(out_dir().join(format!("multi/SQL/{}.sql", name)));
        assert_eq!(part, file, "{} differs between modes", name);
    }
    assert!(!out_dir().join("multi/SQL/StoredProcedures.sql").exists());
}

#[test]
fn test_every_procedure_is_granted() {
    let script = single_script();
    for part in script.split(BANNER).skip(1) {
        let grant = format!(
            "GRANT EXECUTE ON [dbo].[{}] TO [app_user]\nGO\n",
            procedure_name(part)
        );
        assert!(part.ends_with(&grant));
    }
}

#[test]
fn test_excluded_table_produces_nothing() {
    let script = single_script();
    assert!(!script.contains("MigrationHistory"));
    assert!(!out_dir().join("CS/MigrationHistory.cs").exists());
    assert!(!out_dir().join("Repo/MigrationHistoryRepo.cs").exists());
}

#[test]
fn test_server_generated_keys_in_insert() {
    let script = single_script();
    let parts: Vec<&str> = script.split(BANNER).skip(1).collect();

    let orders_insert = parts
        .iter()
        .find(|p| procedure_name(p) == "usp_OrdersInsert")
        .unwrap();
    assert!(orders_insert.contains("\t@Id int OUTPUT,\n"));
    assert!(orders_insert.contains("\t@Note nvarchar(max)\n"));
    assert!(orders_insert.contains("SELECT SCOPE_IDENTITY()"));

    let documents_insert = parts
        .iter()
        .find(|p| procedure_name(p) == "usp_DocumentsInsert")
        .unwrap();
    assert!(documents_insert.contains("SET @DocumentGuid = NEWID()"));
    assert!(documents_insert.contains("@Body varbinary(max)"));
}

#[test]
fn test_models_generated_per_table() {
    let order = read(out_dir().join("CS/Order.cs"));
    assert!(order.contains("namespace Sales.Data"));
    assert!(order.contains("public class Order"));
    assert!(order.contains("public decimal Total { get; set; }"));
    assert!(order.contains("public DateTime OrderDate { get; set; }"));

    let customer = read(out_dir().join("CS/Customer.cs"));
    assert!(customer.contains("public decimal CreditLimit { get; set; }"));

    let document = read(out_dir().join("CS/Document.cs"));
    assert!(document.contains("public Guid DocumentGuid { get; set; }"));
    assert!(document.contains("public byte[] Body { get; set; }"));

    assert!(out_dir().join("CS/AuditLog.cs").exists());
}

#[test]
fn test_repositories_call_every_procedure() {
    let repo_dir = out_dir().join("Repo");
    let mut repositories = String::new();
    for class in ["Customer", "Order", "AuditLog", "Document"] {
        repositories.push_str(&read(repo_dir.join(format!("{}Repo.cs", class))));
    }
    for name in EXPECTED_PROCEDURES {
        assert!(
            repositories.contains(&format!("\"{}\"", name)),
            "no repository method calls {}",
            name
        );
    }

    let order_repo = read(repo_dir.join("OrderRepo.cs"));
    assert!(order_repo.contains("public class OrderRepo : BaseRepository"));
    assert!(order_repo.contains("public bool Insert(Order aOrder)"));
    assert!(order_repo.contains(
        "public List<Order> SelectAllByCustomerId_RegionId(int customerId, int regionId)"
    ));

    let audit_repo = read(repo_dir.join("AuditLogRepo.cs"));
    assert!(audit_repo.contains("public bool Insert(AuditLog aAuditLog)"));
    assert!(!audit_repo.contains("Update("));
    assert!(!audit_repo.contains("Select"));
}

#[test]
fn test_base_repository_uses_connection_string_name() {
    let base = read(out_dir().join("Repo/BaseRepository.cs"));
    assert!(base.contains("namespace Sales.Data"));
    assert!(base.contains("\"SalesDb\""));
}

#[test]
fn test_ddl_schema_matches_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));

    CodegenBuilder::new(manifest.join("schema/sales.sql"))
        .output_dir(dir.path())
        .prefix("usp_")
        .namespace("Sales.Data")
        .connection_string_name("SalesDb")
        .multiple_files()
        .generate()
        .unwrap();

    let from_ddl: Vec<&str> = EXPECTED_PROCEDURES
        .iter()
        .copied()
        .filter(|n| n.starts_with("usp_Customers") || n.starts_with("usp_Orders"))
        .collect();
    assert_eq!(from_ddl.len(), 12);

    for name in from_ddl {
        let ddl_sql = read(dir.path().join(format!("SQL/{}.sql", name)));
        let snapshot_sql = read(out_dir().join(format!("multi/SQL/{}.sql", name)));
        // Snapshot run grants to app_user; the DDL run has no grant login
        let snapshot_body = snapshot_sql
            .split("\nGRANT EXECUTE")
            .next()
            .unwrap();
        assert_eq!(ddl_sql, snapshot_body, "{} differs", name);
    }

    for rel in ["CS/Order.cs", "CS/Customer.cs", "Repo/OrderRepo.cs"] {
        assert_eq!(read(dir.path().join(rel)), read(out_dir().join(rel)));
    }
}
