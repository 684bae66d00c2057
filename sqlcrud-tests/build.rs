use std::path::PathBuf;

fn main() {
    // Single-file run configured from [package.metadata.sqlcrud-codegen]
    sqlcrud_codegen::generate_from_cargo_metadata().expect("codegen failed");

    // Same schema and settings, one script per procedure
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    sqlcrud_codegen::CodegenBuilder::new("schema/sales.toml")
        .output_dir(out_dir.join("multi"))
        .exclude_tables(&["MigrationHistory"])
        .prefix("usp_")
        .grant_login("app_user")
        .database_name("Sales")
        .namespace("Sales.Data")
        .connection_string_name("SalesDb")
        .multiple_files()
        .generate()
        .expect("multi-file codegen failed");

    println!("cargo:rerun-if-changed=schema/sales.toml");
}
