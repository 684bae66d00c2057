//! sqlcrud-codegen: Generate T-SQL CRUD stored procedures and C# data-access
//! classes from SQL Server schemas
//!
//! This crate provides both a CLI tool and a library. It reads a schema from a
//! T-SQL DDL script (parsed with `sqlparser-rs`) or a TOML snapshot of the
//! catalog rows, and generates per table:
//!
//! - Insert/Update/Delete/Select stored procedures, plus DeleteAllBy and
//!   SelectAllBy procedures for every foreign key
//! - A C# model class with one property per column
//! - A Dapper repository class with one method per procedure
//!
//! # Usage in build.rs (Recommended)
//!
//! Configure in your `Cargo.toml`:
//!
//! ```toml
//! [package.metadata.sqlcrud-codegen]
//! schema_file = "schema/sales.toml"
//! stored_procedure_prefix = "usp_"
//! target_namespace = "Sales.Data"
//! ```
//!
//! Then use a minimal `build.rs`:
//!
//! ```rust,ignore
//! fn main() {
//!     sqlcrud_codegen::generate_from_cargo_metadata()
//!         .expect("Failed to generate data-access code");
//! }
//! ```
//!
//! # Alternative: Programmatic Configuration
//!
//! ```rust,ignore
//! sqlcrud_codegen::CodegenBuilder::new("schema.sql")
//!     .output_dir("generated")
//!     .prefix("usp_")
//!     .grant_login("app_user")
//!     .generate()
//!     .expect("Failed to generate data-access code");
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! sqlcrud-codegen --schema schema.sql --output ./generated --prefix usp_ generate
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod parser;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use codegen::{CodeGenerator, DryRunSink, FileSink, GenerationSummary, OutputSink};
pub use config::CodegenConfig;
pub use error::{CodegenError, Result};

/// Main entry point for code generation
pub fn generate(config: &CodegenConfig) -> Result<GenerationSummary> {
    let tables = load_tables(config)?;

    let generator = CodeGenerator::new(config);
    let summary = if config.dry_run {
        let mut sink = DryRunSink::new();
        let summary = generator.generate(&tables, &mut sink)?;
        info!(
            "Dry run: {} files, {} bytes not written",
            sink.written().len(),
            sink.total_bytes()
        );
        summary
    } else {
        generator.generate(&tables, &mut FileSink::new())?
    };

    info!("Code generation complete");
    Ok(summary)
}

/// Load the schema named by the config and apply the table filters
pub fn load_tables(config: &CodegenConfig) -> Result<Vec<parser::Table>> {
    info!("Loading schema: {:?}", config.schema_file);
    let tables = parser::load_schema(&config.schema_file)?;
    info!("Found {} tables", tables.len());

    let tables = filter_tables(tables, &config.include_tables, &config.exclude_tables);
    debug!(
        "After filtering: {} tables (include={}, exclude={})",
        tables.len(),
        config.include_tables,
        config.exclude_tables
    );
    Ok(tables)
}

/// Filter tables based on include/exclude patterns
fn filter_tables(tables: Vec<parser::Table>, include: &str, exclude: &str) -> Vec<parser::Table> {
    let include_all = include.trim() == "*" || include.trim().is_empty();
    let include_set: HashSet<String> = if include_all {
        HashSet::new()
    } else {
        include.split(',').map(|s| s.trim().to_string()).collect()
    };
    let exclude_set: HashSet<String> = exclude
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    tables
        .into_iter()
        .filter(|t| {
            let name = &t.name;
            let included = include_all || include_set.contains(name);
            let excluded = exclude_set.contains(name);
            included && !excluded
        })
        .collect()
}

/// Builder pattern for easy configuration in build.rs
pub struct CodegenBuilder {
    config: CodegenConfig,
}

impl CodegenBuilder {
    /// Create a new builder with the given schema file
    pub fn new(schema_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig::default_with_schema(schema_file.as_ref().to_path_buf()),
        }
    }

    /// Set one output root; scripts, models and repositories go to
    /// `SQL`, `CS` and `Repo` below it
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.set_output_root(dir.as_ref());
        self
    }

    /// Set the output directory for procedure scripts only
    pub fn output_sql_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_sql_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the output directory for model classes only
    pub fn output_models_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_models_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the output directory for repository classes only
    pub fn output_repo_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_repo_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set tables to include
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Generate only stored procedure scripts
    pub fn sql_only(mut self) -> Self {
        self.config.generate_classes = false;
        self
    }

    /// Generate only C# classes
    pub fn classes_only(mut self) -> Self {
        self.config.generate_sql = false;
        self
    }

    /// Set the stored procedure name prefix
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.config.stored_procedure_prefix = prefix.to_string();
        self
    }

    /// Grant EXECUTE on every procedure to this login
    pub fn grant_login(mut self, login: &str) -> Self {
        self.config.grant_login_name = login.to_string();
        self
    }

    /// Database named in the grant script
    pub fn database_name(mut self, name: &str) -> Self {
        self.config.database_name = name.to_string();
        self
    }

    /// Write one script per procedure
    pub fn multiple_files(mut self) -> Self {
        self.config.create_multiple_files = true;
        self
    }

    /// Set the namespace of the generated classes
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.config.target_namespace = namespace.to_string();
        self
    }

    /// Set the connection string name read by BaseRepository
    pub fn connection_string_name(mut self, name: &str) -> Self {
        self.config.connection_string_name = name.to_string();
        self
    }

    /// Enable dry run mode (preview without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    /// Access the configuration built so far
    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Generate the code
    pub fn generate(self) -> Result<GenerationSummary> {
        self.config.validate()?;
        generate(&self.config)
    }
}

/// Configuration for `[package.metadata.sqlcrud-codegen]` in Cargo.toml
#[derive(Debug, Clone, Default, serde::Deserialize)]
struct CargoMetadataConfig {
    /// Path to the schema file (required)
    schema_file: Option<String>,

    /// Tables to include (optional, defaults to all)
    #[serde(default)]
    include_tables: Vec<String>,

    /// Tables to exclude (optional)
    #[serde(default)]
    exclude_tables: Vec<String>,

    /// Whether to generate procedure scripts (default: true)
    generate_sql: Option<bool>,

    /// Whether to generate C# classes (default: true)
    generate_classes: Option<bool>,

    /// Output directories, relative to the manifest (default: under OUT_DIR)
    output_sql_dir: Option<String>,
    output_models_dir: Option<String>,
    output_repo_dir: Option<String>,

    stored_procedure_prefix: Option<String>,
    grant_login_name: Option<String>,
    database_name: Option<String>,
    create_multiple_files: Option<bool>,
    target_namespace: Option<String>,
    connection_string_name: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoToml {
    package: Option<CargoPackage>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackage {
    metadata: Option<CargoPackageMetadata>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackageMetadata {
    #[serde(rename = "sqlcrud-codegen")]
    sqlcrud_codegen: Option<CargoMetadataConfig>,
}

/// Generate code from `[package.metadata.sqlcrud-codegen]` in Cargo.toml
///
/// ```rust,ignore
/// // build.rs
/// fn main() {
///     sqlcrud_codegen::generate_from_cargo_metadata()
///         .expect("Failed to generate data-access code");
/// }
/// ```
///
/// Configure in Cargo.toml:
///
/// ```toml
/// [package.metadata.sqlcrud-codegen]
/// schema_file = "schema.sql"
/// include_tables = ["Orders", "Customers"]
/// grant_login_name = "app_user"
/// ```
///
/// Output lands in `$OUT_DIR/SQL`, `$OUT_DIR/CS` and `$OUT_DIR/Repo` unless
/// the corresponding `output_*_dir` key is set.
pub fn generate_from_cargo_metadata() -> Result<GenerationSummary> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").map_err(|_| {
        CodegenError::ConfigError(
            "CARGO_MANIFEST_DIR not set - are you running from build.rs?".into(),
        )
    })?;

    let cargo_toml_path = PathBuf::from(&manifest_dir).join("Cargo.toml");
    let cargo_toml_content = std::fs::read_to_string(&cargo_toml_path)?;

    let cargo_toml: CargoToml = toml::from_str(&cargo_toml_content).map_err(|e| {
        CodegenError::ConfigError(format!(
            "Failed to parse {}: {}",
            cargo_toml_path.display(),
            e
        ))
    })?;

    let metadata_config = cargo_toml
        .package
        .and_then(|p| p.metadata)
        .and_then(|m| m.sqlcrud_codegen)
        .ok_or_else(|| {
            CodegenError::ConfigError(
                "Missing [package.metadata.sqlcrud-codegen] section in Cargo.toml".into(),
            )
        })?;

    let schema_file = metadata_config.schema_file.clone().ok_or_else(|| {
        CodegenError::ConfigError(
            "schema_file is required in [package.metadata.sqlcrud-codegen]".into(),
        )
    })?;

    // Resolve schema_file relative to manifest dir
    let schema_path = PathBuf::from(&manifest_dir).join(&schema_file);

    let out_dir = std::env::var("OUT_DIR").map(PathBuf::from).map_err(|_| {
        CodegenError::ConfigError("OUT_DIR not set - are you running from build.rs?".into())
    })?;

    let builder = apply_metadata(
        CodegenBuilder::new(&schema_path).output_dir(&out_dir),
        metadata_config,
        Path::new(&manifest_dir),
    );

    println!("cargo:rerun-if-changed={}", schema_path.display());
    println!("cargo:rerun-if-changed={}", cargo_toml_path.display());

    builder.generate()
}

fn apply_metadata(
    mut builder: CodegenBuilder,
    metadata: CargoMetadataConfig,
    manifest_dir: &Path,
) -> CodegenBuilder {
    if let Some(dir) = metadata.output_sql_dir {
        builder = builder.output_sql_dir(manifest_dir.join(dir));
    }
    if let Some(dir) = metadata.output_models_dir {
        builder = builder.output_models_dir(manifest_dir.join(dir));
    }
    if let Some(dir) = metadata.output_repo_dir {
        builder = builder.output_repo_dir(manifest_dir.join(dir));
    }

    if !metadata.include_tables.is_empty() {
        let tables: Vec<&str> = metadata.include_tables.iter().map(|s| s.as_str()).collect();
        builder = builder.include_tables(&tables);
    }
    if !metadata.exclude_tables.is_empty() {
        let tables: Vec<&str> = metadata.exclude_tables.iter().map(|s| s.as_str()).collect();
        builder = builder.exclude_tables(&tables);
    }

    if let Some(false) = metadata.generate_sql {
        builder = builder.classes_only();
    }
    if let Some(false) = metadata.generate_classes {
        builder = builder.sql_only();
    }
    if let Some(true) = metadata.create_multiple_files {
        builder = builder.multiple_files();
    }

    if let Some(prefix) = metadata.stored_procedure_prefix {
        builder = builder.prefix(&prefix);
    }
    if let Some(login) = metadata.grant_login_name {
        builder = builder.grant_login(&login);
    }
    if let Some(name) = metadata.database_name {
        builder = builder.database_name(&name);
    }
    if let Some(namespace) = metadata.target_namespace {
        builder = builder.namespace(&namespace);
    }
    if let Some(name) = metadata.connection_string_name {
        builder = builder.connection_string_name(&name);
    }

    builder
}
