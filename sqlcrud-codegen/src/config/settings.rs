//! Configuration settings for sqlcrud-codegen

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use crate::error::{CodegenError, Result};

/// Main configuration struct for code generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path to the schema source (`.toml` snapshot or T-SQL DDL script)
    #[serde(default)]
    pub schema_file: PathBuf,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// Whether to generate stored procedure scripts
    #[serde(default = "default_generate_sql")]
    pub generate_sql: bool,

    /// Whether to generate model, repository and base repository classes
    #[serde(default = "default_generate_classes")]
    pub generate_classes: bool,

    /// Output directory for stored procedure scripts
    #[serde(default = "default_output_sql_dir")]
    pub output_sql_dir: PathBuf,

    /// Output directory for model classes
    #[serde(default = "default_output_models_dir")]
    pub output_models_dir: PathBuf,

    /// Output directory for repository classes
    #[serde(default = "default_output_repo_dir")]
    pub output_repo_dir: PathBuf,

    /// Prefix prepended to every procedure name
    #[serde(default = "default_stored_procedure_prefix")]
    pub stored_procedure_prefix: String,

    /// Login granted EXECUTE on each procedure; empty disables grants
    #[serde(default = "default_grant_login_name")]
    pub grant_login_name: String,

    /// Write one script per procedure instead of a single StoredProcedures.sql
    #[serde(default = "default_create_multiple_files")]
    pub create_multiple_files: bool,

    /// C# namespace of the generated classes
    #[serde(default = "default_target_namespace")]
    pub target_namespace: String,

    /// Connection string name read by the generated BaseRepository
    #[serde(default = "default_connection_string_name")]
    pub connection_string_name: String,

    /// Database named in the grant script's USE statement; empty omits it
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Dry run mode - preview without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}
fn default_generate_sql() -> bool {
    defaults::GENERATE_SQL
}
fn default_generate_classes() -> bool {
    defaults::GENERATE_CLASSES
}
fn default_output_sql_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_SQL_DIR)
}
fn default_output_models_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_MODELS_DIR)
}
fn default_output_repo_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_REPO_DIR)
}
fn default_stored_procedure_prefix() -> String {
    defaults::STORED_PROCEDURE_PREFIX.to_string()
}
fn default_grant_login_name() -> String {
    defaults::GRANT_LOGIN_NAME.to_string()
}
fn default_create_multiple_files() -> bool {
    defaults::CREATE_MULTIPLE_FILES
}
fn default_target_namespace() -> String {
    defaults::TARGET_NAMESPACE.to_string()
}
fn default_connection_string_name() -> String {
    defaults::CONNECTION_STRING_NAME.to_string()
}
fn default_database_name() -> String {
    defaults::DATABASE_NAME.to_string()
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            schema_file: PathBuf::new(),
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            generate_sql: default_generate_sql(),
            generate_classes: default_generate_classes(),
            output_sql_dir: default_output_sql_dir(),
            output_models_dir: default_output_models_dir(),
            output_repo_dir: default_output_repo_dir(),
            stored_procedure_prefix: default_stored_procedure_prefix(),
            grant_login_name: default_grant_login_name(),
            create_multiple_files: default_create_multiple_files(),
            target_namespace: default_target_namespace(),
            connection_string_name: default_connection_string_name(),
            database_name: default_database_name(),
            dry_run: default_dry_run(),
            log_level: None,
        }
    }
}

impl CodegenConfig {
    /// Create a default config with the given schema file
    pub fn default_with_schema(schema_file: PathBuf) -> Self {
        Self {
            schema_file,
            ..Default::default()
        }
    }

    /// Point all three output directories below one root (`SQL`, `CS`, `Repo`)
    pub fn set_output_root(&mut self, root: &Path) {
        self.output_sql_dir = root.join(defaults::SQL_SUBDIR);
        self.output_models_dir = root.join(defaults::MODELS_SUBDIR);
        self.output_repo_dir = root.join(defaults::REPO_SUBDIR);
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CodegenConfig = toml::from_str(&content).map_err(|e| {
            CodegenError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder =
                builder.add_source(File::with_name(defaults::CONFIG_FILE_NAME).required(false));
        }

        // SQLCRUD_GRANT_LOGIN_NAME=app_user, SQLCRUD_CREATE_MULTIPLE_FILES=true, ...
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.schema_file.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "schema_file is required".into(),
            ));
        }

        if !self.schema_file.exists() {
            return Err(CodegenError::ValidationError(format!(
                "Schema file not found: {}",
                self.schema_file.display()
            )));
        }

        if !self.generate_sql && !self.generate_classes {
            return Err(CodegenError::ValidationError(
                "at least one of generate_sql or generate_classes must be true".into(),
            ));
        }

        if self.generate_classes {
            if self.target_namespace.trim().is_empty() {
                return Err(CodegenError::ValidationError(
                    "target_namespace is required when generate_classes is true".into(),
                ));
            }
            if self.connection_string_name.trim().is_empty() {
                return Err(CodegenError::ValidationError(
                    "connection_string_name is required when generate_classes is true".into(),
                ));
            }
        }

        if self.grant_login_name.contains(']') {
            return Err(CodegenError::ValidationError(format!(
                "grant_login_name cannot contain ']': {}",
                self.grant_login_name
            )));
        }

        Ok(())
    }
}
