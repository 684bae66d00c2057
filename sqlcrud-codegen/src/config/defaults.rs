//! Default configuration values - single source of truth

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (none)
pub const EXCLUDE_TABLES: &str = "";

/// Whether to generate stored procedure scripts by default
pub const GENERATE_SQL: bool = true;

/// Whether to generate model and repository classes by default
pub const GENERATE_CLASSES: bool = true;

/// Default output directory for stored procedure scripts
pub const OUTPUT_SQL_DIR: &str = "./generated/SQL";

/// Default output directory for model classes
pub const OUTPUT_MODELS_DIR: &str = "./generated/CS";

/// Default output directory for repository classes
pub const OUTPUT_REPO_DIR: &str = "./generated/Repo";

/// Subdirectory names used when a single output root is given
pub const SQL_SUBDIR: &str = "SQL";
pub const MODELS_SUBDIR: &str = "CS";
pub const REPO_SUBDIR: &str = "Repo";

/// Default stored procedure prefix (none)
pub const STORED_PROCEDURE_PREFIX: &str = "";

/// Default grant login (none, so no GRANT blocks)
pub const GRANT_LOGIN_NAME: &str = "";

/// Whether each procedure gets its own script by default
pub const CREATE_MULTIPLE_FILES: bool = false;

/// Default namespace for generated classes
pub const TARGET_NAMESPACE: &str = "DataAccess";

/// Default connection string name read by BaseRepository
pub const CONNECTION_STRING_NAME: &str = "DBConString";

/// Default database name for the grant script (none, so no USE statement)
pub const DATABASE_NAME: &str = "";

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

/// Script name used in single-file mode
pub const SINGLE_SCRIPT_FILE: &str = "StoredProcedures.sql";

/// Grant script name used in multiple-file mode
pub const GRANT_SCRIPT_FILE: &str = "GrantUserPermissions.sql";

/// Environment variable prefix for layered configuration
pub const ENV_PREFIX: &str = "SQLCRUD";

/// Config file looked up in the working directory when none is given
pub const CONFIG_FILE_NAME: &str = "sqlcrud";
