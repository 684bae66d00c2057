//! Main code generator orchestrator

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::{defaults, CodegenConfig};
use crate::error::Result;
use crate::parser::Table;

use super::base_repository::generate_base_repository;
use super::model_generator::generate_model;
use super::naming::class_name;
use super::output::OutputSink;
use super::procedure_generator::{
    generate_procedures, grant_user_script, single_file_script, GeneratedProcedure,
    ProcedureOptions,
};
use super::repository_generator::generate_repository;

/// Counts reported after a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub tables: usize,
    pub procedures: usize,
    pub classes: usize,
}

/// Drives SQL and C# generation for a set of tables
pub struct CodeGenerator<'a> {
    config: &'a CodegenConfig,
}

impl<'a> CodeGenerator<'a> {
    /// Create a new code generator with the given configuration
    pub fn new(config: &'a CodegenConfig) -> Self {
        Self { config }
    }

    /// Generate everything the configuration asks for.
    ///
    /// Tables are processed in order. In multiple-file mode each script is
    /// written as soon as it is rendered; in single-file mode the scripts are
    /// buffered and `StoredProcedures.sql` is written once at the end. An
    /// error stops the run; files already written are left in place.
    pub fn generate(&self, tables: &[Table], sink: &mut dyn OutputSink) -> Result<GenerationSummary> {
        let mut summary = GenerationSummary::default();
        if tables.is_empty() {
            warn!("No tables selected, nothing to generate");
            return Ok(summary);
        }

        let config = self.config;
        let options = ProcedureOptions {
            prefix: &config.stored_procedure_prefix,
            grant_login_name: &config.grant_login_name,
        };
        let mut script = String::new();

        if config.generate_sql && !config.grant_login_name.is_empty() {
            let user_script = grant_user_script(&config.database_name, &config.grant_login_name);
            if config.create_multiple_files {
                sink.write(
                    &config.output_sql_dir.join(defaults::GRANT_SCRIPT_FILE),
                    &user_script,
                )?;
            } else {
                script.push_str(&user_script);
            }
        }

        if config.generate_classes {
            let base = generate_base_repository(
                &config.target_namespace,
                &config.connection_string_name,
            );
            sink.write(&config.output_repo_dir.join("BaseRepository.cs"), &base)?;
            summary.classes += 1;
        }

        for table in tables {
            debug!("Generating artifacts for table {}", table.name);

            if config.generate_sql {
                let procedures = generate_procedures(table, &options)?;
                summary.procedures += procedures.len();
                if config.create_multiple_files {
                    self.write_procedure_files(&procedures, sink)?;
                } else {
                    script.push_str(&single_file_script(&procedures));
                }
            }

            if config.generate_classes {
                let class = class_name(&table.name);
                let model = generate_model(table, &config.target_namespace)?;
                let repository = generate_repository(
                    table,
                    &config.stored_procedure_prefix,
                    &config.target_namespace,
                )?;
                sink.write(
                    &config.output_models_dir.join(format!("{}.cs", class)),
                    &model,
                )?;
                sink.write(
                    &config.output_repo_dir.join(format!("{}Repo.cs", class)),
                    &repository,
                )?;
                summary.classes += 2;
            }

            summary.tables += 1;
        }

        if config.generate_sql && !config.create_multiple_files {
            sink.write(&self.single_script_path(), &script)?;
        }

        info!(
            "Generated {} procedures and {} classes for {} tables",
            summary.procedures, summary.classes, summary.tables
        );
        Ok(summary)
    }

    /// Path of the combined script in single-file mode
    pub fn single_script_path(&self) -> PathBuf {
        self.config
            .output_sql_dir
            .join(defaults::SINGLE_SCRIPT_FILE)
    }

    fn write_procedure_files(
        &self,
        procedures: &[GeneratedProcedure],
        sink: &mut dyn OutputSink,
    ) -> Result<()> {
        for procedure in procedures {
            let path = self
                .config
                .output_sql_dir
                .join(format!("{}.sql", procedure.name));
            sink.write(&path, &procedure.sql)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::fixtures;
    use crate::codegen::output::{DryRunSink, FileSink};
    use crate::codegen::procedure_generator::BANNER;
    use crate::error::CodegenError;
    use crate::parser::Column;
    use std::fs;
    use std::path::Path;

    fn config_for(root: &Path) -> CodegenConfig {
        let mut config = CodegenConfig::default();
        config.set_output_root(root);
        config.stored_procedure_prefix = "usp_".to_string();
        config.target_namespace = "Sales.Data".to_string();
        config
    }

    fn tables() -> Vec<Table> {
        vec![fixtures::orders(), fixtures::audit_log(), fixtures::documents()]
    }

    #[test]
    fn test_single_file_mode() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        let mut sink = FileSink::new();

        let summary = CodeGenerator::new(&config)
            .generate(&tables(), &mut sink)
            .unwrap();
        assert_eq!(summary.tables, 3);
        assert_eq!(summary.procedures, 7 + 1 + 5);
        assert_eq!(summary.classes, 7);

        let script = fs::read_to_string(dir.path().join("SQL/StoredProcedures.sql")).unwrap();
        assert_eq!(script.matches(BANNER).count(), summary.procedures);
        assert!(script.starts_with(BANNER));
        assert!(dir.path().join("CS/Order.cs").exists());
        assert!(dir.path().join("CS/AuditLog.cs").exists());
        assert!(dir.path().join("Repo/DocumentRepo.cs").exists());
        assert!(dir.path().join("Repo/BaseRepository.cs").exists());
    }

    #[test]
    fn test_multiple_files_match_single_file() {
        let single_dir = tempfile::tempdir().unwrap();
        let multi_dir = tempfile::tempdir().unwrap();

        let single = config_for(single_dir.path());
        let mut multi = config_for(multi_dir.path());
        multi.create_multiple_files = true;

        let tables = tables();
        CodeGenerator::new(&single)
            .generate(&tables, &mut FileSink::new())
            .unwrap();
        let mut sink = FileSink::new();
        CodeGenerator::new(&multi).generate(&tables, &mut sink).unwrap();

        let script =
            fs::read_to_string(single_dir.path().join("SQL/StoredProcedures.sql")).unwrap();
        let parts: Vec<&str> = script.split(BANNER).skip(1).collect();

        let proc_files: Vec<&PathBuf> = sink
            .written()
            .iter()
            .filter(|p| p.extension().map(|e| e == "sql").unwrap_or(false))
            .collect();
        assert_eq!(parts.len(), proc_files.len());
        for (part, path) in parts.iter().zip(proc_files) {
            assert_eq!(*part, fs::read_to_string(path).unwrap());
        }
    }

    #[test]
    fn test_grant_script_placement() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(dir.path());
        config.grant_login_name = "app_user".to_string();
        config.database_name = "Sales".to_string();

        CodeGenerator::new(&config)
            .generate(&tables(), &mut FileSink::new())
            .unwrap();
        let script = fs::read_to_string(dir.path().join("SQL/StoredProcedures.sql")).unwrap();
        assert!(script.starts_with("USE [Sales]\nGO\n\n"));
        assert!(script.contains("GRANT EXECUTE ON [dbo].[usp_OrdersInsert] TO [app_user]"));

        config.create_multiple_files = true;
        let mut sink = FileSink::new();
        CodeGenerator::new(&config).generate(&tables(), &mut sink).unwrap();
        assert_eq!(
            sink.written()[0],
            dir.path().join("SQL/GrantUserPermissions.sql")
        );
    }

    #[test]
    fn test_sql_only_and_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(dir.path());
        config.generate_classes = false;

        let mut sink = DryRunSink::new();
        let summary = CodeGenerator::new(&config)
            .generate(&tables(), &mut sink)
            .unwrap();
        assert_eq!(summary.classes, 0);
        assert_eq!(sink.written(), &[dir.path().join("SQL/StoredProcedures.sql")]);
        assert!(!dir.path().join("SQL").exists());
    }

    #[test]
    fn test_unsupported_type_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        let mut bad = Table::new("Shapes");
        bad.push_column(Column::new("Outline", "geometry"));
        let tables = vec![fixtures::orders(), bad];

        let err = CodeGenerator::new(&config)
            .generate(&tables, &mut FileSink::new())
            .unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedType(_)));
        // Single-file script is only written after every table succeeded
        assert!(!dir.path().join("SQL/StoredProcedures.sql").exists());
        assert!(dir.path().join("CS/Order.cs").exists());
    }

    #[test]
    fn test_output_is_idempotent() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        for dir in [&first, &second] {
            CodeGenerator::new(&config_for(dir.path()))
                .generate(&tables(), &mut FileSink::new())
                .unwrap();
        }
        for rel in ["SQL/StoredProcedures.sql", "CS/Order.cs", "Repo/OrderRepo.cs"] {
            assert_eq!(
                fs::read(first.path().join(rel)).unwrap(),
                fs::read(second.path().join(rel)).unwrap()
            );
        }
    }

    #[test]
    fn test_empty_table_list() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        let mut sink = FileSink::new();
        let summary = CodeGenerator::new(&config).generate(&[], &mut sink).unwrap();
        assert_eq!(summary, GenerationSummary::default());
        assert!(sink.written().is_empty());
    }
}
