//! CLI entry point for sqlcrud-codegen

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sqlcrud_codegen::codegen::{class_name, plan_procedures};
use sqlcrud_codegen::config::CodegenConfig;

#[derive(Parser)]
#[command(name = "sqlcrud-codegen")]
#[command(about = "Generate T-SQL CRUD stored procedures and C# data-access classes")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format); defaults to ./sqlcrud.toml if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to schema file, a DDL script or a .toml snapshot (overrides config)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Output root (overrides config, sets <root>/SQL, <root>/CS and <root>/Repo)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stored procedure name prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Login to GRANT EXECUTE on each procedure
    #[arg(long)]
    grant_login: Option<String>,

    /// Namespace of the generated C# classes
    #[arg(long)]
    namespace: Option<String>,

    /// Write one script per procedure instead of StoredProcedures.sql
    #[arg(long)]
    multiple_files: bool,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all (procedures and classes)
    Generate,
    /// Generate only stored procedure scripts
    Sql,
    /// Generate only model and repository classes
    Classes,
    /// Inspect schema (show parsed tables and planned procedures)
    Inspect,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = CodegenConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides
    if let Some(schema) = cli.schema {
        config.schema_file = schema;
    }
    if let Some(output) = cli.output {
        config.set_output_root(&output);
    }
    if let Some(prefix) = cli.prefix {
        config.stored_procedure_prefix = prefix;
    }
    if let Some(login) = cli.grant_login {
        config.grant_login_name = login;
    }
    if let Some(namespace) = cli.namespace {
        config.target_namespace = namespace;
    }
    if cli.multiple_files {
        config.create_multiple_files = true;
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    // Apply command-specific settings
    match &cli.command {
        Some(Commands::Sql) => {
            config.generate_classes = false;
        }
        Some(Commands::Classes) => {
            config.generate_sql = false;
        }
        Some(Commands::Inspect) => {
            return inspect_schema(&config);
        }
        _ => {}
    }

    // Validate configuration
    config.validate()?;

    info!("Generating code from schema: {:?}", config.schema_file);

    if config.dry_run {
        println!("Dry run mode - would generate:");
        let tables = sqlcrud_codegen::load_tables(&config)?;
        for table in &tables {
            let class = class_name(&table.name);
            if config.generate_sql {
                for planned in plan_procedures(table, &config.stored_procedure_prefix) {
                    println!("  Procedure: {}", planned.name);
                }
            }
            if config.generate_classes {
                println!(
                    "  Model:     {}/{}.cs",
                    config.output_models_dir.display(),
                    class
                );
                println!(
                    "  Repo:      {}/{}Repo.cs",
                    config.output_repo_dir.display(),
                    class
                );
            }
        }
        return Ok(());
    }

    let summary = sqlcrud_codegen::generate(&config)?;

    info!(
        "Code generation completed successfully ({} tables, {} procedures)",
        summary.tables, summary.procedures
    );
    Ok(())
}

fn inspect_schema(config: &CodegenConfig) -> Result<()> {
    let tables = sqlcrud_codegen::load_tables(config)?;

    println!("Parsed {} tables:\n", tables.len());
    for table in &tables {
        println!("Table: {} (class {})", table.name, class_name(&table.name));
        println!("  Columns:");
        for col in table.columns() {
            let mut facets = Vec::new();
            if let Some(length) = col.length {
                facets.push(format!("length={}", length));
            }
            if let Some(precision) = col.precision {
                facets.push(format!("precision={}", precision));
            }
            if let Some(scale) = col.scale {
                facets.push(format!("scale={}", scale));
            }
            let mut flags = Vec::new();
            if col.is_identity {
                flags.push("IDENTITY");
            }
            if col.is_rowguidcol {
                flags.push("ROWGUIDCOL");
            }
            if col.is_computed {
                flags.push("COMPUTED");
            }
            println!(
                "    - {} {} [{}] {}",
                col.name,
                col.data_type,
                facets.join(", "),
                flags.join(" ")
            );
        }
        let pk: Vec<&str> = table.primary_keys().iter().map(|c| c.name.as_str()).collect();
        if !pk.is_empty() {
            println!("  Primary Key: {:?}", pk);
        }
        let fks = table.foreign_keys();
        if !fks.is_empty() {
            println!("  Foreign Keys:");
            for (name, members) in &fks {
                let cols: Vec<&str> = members.iter().map(|c| c.name.as_str()).collect();
                println!("    - {} ({})", name, cols.join(", "));
            }
        }
        println!("  Procedures:");
        for planned in plan_procedures(table, &config.stored_procedure_prefix) {
            println!("    - {}", planned.name);
        }
        println!();
    }

    Ok(())
}
