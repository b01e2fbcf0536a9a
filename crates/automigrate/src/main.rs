//! automigrate CLI
//!
//! Command-line tool for inspecting and converging tables from JSON
//! schema files.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use automigrate::prelude::*;
use automigrate::schema_file::SchemaFile;

/// Keep database tables converged with record schemas.
#[derive(Parser)]
#[command(name = "automigrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Connection string (`key=value;` pairs).
    #[arg(short, long, env = "AUTOMIGRATE_CONNECTION")]
    connection: String,

    /// Database dialect.
    #[arg(short, long, value_enum, default_value_t = Dialect::Sqlite)]
    dialect: Dialect,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Dialect {
    /// SQLite (`Data Source` or `Filename`).
    Sqlite,
    /// SQL Server (`Server` or `Data Source`, and `Database`).
    SqlServer,
}

impl From<Dialect> for DialectKind {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Sqlite => Self::Sqlite,
            Dialect::SqlServer => Self::SqlServer,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show a table's columns and nullability.
    Inspect {
        /// Table name.
        #[arg(short, long)]
        table: String,
    },

    /// Show the DDL needed to converge a table (dry run).
    Plan {
        /// Path to a JSON schema file.
        #[arg(short, long)]
        schema: PathBuf,
    },

    /// Converge a table to a schema file.
    Apply {
        /// Path to a JSON schema file.
        #[arg(short, long)]
        schema: PathBuf,
    },

    /// Show the settings scanned from the connection string.
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let dialect = DialectKind::from(cli.dialect);
    let reconciler = Reconciler::new(dialect);

    match cli.command {
        Commands::Inspect { table } => {
            let snapshot = reconciler.inspect(&table, &cli.connection).await?;
            if !snapshot.exists {
                info!(table = %table, "Table does not exist");
                return Ok(());
            }

            println!("\nTable {table}:");
            println!("{:-<60}", "");
            for column in &snapshot.columns {
                let null = if snapshot.is_nullable(column) {
                    "NULL"
                } else {
                    "NOT NULL"
                };
                println!(" {column:<40} {null}");
            }
            println!();
        }

        Commands::Plan { schema } => {
            let file = SchemaFile::load(&schema)?;
            let report = reconciler
                .dry_run(true)
                .ensure_table(&file.to_record_schema(), file.table(), &cli.connection)
                .await?;
            print_report(&report);
        }

        Commands::Apply { schema } => {
            let file = SchemaFile::load(&schema)?;
            let report = reconciler
                .ensure_table(&file.to_record_schema(), file.table(), &cli.connection)
                .await?;
            print_report(&report);
        }

        Commands::Settings => match dialect {
            DialectKind::Sqlite => {
                let settings = SqliteSettings::parse(&cli.connection)?;
                println!("Data Source: {}", settings.data_source);
            }
            DialectKind::SqlServer => {
                let settings = SqlServerSettings::parse(&cli.connection)?;
                println!("Server:   {}", settings.server);
                println!("Database: {}", settings.database);
            }
        },
    }

    Ok(())
}

fn print_report(report: &ReconcileReport) {
    if report.is_converged() {
        info!(table = %report.table, "Table is up to date.");
        return;
    }

    let verb = if report.executed {
        "Executed"
    } else {
        "Would execute"
    };
    println!(
        "\n{verb} on {} (checked {}):",
        report.table,
        report.checked_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("{:-<60}", "");
    for sql in &report.statements {
        println!("{sql};");
    }
    println!();
}
