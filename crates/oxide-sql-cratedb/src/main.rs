//! oxide-cratedb CLI
//!
//! Command-line tool for inspecting a CrateDB schema the way the dialect
//! sees it.

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use oxide_sql_cratedb::prelude::*;

/// Inspect CrateDB schemas through the oxide-sql dialect.
#[derive(Parser)]
#[command(name = "oxide-cratedb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (PostgreSQL wire protocol).
    #[arg(
        short,
        long,
        env = "DATABASE_URL",
        default_value = "postgres://crate@localhost:5432/doc"
    )]
    database: String,

    /// Schema to introspect.
    #[arg(short, long, env = "CRATEDB_SCHEMA", default_value = "doc")]
    schema: String,

    /// System catalog generation (pg-catalog or information-schema).
    #[arg(long, env = "CRATEDB_CATALOG", default_value = "pg-catalog")]
    catalog: CatalogGeneration,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List user tables.
    Tables,

    /// Show the columns of a table.
    Columns {
        /// Table name.
        table: String,
    },

    /// Show the indexes of a table.
    Indexes {
        /// Table name.
        table: String,
    },

    /// Check whether a table exists.
    HasTable {
        /// Table name.
        table: String,
    },

    /// Check whether a column exists.
    HasColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// Print the CrateDB type for an abstract type (offline).
    TypeOf {
        /// Abstract type name, e.g. VARCHAR or BIGINT.
        sql_type: String,

        /// Length argument.
        #[arg(long, default_value_t = 0)]
        length: usize,

        /// Second length argument (scale).
        #[arg(long, default_value_t = 0)]
        length2: usize,

        /// Treat the column as auto-incrementing.
        #[arg(long)]
        auto_increment: bool,
    },

    /// Check whether a word is reserved (offline).
    Reserved {
        /// Word to look up.
        word: String,
    },
}

fn emit<T: Serialize + std::fmt::Debug>(json: bool, value: &T) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{value:#?}");
    }
    Ok(())
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

    let config = DialectConfig::new()
        .schema(cli.schema.clone())
        .generation(cli.catalog);

    match cli.command {
        Commands::TypeOf {
            sql_type,
            length,
            length2,
            auto_increment,
        } => {
            let sql_type = SqlType::from_name(&sql_type)
                .unwrap_or_else(|| SqlType::Custom(sql_type.to_uppercase()));
            let mut column = Column::new("column", sql_type).precision(length, length2);
            if auto_increment {
                column = column.auto_increment();
            }
            println!("{}", CrateDialect::with_config(config).sql_type(&column));
        }

        Commands::Reserved { word } => {
            let reserved = CrateDialect::with_config(config).is_reserved(&word);
            println!("{word}: {}", if reserved { "reserved" } else { "not reserved" });
        }

        command => {
            info!(
                schema = %config.schema,
                catalog = %config.generation,
                "Connecting to CrateDB"
            );
            let introspector = CrateIntrospector::connect(&cli.database, config).await?;
            inspect(&introspector, command, cli.json).await?;
        }
    }

    Ok(())
}

/// Runs a command that needs a live connection.
async fn inspect(
    introspector: &CrateIntrospector,
    command: Commands,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        Commands::Tables => {
            let tables = introspector.get_tables().await?;
            let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
            if json {
                emit(true, &names)?;
            } else {
                for name in names {
                    println!("{name}");
                }
            }
        }

        Commands::Columns { table } => {
            let columns = introspector.get_columns(&table).await?;
            if json {
                emit(true, &columns)?;
            } else {
                let dialect = introspector.dialect();
                for column in &columns {
                    println!(
                        "{:<30} {:<20} {}{}{}",
                        column.name,
                        dialect.sql_type(column),
                        if column.nullable { "NULL" } else { "NOT NULL" },
                        if column.is_primary_key { " PRIMARY KEY" } else { "" },
                        column
                            .default
                            .as_ref()
                            .map(|d| format!(" DEFAULT {d}"))
                            .unwrap_or_default(),
                    );
                }
            }
        }

        Commands::Indexes { table } => {
            let indexes = introspector.get_indexes(&table).await?;
            emit(json, &indexes)?;
        }

        Commands::HasTable { table } => {
            let exists = introspector.table_exists(&table).await?;
            println!("{table}: {}", if exists { "exists" } else { "missing" });
        }

        Commands::HasColumn { table, column } => {
            let exists = introspector.is_column_exist(&table, &column).await?;
            println!(
                "{table}.{column}: {}",
                if exists { "exists" } else { "missing" }
            );
        }

        // Offline commands never reach here.
        Commands::TypeOf { .. } | Commands::Reserved { .. } => {}
    }

    Ok(())
}
