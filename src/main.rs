//! GameData CLI - run statements and queries against the game database

use clap::{Parser, Subcommand, ValueEnum};
use gamedata::config::{self, GameDataConfig};
use gamedata::{ui, QueryExecutor, StoreHandle};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "gamedata")]
#[command(version)]
#[command(about = "Access point to the embedded SQLite game database")]
#[command(long_about = r#"
GameData opens <root>/Databases/GameData.db for every command, runs it,
and closes the connection again.

The storage root comes from --root, then $GAMEDATA_ROOT, then the
data_root entry in gamedata.toml, then the current directory.

Example usage:
  gamedata exec "CREATE TABLE Items (id INTEGER PRIMARY KEY, name TEXT)"
  gamedata exec "INSERT INTO Items VALUES (1, 'Sword')"
  gamedata query "SELECT * FROM Items" --format json
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Storage root directory
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a gamedata.toml pointing at a storage root
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show where the database lives
    Info,

    /// Execute a statement (no rows expected)
    Exec {
        /// Statement text; several statements may be separated by `;`
        sql: String,
    },

    /// Execute a query and print every result set
    Query {
        /// Query text; several statements may be separated by `;`
        sql: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);

    match cli.command {
        Commands::Init { force } => {
            let root = match cli.root {
                Some(root) => root,
                None => std::env::current_dir()?,
            };
            let cfg = GameDataConfig::default().with_data_root(root.to_string_lossy());
            config::write_config(&config_path, &cfg, force)?;
            ui::done(&format!("Wrote {}", config_path.display()));
            ui::setting("Database", &cfg.database_path_in(&root).display().to_string());
        }

        Commands::Info => {
            let handle = instance(cli.root.as_deref(), &config_path);
            let target = PathBuf::from(handle.target());
            let (exists, size) = match std::fs::metadata(&target) {
                Ok(meta) => ("yes".to_string(), format!("{} bytes", meta.len())),
                Err(_) => ("no".to_string(), "-".to_string()),
            };

            ui::banner("GameData store");
            println!(
                "{}",
                ui::stats_table(&[
                    ("Database", handle.target().to_string()),
                    ("Exists", exists),
                    ("Size", size),
                    ("Create if missing", handle.options().creates_if_missing().to_string()),
                ])
            );
        }

        Commands::Exec { sql } => {
            let executor = QueryExecutor::new(instance(cli.root.as_deref(), &config_path));
            if let Err(e) = executor.execute_statement(&sql) {
                ui::failure(&e);
                std::process::exit(1);
            }
            ui::done("Statement executed");
        }

        Commands::Query { sql, format } => {
            let executor = QueryExecutor::new(instance(cli.root.as_deref(), &config_path));
            let results = match executor.execute_query(&sql) {
                Ok(results) => results,
                Err(e) => {
                    ui::failure(&e);
                    std::process::exit(1);
                }
            };

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&results)?),
                Format::Text => {
                    if results.is_empty() {
                        println!("∅ Query returned no result sets.");
                    }
                    for (name, table) in &results {
                        ui::result_set_title(name, table.len());
                        println!("{}", ui::render_result_table(table));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Initialize the process-wide handle from the CLI's overrides
fn instance(root: Option<&Path>, config_path: &Path) -> &'static StoreHandle {
    StoreHandle::instance_with(|| config::resolve_options(root, Some(config_path)))
}
