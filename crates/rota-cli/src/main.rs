mod cmd;
mod output;

use clap::{Parser, Subcommand};
use rota_core::config::{Config, CONFIG_FILE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rota",
    about = "Weekly cleaning-duty rotation — assign six students to six areas every Monday",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (missing file = built-in defaults)
    #[arg(long, global = true, env = "ROTA_CONFIG", default_value = CONFIG_FILE)]
    config: PathBuf,

    /// SQLite database path (overrides the config file)
    #[arg(long, global = true, env = "ROTA_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API and the weekly rotation trigger
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(long, env = "ROTA_PORT")]
        port: Option<u16>,
    },

    /// Run the rotation check once against the database
    Rotate {
        /// Rotate even if a rotation already happened this week
        #[arg(long)]
        force: bool,
    },

    /// Print the current schedule
    Show {
        /// Output as JSON
        #[arg(long, short = 'j')]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        None | Some(Commands::Serve { .. }) => tracing::Level::INFO,
        Some(_) => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = load_config(&cli).and_then(|config| match cli.command {
        None => cmd::serve::run(config, None),
        Some(Commands::Serve { port }) => cmd::serve::run(config, port),
        Some(Commands::Rotate { force }) => cmd::rotate::run(&config, force),
        Some(Commands::Show { json }) => cmd::show::run(&config, json),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(&cli.config)?;
    if let Some(db) = &cli.db {
        config.database = db.clone();
    }
    Ok(config)
}
