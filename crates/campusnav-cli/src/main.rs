mod locations;
mod route;

use std::path::PathBuf;

use campusnav_core::{AppConfig, FieldKey};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "campusnav-cli")]
#[command(about = "Campus navigator command line interface")]
struct Cli {
    /// Path to configuration.xml (overrides CAMPUSNAV_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Path to locations.xml (overrides CAMPUSNAV_LOCATIONS_PATH)
    #[arg(long, global = true)]
    locations: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List configured location names
    Locations,
    /// Validate configuration.xml and locations.xml
    CheckConfig,
    /// Show autosuggest candidates for a query, then replay keys against them
    Suggest {
        query: String,
        /// Comma-separated keys: down, up, enter, tab, escape
        #[arg(long, value_delimiter = ',')]
        keys: Vec<FieldKey>,
    },
    /// Plan a walking route and fetch directions for it
    Route {
        start: String,
        end: String,
        /// Intermediate stop; repeat for several, in visiting order
        #[arg(long = "via")]
        via: Vec<String>,
        /// Validate and print the request without calling the directions service
        #[arg(long)]
        plan_only: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = campusnav_core::load_app_config()?;
    apply_path_overrides(&mut config, &cli);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Locations) => locations::run_list(&config)?,
        Some(Commands::CheckConfig) => locations::run_check(&config)?,
        Some(Commands::Suggest { query, keys }) => locations::run_suggest(&config, &query, &keys)?,
        Some(Commands::Route {
            start,
            end,
            via,
            plan_only,
            json,
        }) => {
            let args = route::RouteArgs {
                start,
                end,
                via,
                plan_only,
                json,
            };
            route::run(&config, &args).await?;
        }
        None => println!("campusnav-cli: run with --help to see available commands"),
    }

    Ok(())
}

fn apply_path_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(path) = &cli.config {
        config.config_path.clone_from(path);
    }
    if let Some(path) = &cli.locations {
        config.locations_path.clone_from(path);
    }
}

#[cfg(test)]
mod tests;
