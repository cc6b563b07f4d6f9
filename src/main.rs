use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tokio::io::BufReader;

use cinesearch_lib::bootstrap::{init_tracing_subscriber, load_config, wire_services};
use cinesearch_lib::commands;
use cs_app::app_paths::AppPaths;
use cs_core::ports::AppDirsPort;
use cs_infra::DirsAppDirsAdapter;

#[derive(Parser, Debug)]
#[command(name = "cinesearch", version, about = "Search OMDb with a local cache and favorites")]
struct Cli {
    /// Config file (defaults to config.toml in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Force debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search titles
    Search {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },
    /// Read search terms from stdin, one per line, as if typed
    /// (`:select <id>` and `:toggle` act on the selection)
    Watch,
    /// Show full details of a title
    Details { id: String },
    /// List favorites
    Favorites,
    /// Flip the favorite flag of a cached title
    Toggle { id: String },
    /// Set the favorite flag explicitly
    Favorite {
        id: String,
        #[arg(action = ArgAction::Set)]
        value: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();

    let app_dirs = DirsAppDirsAdapter::new().get_app_dirs()?;
    let paths = AppPaths::from_app_dirs(&app_dirs);
    init_tracing_subscriber(cli.debug, Some(&paths.logs_dir))?;

    let config_path = cli.config.unwrap_or_else(|| paths.config_path.clone());
    let config = load_config(&config_path)?;
    tracing::debug!(
        path = %config_path.display(),
        base_url = %config.api.base_url,
        debounce_ms = config.search.debounce_ms,
        in_memory = config.storage.in_memory,
        "configuration loaded"
    );

    let services = wire_services(&config, &paths)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::Search { term } => commands::search(&services, &term.join(" "), &mut out).await,
        Command::Watch => {
            let stdin = BufReader::new(tokio::io::stdin());
            commands::watch(&services, stdin, &mut out).await
        }
        Command::Details { id } => commands::details(&services, &id, &mut out).await,
        Command::Favorites => commands::favorites(&services, &mut out).await,
        Command::Toggle { id } => commands::toggle(&services, &id, &mut out).await,
        Command::Favorite { id, value } => {
            commands::set_favorite(&services, &id, value, &mut out).await
        }
    }
}
