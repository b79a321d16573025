use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, clear, config, watched};
use watchlist_config::PathManager;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchlist-plus")]
#[command(about = "Watchlist+ - search movies, rate the ones you watched, keep the list")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive movie browser (default)
    #[command(long_about = "Search OMDb, open a movie to see its details, rate it and add it to your watched list. Type a title to search; type :help inside the browser for the other commands.")]
    Browse,
    /// Print the watched list with its averages
    List,
    /// Remove a movie from the watched list by IMDb id
    Remove {
        /// IMDb id, e.g. tt1375666
        id: String,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Clear stored data
    #[command(long_about = "Clear the watched list or stored credentials. Use --watched, --credentials, or --all.")]
    Clear {
        /// Clear the watched list and credentials
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Empty the watched list
        #[arg(long, action = ArgAction::SetTrue)]
        watched: bool,

        /// Remove the stored OMDb API key
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,

        /// Do not ask for confirmation
        #[arg(long, short = 'y', action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Store the OMDb API key
    #[command(long_about = "Store the OMDb API key in the credentials file. Get a free key at https://www.omdbapi.com/apikey.aspx. The WATCHLIST_OMDB_API_KEY environment variable takes precedence over the stored key.")]
    ApiKey {
        /// API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Point the client at a different OMDb-compatible endpoint
    ApiUrl {
        url: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Browse);

    // The browser owns the terminal, so its logs go to a file
    if matches!(command, Commands::Browse) {
        let path_manager = PathManager::default();
        logging::init_file_logging(cli.verbose, &path_manager.browse_log_file())
            .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    } else {
        logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    }

    let output = output::Output::new(cli.output, cli.quiet);

    let result = match command {
        Commands::Browse => browse::run_browse(&output).await,
        Commands::List => watched::run_list(&output),
        Commands::Remove { id } => watched::run_remove(&id, &output),
        Commands::Config { cmd } => config::run_config(cmd, &output),
        Commands::Clear {
            all,
            watched,
            credentials,
            yes,
        } => clear::run_clear(all, watched, credentials, yes, &output),
    };

    // Machine-readable callers get the failure as a JSON message instead of a report
    if let Err(e) = &result {
        if output.format() != output::OutputFormat::Human {
            output.error(format!("{:#}", e));
            std::process::exit(1);
        }
    }
    result
}
