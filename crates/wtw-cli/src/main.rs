use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::Context;
use commands::library::LibraryList;
use commands::{catalog, clear, config, library, movie};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "wtw")]
#[command(about = "wtw - Find a movie and where to watch it")]
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

    /// Write logs to this file (rotated daily) instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the movie catalog
    #[command(long_about = "Search the movie catalog by title. Results can be narrowed to one genre (see 'wtw genres' for ids) and to entries whose title or overview contain a text.")]
    Search {
        /// Title to search for
        query: String,

        /// Only show results tagged with this genre id
        #[arg(long, value_name = "GENRE_ID")]
        genre: Option<i64>,

        /// Only show results whose title, original title or overview contain this text
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,
    },
    /// List movie genres and their ids
    Genres,
    /// Most-voted movies in a genre
    Discover {
        /// Genre id (see 'wtw genres')
        genre_id: i64,
    },
    /// Show a movie's details and where to watch it
    #[command(long_about = "Show details for a movie and the providers streaming, renting or selling it in your region. Viewing a movie adds it to your recently viewed list.")]
    Movie {
        /// Catalog movie id
        id: String,

        /// Two-letter region code (defaults to config, then locale, then US)
        #[arg(long)]
        region: Option<String>,
    },
    /// Add a movie to favorites, or remove it if already there
    Favorite {
        /// Catalog movie id
        id: String,
    },
    /// Show favorites and recently viewed movies
    Library {
        /// Show only one list
        #[arg(value_enum)]
        list: Option<LibraryList>,
    },
    /// Configure credentials and settings
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Clear recently viewed movies or favorites
    Clear {
        /// Clear both lists
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Clear recently viewed movies
        #[arg(long, action = ArgAction::SetTrue)]
        recents: bool,

        /// Clear favorites
        #[arg(long, action = ArgAction::SetTrue)]
        favorites: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks secrets)
    Show {
        /// Show secrets unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Store the TMDB API read access token
    #[command(long_about = "Store the TMDB API read access token (v4 bearer token). The TMDB_API_ACCESS_TOKEN environment variable takes precedence when set.")]
    Tmdb {
        /// Token (if not provided, will prompt)
        #[arg(long)]
        token: Option<String>,
    },

    /// Store the Watchmode API key
    #[command(long_about = "Store the Watchmode API key used for streaming sources. The WATCHMODE_API_KEY environment variable takes precedence when set.")]
    Watchmode {
        /// API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Change settings
    Set {
        /// Two-letter region code; empty to detect from the locale
        #[arg(long)]
        region: Option<String>,

        /// Catalog language, e.g. en-US
        #[arg(long)]
        language: Option<String>,

        /// How many recently viewed movies to keep
        #[arg(long)]
        recents_max: Option<usize>,

        /// Which availability source wins when both answer
        #[arg(long, value_enum)]
        provider_policy: Option<config::PolicyArg>,

        /// Enable or disable the Watchmode source
        #[arg(long)]
        watchmode_enabled: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))
        .wrap_err("Failed to initialize logging")?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Search { query, genre, filter } => catalog::run_search(query, genre, filter, &output).await,
        Commands::Genres => catalog::run_genres(&output).await,
        Commands::Discover { genre_id } => catalog::run_discover(genre_id, &output).await,
        Commands::Movie { id, region } => movie::run_movie(id, region, &output).await,
        Commands::Favorite { id } => movie::run_favorite(id, &output).await,
        Commands::Library { list } => library::run_library(list, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
        Commands::Clear { all, recents, favorites } => clear::run_clear(all, recents, favorites, &output).await,
    }
}
