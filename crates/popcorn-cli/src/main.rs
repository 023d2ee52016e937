mod logging;
mod render;
mod repl;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};

use popcorn_api::{ApiError, OmdbClient};
use popcorn_core::config::AppConfig;
use popcorn_core::error::PopcornError;
use popcorn_core::storage::{KeyValueStore, MemoryStore, SqliteStore};
use popcorn_runtime::{Message, Session};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] PopcornError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not load details for {0}")]
    NoDetails(String),
}

#[derive(Debug, Parser)]
#[command(name = "popcorn", version, about = "Search movies and keep a rated watched list")]
struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep the watched list in memory only.
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search movies by title.
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show details for a movie.
    Show { imdb_id: String },
    /// Rate a movie and add it to the watched list.
    Add {
        imdb_id: String,
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
        rating: u8,
    },
    /// Remove a movie from the watched list.
    Remove { imdb_id: String },
    /// List watched movies.
    List,
    /// Averages over the watched list.
    Summary,
    /// Search and rate interactively.
    Interactive,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = logging::init(&config.general.log_level, cli.verbose, &AppConfig::data_dir());
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    tracing::debug!(
        path = %config_path.display(),
        user_file = config_path.exists(),
        "Loaded config"
    );

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), CliError> {
    let service = Arc::new(
        OmdbClient::new(config.omdb.api_key.clone())
            .with_base_url(&config.omdb.base_url)?
            .with_timeout(Duration::from_secs(config.omdb.timeout_secs))?,
    );
    let store: Arc<dyn KeyValueStore> = if cli.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(SqliteStore::open(&config.ensure_db_path()?)?)
    };
    let min_query_len = config.general.min_query_len;
    let mut session = Session::new(service, store, min_query_len)?;

    match cli.command {
        Command::Search { query } => {
            let query = query.join(" ");
            if query.chars().count() < min_query_len {
                println!("Type at least {min_query_len} characters to search");
                return Ok(());
            }
            session.update(Message::QueryChanged(query))?;
            session.settled().await;
            println!("{}", render::search(&session.search()));
        }
        Command::Show { imdb_id } => {
            session.update(Message::SelectMovie(imdb_id.clone()))?;
            session.settled().await;
            let detail = session.detail();
            let movie = detail.movie.ok_or(CliError::NoDetails(imdb_id.clone()))?;
            println!(
                "{}",
                render::detail(&movie, session.watched().user_rating(&imdb_id), None)
            );
        }
        Command::Add { imdb_id, rating } => {
            if let Some(existing) = session.watched().user_rating(&imdb_id) {
                println!("Already in your watched list (rated {existing})");
                return Ok(());
            }
            session.update(Message::SelectMovie(imdb_id.clone()))?;
            session.settled().await;
            let title = session
                .detail()
                .movie
                .map(|m| m.title)
                .ok_or(CliError::NoDetails(imdb_id.clone()))?;
            session.update(Message::Rate(rating))?;
            session.update(Message::AddWatched)?;
            println!("Added {title} ({})", render::stars(rating));
        }
        Command::Remove { imdb_id } => {
            let before = session.watched().len();
            session.update(Message::DeleteWatched(imdb_id.clone()))?;
            if session.watched().len() < before {
                println!("Removed {imdb_id}");
            } else {
                println!("{imdb_id} is not in your watched list");
            }
        }
        Command::List => {
            println!("{}", render::watched(session.watched().entries()));
        }
        Command::Summary => {
            println!("{}", render::summary(&session.watched().summary()));
        }
        Command::Interactive => {
            repl::run(&mut session).await?;
        }
    }
    Ok(())
}
