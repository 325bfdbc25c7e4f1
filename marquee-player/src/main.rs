use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use env_logger::{Builder, Target};
use log::LevelFilter;
use marquee_config::{ClientConfig, ConfigLoader, ConfigLoaderOptions};
use marquee_model::{ImageSize, Movie, MovieId, StarRating, VoteTier};
use marquee_player::domains::auth::{
    AuthorizationOpener, Credentials, EncryptedFileStore, ExpiryPrompt, MemorySecretStore,
    SecretStore, SessionCollaborators, SessionManager,
};
use marquee_player::domains::library::{
    FavoriteToggle, FavoritesState, MovieDetailState, NowPlayingState, RatedState,
    favorites::limit_message,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use url::Url;
use zeroize::Zeroizing;

fn init_logger() {
    Builder::new()
        .target(Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .filter_module("marquee_player", LevelFilter::Info)
        .init();
}

#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(about = "Browse now-playing movies and manage favorites and ratings")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a .env file
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Keep session secrets in memory only
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with username and password (password is read from stdin)
    Login {
        #[arg(short, long)]
        username: String,
    },
    /// Log in by approving a request token in the browser
    LoginBrowser,
    Logout,
    /// Show the signed-in profile
    Whoami,
    NowPlaying {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Favorites {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Add or remove a movie from favorites
    Favorite { movie_id: u64 },
    Rated {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Rate a movie from 0.5 to 5 stars
    Rate { movie_id: u64, stars: f32 },
    Movie { movie_id: u64 },
}

#[derive(Debug)]
struct TerminalPrompt;

#[async_trait]
impl ExpiryPrompt for TerminalPrompt {
    async fn session_expired(&self) {
        eprintln!("Your session has expired. Press Enter to log in again.");
        let mut line = String::new();
        let _ = BufReader::new(tokio::io::stdin()).read_line(&mut line).await;
    }
}

#[derive(Debug)]
struct PrintOpener;

impl AuthorizationOpener for PrintOpener {
    fn open(&self, url: &Url) -> std::io::Result<()> {
        println!("Approve this login in your browser:\n  {url}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let cli = Cli::parse();
    let load = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: cli.config.clone(),
        env_file: cli.env_file.clone(),
        environment: None,
    })
    .load()
    .context("failed to load configuration")?;
    let config = load.config;

    let secrets: Arc<dyn SecretStore> = if cli.ephemeral {
        Arc::new(MemorySecretStore::new())
    } else {
        config
            .ensure_directories()
            .with_context(|| format!("failed to create {}", config.data_dir().display()))?;
        Arc::new(EncryptedFileStore::new(config.data_dir()))
    };

    let session = SessionManager::connect(
        &config,
        SessionCollaborators {
            secrets,
            prompt: Arc::new(TerminalPrompt),
            opener: Arc::new(PrintOpener),
        },
    )?;
    session.restore_session().await;
    let watcher = session.spawn_expiry_watcher();

    let result = run(cli.command, &config, &session).await;
    watcher.abort();
    result
}

async fn run(command: Command, config: &ClientConfig, session: &SessionManager) -> anyhow::Result<()> {
    match command {
        Command::Login { username } => {
            let password = read_password("Password: ").await?;
            let profile = session
                .login(&Credentials::new(username, password.as_str()))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Logged in as {}", profile.display_name());
        }
        Command::LoginBrowser => {
            session.begin_external_login().await?;
            read_line("Press Enter once approved... ").await?;
            let profile = session
                .complete_login()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Logged in as {}", profile.display_name());
        }
        Command::Logout => {
            session.logout().await;
            println!("Logged out");
        }
        Command::Whoami => match session.profile() {
            Some(profile) => {
                println!("{} ({})", profile.display_name(), profile.username);
                println!("  avatar:   {}", profile.avatar_url());
                println!(
                    "  language: {}  region: {}",
                    profile.preferred_language(),
                    profile.preferred_region()
                );
            }
            None => println!("Not logged in"),
        },
        Command::NowPlaying { page } => {
            let mut state = NowPlayingState::new(session.api().clone());
            state.go_to_page(page).await;
            if let Some(error) = state.error() {
                bail!("{error}");
            }
            println!("Now playing (page {} of {})", state.page(), state.total_pages());
            print_movies(state.movies());
        }
        Command::Favorites { page } => {
            let mut state = FavoritesState::new(session.clone(), config.favorites);
            state.on_activate().await;
            if let Some(error) = state.error() {
                bail!("{error}");
            }
            while state.paginator().current_page() < page && state.next_page() {}
            println!(
                "Favorites (page {} of {})",
                state.paginator().current_page(),
                state.paginator().total_pages()
            );
            print_movies(state.page());
        }
        Command::Favorite { movie_id } => {
            let movie = fetch_movie(session, MovieId(movie_id)).await?;
            let mut state = FavoritesState::new(session.clone(), config.favorites);
            state.on_activate().await;
            match state.toggle(&movie).await {
                FavoriteToggle::Added => println!("Added {} to favorites", movie.title),
                FavoriteToggle::Removed => println!("Removed {} from favorites", movie.title),
                FavoriteToggle::LimitReached => {
                    bail!(limit_message(state.max_entries().unwrap_or_default()))
                }
                FavoriteToggle::Failed => {
                    bail!(state.error().unwrap_or("Error toggling favorite").to_string())
                }
            }
        }
        Command::Rated { page } => {
            let mut state = RatedState::new(session.clone(), config.favorites.page_size);
            state.on_activate().await;
            if let Some(error) = state.error() {
                bail!("{error}");
            }
            while state.paginator().current_page() < page && state.next_page() {}
            print_movies(state.page());
        }
        Command::Rate { movie_id, stars } => {
            let rating = StarRating::from_stars(stars)?;
            let movie = fetch_movie(session, MovieId(movie_id)).await?;
            let mut state = RatedState::new(session.clone(), config.favorites.page_size);
            if !state.submit(&movie, rating).await {
                bail!(state.error().unwrap_or("Failed to submit rating").to_string());
            }
            println!("Rated {} {}", movie.title, rating);
        }
        Command::Movie { movie_id } => {
            let mut state = MovieDetailState::new(session.clone(), config.favorites);
            state.load(MovieId(movie_id)).await;
            if let Some(error) = state.error() {
                bail!("{error}");
            }
            let Some(details) = state.details() else {
                bail!("Failed to fetch movie data");
            };
            print_details(&state, details);
        }
    }
    Ok(())
}

async fn fetch_movie(session: &SessionManager, movie_id: MovieId) -> anyhow::Result<Movie> {
    let details = session
        .api()
        .movie_details(movie_id)
        .await
        .with_context(|| format!("failed to fetch movie {movie_id}"))?;
    Ok(details.movie)
}

async fn read_line(prompt: &str) -> anyhow::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Restores cooked mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Read a line with terminal echo off.
async fn read_password(prompt: &str) -> anyhow::Result<Zeroizing<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;

    let password = tokio::task::spawn_blocking(|| -> anyhow::Result<Zeroizing<String>> {
        let _raw = RawModeGuard::enable().context("failed to disable terminal echo")?;
        let mut password = Zeroizing::new(String::new());
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            match key.code {
                KeyCode::Enter => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    bail!("password entry cancelled")
                }
                KeyCode::Esc => bail!("password entry cancelled"),
                KeyCode::Backspace => {
                    password.pop();
                }
                KeyCode::Char(c) => password.push(c),
                _ => {}
            }
        }
        Ok(password)
    })
    .await??;

    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(password)
}

fn print_movies(movies: &[Movie]) {
    if movies.is_empty() {
        println!("  (none)");
    }
    for movie in movies {
        let rating = movie
            .user_rating
            .map(|rating| format!("  your rating: {rating}"))
            .unwrap_or_default();
        println!(
            "  {:>8}  {}  [{:.1} {}]{}",
            movie.id,
            movie.title,
            movie.vote_average,
            VoteTier::for_average(movie.vote_average).hex_color(),
            rating
        );
    }
}

fn print_details(state: &MovieDetailState, details: &marquee_model::MovieDetails) {
    let movie = &details.movie;
    println!("{}", movie.title);
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        println!("  {tagline}");
    }
    if let Some(date) = movie.formatted_release_date() {
        println!("  Released {date}");
    }
    println!("  Genres: {}", movie.genre_names().join(", "));
    println!("  Score: {:.1}", movie.vote_average);
    if let Some(poster) = movie.poster_url(ImageSize::W500) {
        println!("  Poster: {poster}");
    }
    println!(
        "  Favorite: {}  Your rating: {}",
        if state.is_favorite() { "yes" } else { "no" },
        state
            .user_rating()
            .map(|rating| rating.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("\n{}\n", movie.overview);

    for member in details.cast().into_iter().take(10) {
        println!("  {} as {}", member.name, member.character);
    }
    if !state.recommendations().is_empty() {
        println!("\nRecommended:");
        print_movies(state.recommendations());
    }
}
