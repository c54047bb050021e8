use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};

use gh_menu::config::Config;
use gh_menu::github::GitHubClient;
use gh_menu::instance::{InstanceLock, LockOutcome, PID_FILE_NAME};
use gh_menu::logging;
use gh_menu::output::{self, MenuState};
use gh_menu::poll::{PollSettings, Poller};

const EXIT_SUCCESS: i32 = 0;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive menu that refreshes on every poll (default if no subcommand)
    Menu,
    /// Poll without a UI and print the status line whenever it changes
    Watch,
    /// Poll once and print the menu
    Status {
        /// Output format
        #[arg(long, value_enum, default_value_t = StatusFormat::Plain)]
        format: StatusFormat,
    },
    /// Poll once and open a PR in the browser by its row number
    Open {
        /// Row number of the PR to open (1-based, newest first, as shown by `status`)
        index: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusFormat {
    Plain,
    /// SwiftBar / xbar plugin output
    Swiftbar,
}

#[derive(Parser, Debug)]
#[command(name = "gh-menu")]
#[command(about = "Live count of the GitHub PRs waiting for your review", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/gh-menu/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Menu);
    let interactive = matches!(command, Commands::Menu);

    let log_dir = logging::get_log_dir();
    let _log_guard = match logging::init_logging(&log_dir, cli.verbose, !interactive) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {:#}", e);
            None
        }
    };
    info!("Starting gh-menu (PID: {})", std::process::id());
    info!(
        "Log file location: {}",
        logging::log_file_path(&log_dir, Utc::now().date_naive()).display()
    );

    let config = match gh_menu::config::load_config(cli.config.map(PathBuf::from)) {
        Ok(c) => c,
        Err(e) => {
            error!("Config error: {:#}", e);
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Long-running commands keep a PID file so only one copy polls at a time
    let _instance = if matches!(command, Commands::Menu | Commands::Watch) {
        match InstanceLock::acquire(&log_dir.join(PID_FILE_NAME)) {
            Ok(LockOutcome::Acquired(lock)) => Some(lock),
            Ok(LockOutcome::AlreadyRunning(pid)) => {
                eprintln!("gh-menu is already running (PID: {})", pid);
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                warn!("Single-instance check failed: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    let poller = match gh_menu::credentials::get_token_from_env() {
        Some(token) => match build_poller(&token, &config) {
            Ok(p) => Some(Arc::new(p)),
            Err(e) => {
                error!("Failed to create GitHub client: {:#}", e);
                eprintln!("Failed to create GitHub client: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
        None => {
            warn!(
                "{} environment variable not set",
                gh_menu::credentials::ENV_TOKEN_VAR
            );
            None
        }
    };

    let code = match command {
        Commands::Menu => {
            let app = match &poller {
                Some(_) => gh_menu::tui::App::new(config.poll_interval),
                None => gh_menu::tui::App::missing_token(config.poll_interval),
            };
            match gh_menu::tui::run_tui(app, poller).await {
                Ok(()) => EXIT_SUCCESS,
                Err(e) => {
                    error!("Terminal error: {:#}", e);
                    eprintln!("Terminal error: {:#}", e);
                    EXIT_CONFIG
                }
            }
        }
        Commands::Watch => match poller {
            Some(poller) => {
                gh_menu::watch::run_watch_until_interrupted(
                    &poller,
                    config.poll_interval,
                    |state| println!("{}", state.title),
                )
                .await;
                EXIT_SUCCESS
            }
            None => missing_token(),
        },
        Commands::Status { format } => match poller {
            Some(poller) => {
                let state = poller.tick(Utc::now()).await;
                let rendered = match format {
                    StatusFormat::Plain => output::format_plain(&state),
                    StatusFormat::Swiftbar => output::format_swiftbar(&state),
                };
                println!("{}", rendered);
                if state.is_error() {
                    EXIT_NETWORK
                } else {
                    EXIT_SUCCESS
                }
            }
            None => missing_token(),
        },
        Commands::Open { index } => match poller {
            Some(poller) => open_row(&poller, index).await,
            None => missing_token(),
        },
    };

    // Drop guards before exiting so the PID file is removed and logs are flushed
    drop(_instance);
    drop(_log_guard);
    std::process::exit(code);
}

fn build_poller(token: &str, config: &Config) -> anyhow::Result<Poller<GitHubClient>> {
    let client = GitHubClient::new(token, &config.api_url, config.request_timeout)?;
    Ok(Poller::new(client, PollSettings::from(config)))
}

fn missing_token() -> i32 {
    println!("{}", output::format_plain(&MenuState::missing_token()));
    EXIT_CONFIG
}

async fn open_row(poller: &Poller<GitHubClient>, index: usize) -> i32 {
    let state = poller.tick(Utc::now()).await;
    if state.is_error() {
        eprintln!("{}", state.title);
        return EXIT_NETWORK;
    }

    // Validate index bounds (1-based)
    let Some(url) = index.checked_sub(1).and_then(|i| state.url_at(i)) else {
        eprintln!(
            "Invalid index {}. Must be between 1 and {}.",
            index,
            state.rows.len()
        );
        return EXIT_CONFIG;
    };

    if let Err(e) = gh_menu::browser::open_url(url) {
        eprintln!("Failed to open browser: {:#}", e);
        return EXIT_NETWORK;
    }

    println!("Opening in browser: {}", url);
    EXIT_SUCCESS
}
