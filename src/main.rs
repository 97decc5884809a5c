use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unsplash_gallery::config::{
    default_config_path, find_config_file, get_config, load_config, mask_secret, save_config,
    Config, ACCESS_KEY_ENV,
};
use unsplash_gallery::gallery::{Gallery, SearchState};
use unsplash_gallery::shell::{Command, Shell};
use unsplash_gallery::sources::{ImageSource, UnsplashSource};
use unsplash_gallery::ui::{self, Spinner, Status};

/// Unsplash Gallery - Search and browse photos from the terminal
#[derive(Parser, Debug)]
#[command(name = "unsplash-gallery")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search and browse Unsplash photos from the terminal", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the configuration file)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Browse interactively (default when no command is given)
    #[command(alias = "b")]
    Browse {
        /// Search to run before the first prompt
        query: Option<String>,
    },

    /// Run one search and print the results
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,

        /// Number of pages to load (12 photos per page)
        #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Auto)]
        output: OutputFormat,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Where to write the file (default: per-user config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => get_config()?,
    };
    if let Some(timeout) = cli.timeout {
        config.unsplash.timeout_secs = timeout;
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("unsplash_gallery={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    match cli.command {
        None => browse(&config, None).await,
        Some(Commands::Browse { query }) => browse(&config, query).await,
        Some(Commands::Search {
            query,
            pages,
            output,
        }) => search(&config, &query, pages, output).await,
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Init { path, force } => config_init(path, force),
            ConfigCommands::Show => {
                config_show(&config, config_path.as_ref());
                Ok(())
            }
        },
    }
}

/// Build the gallery from configuration, passing the access key explicitly
fn build_gallery(config: &Config) -> Result<Gallery> {
    let source = UnsplashSource::new(&config.unsplash).with_context(|| {
        format!(
            "Set {} or add `access_key` under [unsplash] in the config file",
            ACCESS_KEY_ENV
        )
    })?;
    Ok(Gallery::new(Arc::new(source) as Arc<dyn ImageSource>))
}

async fn browse(config: &Config, query: Option<String>) -> Result<()> {
    let gallery = build_gallery(config)?;
    let mut shell = Shell::new(gallery, std::io::stdin().is_terminal());

    if let Some(query) = query {
        shell.handle(Command::Search(query)).await;
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    shell.run(stdin).await?;
    Ok(())
}

async fn search(config: &Config, query: &str, pages: u32, format: OutputFormat) -> Result<()> {
    let gallery = build_gallery(config)?;
    let spinner = if std::io::stderr().is_terminal() {
        Spinner::new(&format!("Searching Unsplash for \"{}\"...", query))
    } else {
        Spinner::hidden()
    };

    if let Some(fetch) = gallery.search(query) {
        fetch.wait().await;
    }
    for _ in 1..pages {
        let Some(fetch) = gallery.load_more() else {
            break;
        };
        spinner.set_message(&format!("Loading page {}...", fetch.page()));
        fetch.wait().await;
    }
    spinner.finish();

    let state = gallery.snapshot();
    output_state(&state, format)?;

    if state.error {
        ui::print_error_banner();
        if state.results.is_empty() {
            std::process::exit(1);
        }
    }
    Ok(())
}

fn output_state(state: &SearchState, format: OutputFormat) -> Result<()> {
    let actual_format = if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    };

    match actual_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(state)?);
        }
        OutputFormat::Plain => {
            for record in &state.results {
                println!("{} - {}", record.id, record.description());
                println!("  Thumbnail: {}", record.thumbnail_url);
                println!("  Image:     {}", record.full_url);
                println!();
            }
        }
        OutputFormat::Table => {
            ui::print_status(
                Status::Search,
                &format!(
                    "\"{}\": {} photos, page {} of {}",
                    state.query,
                    ui::format_number(state.results.len() as u64),
                    state.page,
                    state.total_pages
                ),
            );
            if !state.results.is_empty() {
                println!("{}", ui::results_table(&state.results, ui::terminal_width()));
            }
        }
        OutputFormat::Auto => unreachable!(),
    }
    Ok(())
}

fn config_init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path
        .or_else(default_config_path)
        .context("Could not determine a config directory; pass --path")?;

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut config = Config::default();
    // Never persist a key picked up from the environment
    config.unsplash.access_key = None;
    save_config(&config, &path)?;

    ui::print_status(
        Status::Success,
        &format!("Wrote default configuration to {}", path.display()),
    );
    Ok(())
}

fn config_show(config: &Config, path: Option<&PathBuf>) {
    ui::print_section("Configuration");
    match path {
        Some(path) => println!("  File:        {}", path.display()),
        None => println!("  File:        (none, using defaults and environment)"),
    }
    let key = config
        .unsplash
        .access_key
        .as_deref()
        .map(mask_secret)
        .unwrap_or_else(|| "(not set)".to_string());
    println!("  Access key:  {}", key);
    println!("  Base URL:    {}", config.unsplash.base_url);
    println!("  Timeout:     {}s", config.unsplash.timeout_secs);
    println!("  Log level:   {}", config.logging.level);
}
