//! Ahmiyat CLI
//!
//! Each invocation is one page load: restore the persisted session, perform
//! one user action, print the resulting view.

use ahmiyat::{
    generate_default_config, render, App, Config, FileCredentialStore, HttpLedgerApi,
    LoggingConfig, MemoryType, Overlay, Section, SelectedFile,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "ahmiyat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Wallet, ledger explorer and memory uploads for the Ahmiyat chain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: platform config dir, then ./ahmiyat.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ledger server URL, overrides the config file
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current session and home view
    Status,

    /// Log in with an existing wallet
    Login {
        #[arg(long)]
        address: String,
        #[arg(long)]
        private_key: String,
    },

    /// End the current session
    Logout,

    /// Create a new wallet
    Register,

    /// Show memories and transactions of the current account
    Dashboard,

    /// Browse the ledger
    Explorer,

    /// Upload a memory
    Upload {
        file: PathBuf,
        /// DOCUMENT, IMAGE, VIDEO or MEME
        #[arg(short = 't', long = "type", default_value = "DOCUMENT")]
        memory_type: MemoryType,
        #[arg(short, long, default_value = "")]
        description: String,
        /// MIME type (default: guessed from the extension)
        #[arg(long)]
        mime: Option<String>,
    },

    /// Preview a file without uploading it
    Preview {
        file: PathBuf,
        #[arg(long)]
        mime: Option<String>,
    },

    /// Mine pending transactions
    Mine,

    /// Send coins to another address
    Transfer {
        to: String,
        amount: String,
    },

    /// Switch to a section (home, about, dashboard, upload, blockchain-explorer)
    Navigate { section: Section },

    /// Print or write a default config file
    Config {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ahmiyat={}", logging.level)));

    // stdout carries the rendered view
    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let config = load_config(&cli)?;
    init_tracing(&config.logging);
    tracing::debug!(api = %config.api.base_url, data_dir = %config.storage.data_dir, "Configuration loaded");

    let api = HttpLedgerApi::new(&config.api)?;
    let store = FileCredentialStore::new(config.storage.credentials_path());
    let mut app = App::new(Arc::new(api), Arc::new(store));
    app.start().await;

    match cli.command {
        Commands::Status | Commands::Config { .. } => {}
        Commands::Login {
            address,
            private_key,
        } => app.login(&address, &private_key).await,
        Commands::Logout => app.logout().await,
        Commands::Register => {
            app.open_overlay(Overlay::Register);
            app.register().await;
        }
        Commands::Dashboard => {
            if !app.navigate(Section::Dashboard).await {
                eprintln!("Log in first: ahmiyat login --address <ADDRESS> --private-key <KEY>");
                std::process::exit(1);
            }
        }
        Commands::Explorer => {
            app.navigate(Section::BlockchainExplorer).await;
        }
        Commands::Upload {
            file,
            memory_type,
            description,
            mime,
        } => {
            let selected = match SelectedFile::from_path(&file, mime.as_deref()).await {
                Ok(selected) => selected,
                Err(e) => {
                    eprintln!("Cannot read {:?}: {}", file, e);
                    std::process::exit(1);
                }
            };
            app.navigate(Section::Upload).await;
            app.set_upload_details(memory_type, description);
            app.select_file(selected).await;
            app.submit_upload().await;
        }
        Commands::Preview { file, mime } => {
            let selected = match SelectedFile::from_path(&file, mime.as_deref()).await {
                Ok(selected) => selected,
                Err(e) => {
                    eprintln!("Cannot read {:?}: {}", file, e);
                    std::process::exit(1);
                }
            };
            app.select_file(selected).await;
            print!("{}", ahmiyat::render::render_upload(app.view()));
            return Ok(());
        }
        Commands::Mine => app.mine().await,
        Commands::Transfer { to, amount } => {
            app.set_transfer_inputs(to, amount);
            app.transfer().await;
        }
        Commands::Navigate { section } => {
            if !app.navigate(section).await {
                eprintln!("Section '{}' requires a logged-in session", section);
                std::process::exit(1);
            }
        }
    }

    print!("{}", render(app.view()));

    if app.view().has_error() {
        std::process::exit(1);
    }
    Ok(())
}
