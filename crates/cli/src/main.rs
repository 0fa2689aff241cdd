//! Cartãozinho CLI - loyalty cards from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (registers the phone if it is new and a name is given)
//! cartaozinho login --phone "(11) 98765-4321" --name "Ana"
//!
//! # Cards for customers, store and customers for merchants
//! cartaozinho home
//!
//! # Merchant: stamp a customer's card
//! cartaozinho stamp add --phone "(21) 99876-5432"
//!
//! # Check connectivity to the backend
//! cartaozinho diagnose
//! ```
//!
//! # Commands
//!
//! - `login`, `logout`, `profile` - Session
//! - `home` - Cards or store overview, depending on the account
//! - `card show|redeem` - Card details and reward redemption
//! - `store show|save|toggle` - Merchant store management
//! - `stamp add` - Add a stamp to a customer's card
//! - `notify` - Push a notification to the store's customers
//! - `push test`, `diagnose` - Troubleshooting

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cartaozinho_client::ClientConfig;
use cartaozinho_core::{CardId, UserId};

mod commands;
mod context;
mod error;
mod render;

use commands::store::StoreForm;
use context::{App, Console};
use error::CliError;

#[derive(Parser)]
#[command(name = "cartaozinho")]
#[command(author, version, about = "Cartãozinho loyalty cards")]
struct Cli {
    /// Backend base URL, including `/api`
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the saved session
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in by phone, registering if the phone is new
    Login {
        /// Phone number, masked or digits only
        #[arg(short, long)]
        phone: String,

        /// Name to register with if the phone is new
        #[arg(short, long)]
        name: Option<String>,

        /// Register as a merchant instead of a customer
        #[arg(long)]
        merchant: bool,
    },
    /// Log out
    Logout {
        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the logged-in account
    Profile,
    /// Cards (customers) or store and customers (merchants)
    Home,
    /// Loyalty cards
    Card {
        #[command(subcommand)]
        action: CardAction,
    },
    /// Merchant store
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Stamps
    Stamp {
        #[command(subcommand)]
        action: StampAction,
    },
    /// Push a notification to the store's customers
    Notify {
        /// Notification title
        #[arg(short, long)]
        title: String,

        /// Notification text
        #[arg(short, long)]
        message: String,

        /// Only this customer (all customers when omitted)
        #[arg(short, long)]
        customer: Option<UserId>,
    },
    /// Push notifications
    Push {
        #[command(subcommand)]
        action: PushAction,
    },
    /// Check connectivity to the backend
    Diagnose,
}

#[derive(Subcommand)]
enum CardAction {
    /// Show a card and its stamp history
    Show {
        /// Card ID
        id: CardId,
    },
    /// Redeem a completed card
    Redeem {
        /// Card ID
        id: CardId,

        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Show your store
    Show,
    /// Create your store, or update it
    Save {
        /// Store name
        #[arg(long)]
        name: String,

        /// Short description
        #[arg(long)]
        description: String,

        /// Stamps needed for the reward (3-20)
        #[arg(long, default_value = "10")]
        stamps: String,

        /// Reward description
        #[arg(long)]
        reward: String,
    },
    /// Activate or deactivate your store
    Toggle {
        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum StampAction {
    /// Add a stamp to a customer's card
    Add {
        /// Customer phone number
        #[arg(short, long)]
        phone: String,

        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PushAction {
    /// Send a test notification to this device
    Test,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url)?;
    }
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir.clone_from(data_dir);
    }
    Ok(config)
}

/// Print an error as an alert on stderr.
fn report(err: &CliError) {
    let alert = err.alert();
    let _ = writeln!(io::stderr().lock(), "{}\n\n{}", alert.title, alert.body);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    };

    let sentry_guard = init_sentry(&config);

    // Command output goes to stdout, logs to stderr
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cartaozinho=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(error = %e, "Command failed");
        report(&e);
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &ClientConfig) -> Result<(), CliError> {
    let app = App::start(config).await?;

    let cancel = app.scope().token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout().lock());
    let console = &mut console;

    match command {
        Commands::Login {
            phone,
            name,
            merchant,
        } => commands::auth::login(&app, console, &phone, name.as_deref(), merchant).await?,
        Commands::Logout { yes } => commands::auth::logout(&app, console, yes).await?,
        Commands::Profile => commands::auth::profile(&app, console)?,
        Commands::Home => commands::home::show(&app, console).await?,
        Commands::Card { action } => match action {
            CardAction::Show { id } => commands::cards::show(&app, console, id).await?,
            CardAction::Redeem { id, yes } => {
                commands::cards::redeem(&app, console, id, yes).await?;
            }
        },
        Commands::Store { action } => match action {
            StoreAction::Show => commands::store::show(&app, console).await?,
            StoreAction::Save {
                name,
                description,
                stamps,
                reward,
            } => {
                let form = StoreForm {
                    name,
                    description,
                    stamps,
                    reward,
                };
                commands::store::save(&app, console, &form).await?;
            }
            StoreAction::Toggle { yes } => commands::store::toggle(&app, console, yes).await?,
        },
        Commands::Stamp { action } => match action {
            StampAction::Add { phone, yes } => {
                commands::stamps::add(&app, console, &phone, yes).await?;
            }
        },
        Commands::Notify {
            title,
            message,
            customer,
        } => commands::notify::send(&app, console, &title, &message, customer).await?,
        Commands::Push { action } => match action {
            PushAction::Test => commands::diagnose::push_test(&app, console).await?,
        },
        Commands::Diagnose => commands::diagnose::run(&app, console).await?,
    }

    console.out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cartaozinho",
            "home",
            "--api-url",
            "http://localhost:3000/api",
        ])
        .map_err(|e| e.to_string());
        assert!(matches!(
            cli,
            Ok(Cli { api_url: Some(ref url), command: Commands::Home, .. })
                if url == "http://localhost:3000/api"
        ));
    }

    #[test]
    fn test_card_id_parsed() {
        let cli = Cli::try_parse_from(["cartaozinho", "card", "redeem", "12", "--yes"])
            .map_err(|e| e.to_string());
        assert!(matches!(
            cli,
            Ok(Cli {
                command: Commands::Card {
                    action: CardAction::Redeem { yes: true, .. }
                },
                ..
            })
        ));
    }
}
