//! Gadget Cart CLI - drive the storefront cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart grouped by seller
//! cart-cli show
//!
//! # Step a quantity up or down
//! cart-cli inc --seller 3 --gadget 17
//! cart-cli dec --seller 3 --gadget 17
//!
//! # Remove one gadget, or everything from a seller
//! cart-cli remove --seller 3 --gadget 17
//! cart-cli remove-seller --seller 3 --yes
//!
//! # Add from a product page
//! cart-cli add --gadget 42 --quantity 2
//!
//! # Order every available item, or only some
//! cart-cli checkout
//! cart-cli checkout --gadget 17 --gadget 42
//! ```
//!
//! Configuration comes from the environment (see `gadget_cart_client::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use gadget_cart_client::ClientConfig;
use gadget_cart_core::{GadgetId, SellerId};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod prompt;
mod render;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Gadget storefront cart")]
struct Cli {
    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart grouped by seller
    Show,
    /// Add one unit of a gadget already in the cart
    Inc {
        #[arg(short, long)]
        seller: SellerId,
        #[arg(short, long)]
        gadget: GadgetId,
    },
    /// Remove one unit of a gadget, never going below 1
    Dec {
        #[arg(short, long)]
        seller: SellerId,
        #[arg(short, long)]
        gadget: GadgetId,
    },
    /// Remove a gadget from the cart
    Remove {
        #[arg(short, long)]
        seller: SellerId,
        #[arg(short, long)]
        gadget: GadgetId,
    },
    /// Remove every gadget of a seller
    RemoveSeller {
        #[arg(short, long)]
        seller: SellerId,
    },
    /// Add a gadget to the cart
    Add {
        #[arg(short, long)]
        gadget: GadgetId,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Place an order for selected gadgets (default: every available gadget)
    Checkout {
        #[arg(short, long)]
        gadget: Vec<GadgetId>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
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

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gadget_cart_client=info,gadget_cart_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = ClientConfig::from_env();

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = match config {
        Ok(config) => commands::run(&config, cli.command, cli.yes).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}
