use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cardstock::catalog::{CatalogClient, RemoteCatalog, SimulatedCatalog};
use cardstock::config::Config;
use cardstock::connectivity::{AlwaysReachable, ConnectivityProbe, HttpProbe};
use cardstock::persist::{self, JsonFileStore, StatePersistor};
use cardstock::state::Theme;
use cardstock::store::{Action, Store};

#[derive(Parser)]
#[command(name = "cardstock", about = "Paginated catalog browser")]
struct Cli {
    /// Use the built-in simulated catalog instead of the network.
    #[arg(long, global = true)]
    simulate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch catalog pages and print the items.
    Browse {
        /// Number of fetch-more dispatches to issue.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show one item's details, fetching pages until it is loaded.
    Detail { id: u64 },
    /// Toggle an item in the like-set.
    Like { id: String },
    /// Toggle the theme preference.
    Theme {
        /// Explicit current theme overriding the stored preference.
        #[arg(long)]
        current: Option<Theme>,
    },
    /// Print the restored state without dispatching anything.
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load()?;
    let store = build_store(&cli, &config)?;

    match cli.command {
        Command::Browse { pages } => {
            for _ in 0..pages {
                store.dispatch_and_wait(Action::FetchMore).await;
            }
            print_catalog(&store);
        }
        Command::Detail { id } => {
            while store.state().item(id).is_none() && store.state().next_page().is_some() {
                store.dispatch_and_wait(Action::FetchMore).await;
            }
            let Some(item) = store.state().item(id).cloned() else {
                anyhow::bail!("item {id} is not in the catalog");
            };
            store.dispatch_and_wait(Action::Select { id }).await;
            println!("{}", item.title);
            for line in item.description_lines() {
                println!("  {line}");
            }
        }
        Command::Like { id } => {
            store.dispatch_and_wait(Action::ToggleLike { id }).await;
            println!("liked: {:?}", store.state().likes.ids());
        }
        Command::Theme { current } => {
            store
                .dispatch_and_wait(Action::ToggleTheme { explicit: current })
                .await;
            println!("theme: {:?}", store.state().theme);
        }
        Command::Show => {
            let state = store.state();
            println!("items loaded: {}", state.items.len());
            println!("liked: {:?}", state.likes.ids());
            println!("theme: {:?}", state.theme);
        }
    }

    Ok(())
}

fn build_store(cli: &Cli, config: &Config) -> Result<Store> {
    let catalog: Arc<dyn CatalogClient> = if cli.simulate {
        Arc::new(SimulatedCatalog::new())
    } else {
        Arc::new(RemoteCatalog::new(
            &config.catalog.endpoint,
            Duration::from_secs(config.catalog.connect_timeout_seconds),
            Duration::from_secs(config.catalog.request_timeout_seconds),
        )?)
    };

    let probe: Arc<dyn ConnectivityProbe> = if cli.simulate {
        Arc::new(AlwaysReachable)
    } else {
        Arc::new(HttpProbe::new(
            &config.connectivity.probe_url,
            Duration::from_secs(config.connectivity.timeout_seconds),
        )?)
    };

    let storage_path = config
        .storage
        .path
        .clone()
        .unwrap_or_else(JsonFileStore::default_path);
    let persistor = StatePersistor::new(Arc::new(JsonFileStore::open(storage_path)?));
    let initial = persist::restore_state(&persistor);

    Ok(Store::builder(initial, catalog, probe)
        .persistor(persistor)
        .retry_policy(config.retry.to_policy())
        .build())
}

fn print_catalog(store: &Store) {
    let state = store.state();
    println!(
        "{} of {} items loaded ({} pages reported)",
        state.items.len(),
        state.total_count,
        state.total_pages
    );
    for item in &state.items {
        let liked = if state.likes.is_liked(item.id) { "*" } else { " " };
        println!("{liked} {:>4}  {}", item.id, item.title);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
