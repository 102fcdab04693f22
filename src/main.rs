use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wedding_rsvp::config::{Config, SHEETS_WEBHOOK_URL};
use wedding_rsvp::server::{self, AppState};
use wedding_rsvp::sink::SheetsWebhook;
use wedding_rsvp::store::SqliteStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wedding_rsvp=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Deployments without a database binding run without a primary store;
    // submissions then rely on the spreadsheet mirror alone.
    let store = match &config.db_path {
        Some(path) => match SqliteStore::open(path) {
            Ok(store) => {
                info!(path = %path.display(), "opened RSVP database");
                Some(store)
            }
            Err(e) => {
                eprintln!("failed to open RSVP database at {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => {
            warn!("no RSVP_DB_PATH configured; running without a primary store");
            None
        }
    };

    let sink = SheetsWebhook::new(SHEETS_WEBHOOK_URL);
    let app = server::router(AppState::new(store, sink));

    info!("listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
