use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookhub_server::clients::{
    http_client, HttpInvoiceGateway, HttpJokeSource, InvoiceGateway, JokeSource,
};
use bookhub_server::db::{create_pool, ensure_database_dir, run_migrations};
use bookhub_server::{routes, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookhub_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting BookHub Server...");

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, Server: {}",
        config.environment,
        config.server_address()
    );

    // Create database connection pool
    ensure_database_dir(&config.database_url)?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    // Outbound clients
    let client = http_client()?;
    let jokes: Arc<dyn JokeSource> = Arc::new(HttpJokeSource::new(
        client.clone(),
        config.joke_api_url.clone(),
        config.joke_api_key.clone(),
    ));
    let invoices: Option<Arc<dyn InvoiceGateway>> = match &config.invoice_api_key {
        Some(key) => Some(Arc::new(HttpInvoiceGateway::new(
            client,
            config.invoice_api_url.clone(),
            key.clone(),
        ))),
        None => {
            tracing::info!("INVOICE_API_KEY not set, rentals are paid without invoices");
            None
        }
    };

    // Configure CORS
    let origins = config
        .allowed_origins
        .iter()
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let addr: SocketAddr = config.server_address().parse()?;

    // Create app state
    let state = AppState::new(pool, config, jokes, invoices);

    // Build router
    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
