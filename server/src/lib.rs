//! Documentation of the city directory backend.
//!
//! # General Infrastructure
//! - User goes to the public endpoint running a reverse proxy
//! - The proxy forwards into the backend container; only 1 proxy layer
//! - Containers talk to each other using internal names
//! - Redis and Meilisearch are never exposed directly
//!
//! # Startup
//! - Load the catalog artifact (local path, or remote URL when set)
//! - Seed the Redis business hash with any records it does not hold yet,
//!   so admin edits survive restarts
//! - Push the catalog into the Meilisearch index with current vote counts
//!
//! # Rate Limiting
//! - One vote per client per business per day
//! - One vibe submission per client per hour
//! - Both are Redis SET NX EX locks keyed on the forwarded client address,
//!   so expiry is the store's problem, not ours
//! - A held lock answers 429 with a message the widget shows verbatim
//!
//! # Notes
//!
//! ## Redis + Meilisearch
//! Meilisearch could hold everything, but it is fundamentally a search
//! engine, not a database. Vote increments and user lookups happen far more
//! often than searches, so those live in Redis where they are atomic and
//! O(1), and the index is refreshed on writes. Eventual consistency between
//! the two is acceptable here.
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};

use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod search;
pub mod state;
pub mod utils;

use routes::{
    add_favorite_handler, businesses_by_category_handler, businesses_handler, catalog_handler,
    create_business_handler, delete_business_handler, favorites_handler, login_handler,
    remove_favorite_handler, search_handler, signup_handler, update_business_handler,
    vibe_score_handler, vibes_handler, vote_handler,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/api/catalog", get(catalog_handler))
        .route("/api/vibe-score", get(vibe_score_handler))
        .route("/api/vote", post(vote_handler))
        .route("/api/vibes", post(vibes_handler))
        .route(
            "/api/businesses",
            get(businesses_handler).post(create_business_handler),
        )
        .route(
            "/api/businesses/:key",
            get(businesses_by_category_handler)
                .put(update_business_handler)
                .delete(delete_business_handler),
        )
        .route("/api/search", get(search_handler))
        .route("/api/signup", post(signup_handler))
        .route("/api/login", post(login_handler))
        .route("/api/users/:user_id/favorites", get(favorites_handler))
        .route(
            "/api/users/:user_id/favorites/:business_id",
            post(add_favorite_handler).delete(remove_favorite_handler),
        )
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
