use axum::{extract::DefaultBodyLimit, http::StatusCode, routing::get, Json, Router};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use itinero_api::config::{self, Environment};
use itinero_api::database::manager::DatabaseManager;
use itinero_api::middleware::auth::jwt_auth_middleware;

#[derive(Parser)]
#[command(name = "itinero-api")]
#[command(about = "Itinero API - travel itinerary planning backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides ITINERO_API_PORT / PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Apply database migrations and exit")]
    InitDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Itinero API in {:?} mode", config.environment);

    match Cli::parse().command {
        Some(Commands::InitDb) => {
            DatabaseManager::migrate().await?;
            println!("database initialized");
            Ok(())
        }
        Some(Commands::Serve { port }) => serve(port).await,
        None => serve(None).await,
    }
}

async fn serve(port: Option<u16>) -> anyhow::Result<()> {
    let port = port
        .or_else(|| env_port("ITINERO_API_PORT"))
        .or_else(|| env_port("PORT"))
        .unwrap_or(3000);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    println!("Itinero API server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router()).await?;
    Ok(())
}

fn env_port(var: &str) -> Option<u16> {
    std::env::var(var).ok()?.parse().ok()
}

fn router() -> Router {
    Router::new()
        // Public surface
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected API behind the bearer-token middleware
        .merge(api_routes())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config::config().api.max_request_size_bytes))
}

fn cors_layer() -> CorsLayer {
    let config = config::config();
    if !config.security.enable_cors {
        return CorsLayer::new();
    }

    // Local frontends move between ports; outside development only the
    // configured origins may call the API
    if config.environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<axum::http::HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

fn public_routes() -> Router {
    use axum::routing::post;
    use itinero_api::handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register::register))
        .route("/auth/login", post(auth::session::login))
}

fn api_routes() -> Router {
    use axum::routing::{delete, post, put};
    use itinero_api::handlers::protected::{activity, auth, collaborator, itinerary, notification};

    Router::new()
        // Session introspection
        .route("/api/auth/whoami", get(auth::whoami))
        // Itineraries (collection + individual)
        .route(
            "/api/itineraries",
            get(itinerary::list).post(itinerary::create),
        )
        .route(
            "/api/itineraries/:id",
            get(itinerary::detail)
                .put(itinerary::update)
                .delete(itinerary::remove),
        )
        // Activities scoped to an itinerary, mutated by their own id
        .route(
            "/api/itineraries/:id/activities",
            get(activity::list).post(activity::create),
        )
        .route(
            "/api/activities/:id",
            put(activity::update).delete(activity::remove),
        )
        // Collaborators: list/remove per itinerary, invite by payload
        .route(
            "/api/itineraries/:id/collaborators",
            get(collaborator::list),
        )
        .route(
            "/api/itineraries/:id/collaborators/:user_id",
            delete(collaborator::remove),
        )
        .route("/api/collaborators", post(collaborator::invite))
        // Notifications
        .route("/api/notifications", get(notification::list))
        .route("/api/notifications/:id/read", put(notification::mark_read))
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Itinero API (Rust)",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Travel itinerary planning backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "public_auth": "/auth/register, /auth/login (public - token acquisition)",
                "auth": "/api/auth/whoami (protected)",
                "itineraries": "/api/itineraries[/:id] (protected)",
                "activities": "/api/itineraries/:id/activities, /api/activities/:id (protected)",
                "collaborators": "/api/itineraries/:id/collaborators, /api/collaborators (protected)",
                "notifications": "/api/notifications[/:id/read] (protected)",
            }
        }
    }))
}

async fn health() -> (StatusCode, Json<Value>) {
    let checked_at = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "database": "ok",
                    "timestamp": checked_at,
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "database_error": e.to_string(),
                    "timestamp": checked_at,
                }
            })),
        ),
    }
}
