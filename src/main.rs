use std::net::SocketAddr;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use teammate::{AppState, auth, config::Config, db, feed, matches, ratelimit, swipes, users};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("teammate=info")),
        )
        .init();

    let config = Config::load();

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(&config.database_url)
        .await
        .expect("database unreachable");
    db::migrate(&db_pool).await.expect("schema setup failed");

    let identity_json =
        std::fs::read_to_string(&config.identity_config).expect("identity config unreadable");
    let identity = auth::IdentityClient::from_json(
        serde_json::from_str(&identity_json).expect("identity config is not JSON"),
    )
    .expect("identity config incomplete");

    let state = AppState {
        db_pool,
        identity,
        events: broadcast::channel(256).0,
        limits: ratelimit::RateLimits::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .client_url
                .parse::<HeaderValue>()
                .expect("CLIENT_URL is not a valid origin"),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let api = Router::new()
        .nest("/users", users::router())
        .nest("/swipes", swipes::router())
        .nest("/matches", matches::router())
        .route("/feed", get(feed::feed))
        .layer(middleware::from_fn_with_state(state.clone(), ratelimit::general));

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind failed");
    info!("listening on {addr}");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server exited");
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "OK", "message": "TeamMate API is running" }))
}
