use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use rawi_backend::{
    AppState,
    config::Config,
    mailer::Mailer,
    middleware::{admin_middleware, auth_middleware, log_errors},
    routes,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client");

    let mailer = Mailer::from_config(&config);
    if mailer.is_none() {
        tracing::warn!("SMTP is not configured; verification codes will be logged");
    }

    let state = AppState {
        pool,
        config: config.clone(),
        http,
        mailer,
    };

    let public_routes = Router::new()
        .route("/", get(routes::system::welcome))
        .route("/api/init-db", get(routes::system::init_db))
        .route("/api/books", get(routes::books::list_books))
        .route("/api/auth/signup", post(routes::auth::signup))
        .route("/api/auth/verify", post(routes::auth::verify))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/admin/login", post(routes::admin::admin_login))
        .route("/api/chat", post(routes::chat::chat))
        .route("/api/users/search", get(routes::users::search_users))
        .route("/api/users/{id}", get(routes::users::get_user))
        .route("/api/users/{id}/favorites", get(routes::favorites::user_favorites))
        .route("/api/users/{id}/followers", get(routes::follows::followers))
        .route("/api/users/{id}/following", get(routes::follows::following));

    let protected_routes = Router::new()
        .route("/api/books/submit", post(routes::books::submit_book))
        .route("/api/users/profile", put(routes::users::update_profile))
        .route("/api/favorites", post(routes::favorites::add_favorite))
        .route("/api/favorites/{id}", delete(routes::favorites::remove_favorite))
        .route("/api/connections/request", post(routes::connections::request_connection))
        .route("/api/connections/{id}/respond", put(routes::connections::respond_connection))
        .route("/api/connections", get(routes::connections::list_connections))
        .route("/api/connections/status/{id}", get(routes::connections::connection_status))
        .route("/api/follow", post(routes::follows::follow_user))
        .route("/api/follow/{id}", delete(routes::follows::unfollow_user))
        .route("/api/messages", post(routes::messages::send_message))
        .route(
            "/api/messages/{id}",
            get(routes::messages::get_thread)
                .put(routes::messages::edit_message)
                .delete(routes::messages::delete_message),
        )
        .route(
            "/api/messages/conversation/{id}",
            delete(routes::messages::delete_conversation),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/api/admin/users", get(routes::admin::list_users))
        .route("/api/admin/users/{id}", delete(routes::admin::delete_user))
        .route("/api/admin/books/pending", get(routes::books::pending_books))
        .route("/api/admin/books", post(routes::books::create_book))
        .route("/api/admin/books/{id}/status", put(routes::books::moderate_book))
        .route(
            "/api/books/{id}",
            put(routes::books::update_book).delete(routes::books::delete_book),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ));

    // The SPA is served from a different origin.
    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(axum::middleware::from_fn(log_errors))
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Failed to start server");
}
