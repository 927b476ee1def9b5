use config::Config;
use sqlx::PgPool;

pub mod config;
pub mod mailer;
pub mod middleware;
pub mod schema;
pub mod utils;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub http: reqwest::Client,
    pub mailer: Option<mailer::Mailer>,
}
