use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub admin_jwt_expiration_secs: u64,
    pub server_host: String,
    pub server_port: u16,
    pub gemini_api_key: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub smtp_from: Option<String>,
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        // Expiries are given in hours ("24" or "24h" are both accepted).
        let jwt_expiration = env::var("JWT_EXPIRATION")
            .unwrap_or_else(|_| "24".into())
            .trim_end_matches('h')
            .parse::<u64>()
            .unwrap_or(24);
        // Admin sessions have historically been shorter than user sessions.
        let admin_jwt_expiration = env::var("ADMIN_JWT_EXPIRATION")
            .unwrap_or_else(|_| "1".into())
            .trim_end_matches('h')
            .parse::<u64>()
            .unwrap_or(1);

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_expiration_secs: jwt_expiration * 3600,
            admin_jwt_expiration_secs: admin_jwt_expiration * 3600,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".into()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            // The key variable was renamed at some point; accept both spellings.
            gemini_api_key: env::var("GEMINI_API_KEY")
                .or_else(|_| env::var("GOOGLE_API_KEY"))
                .ok(),
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_user: env::var("SMTP_USER").ok(),
            smtp_pass: env::var("SMTP_PASS").ok(),
            smtp_from: env::var("SMTP_FROM").ok(),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@rawi.com".into()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
        })
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    pub fn admin_jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.admin_jwt_expiration_secs)
    }
}
