use axum::Json;
use axum::http::HeaderMap;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Config;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

/// Bearer token payload. Re-verified on every protected request; there is no
/// server-side session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

fn generate_token_with_expiry(
    id: i32,
    email: &str,
    role: &str,
    secret: &str,
    expiry_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::seconds(expiry_secs as i64))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        id,
        email: email.to_string(),
        role: role.to_string(),
        exp: expiration,
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn generate_token(
    id: i32,
    email: &str,
    role: &str,
    config: &Config,
) -> Result<String, jsonwebtoken::errors::Error> {
    generate_token_with_expiry(id, email, role, &config.jwt_secret, config.jwt_expiration_secs)
}

/// Admin sessions get the shorter expiry.
pub fn generate_admin_token(
    id: i32,
    email: &str,
    config: &Config,
) -> Result<String, jsonwebtoken::errors::Error> {
    generate_token_with_expiry(
        id,
        email,
        "admin",
        &config.jwt_secret,
        config.admin_jwt_expiration_secs,
    )
}

pub fn verify_token(token: &str, config: &Config) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn message_response(message: impl Into<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: message.into(),
    })
}

/// Best-effort client IP, preferring proxy headers over nothing at all.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .map(|s| s.trim().to_string())
}

/// Country code as stamped by the hosting platform's edge, when present.
pub fn client_country(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-vercel-ip-country")
        .or_else(|| headers.get("cf-ipcountry"))
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

pub fn generate_verification_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/rawi".into(),
            jwt_secret: "test-secret".into(),
            jwt_expiration_secs: 24 * 3600,
            admin_jwt_expiration_secs: 3600,
            server_host: "::".into(),
            server_port: 3000,
            gemini_api_key: None,
            smtp_host: None,
            smtp_user: None,
            smtp_pass: None,
            smtp_from: None,
            admin_username: "admin".into(),
            admin_email: "admin@rawi.com".into(),
            admin_password: "admin123".into(),
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let config = test_config();
        let token = generate_token(7, "user@rawi.com", "user", &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "user@rawi.com");
        assert_eq!(claims.role, "user");
        assert!(!claims.is_admin());
    }

    #[test]
    fn admin_token_carries_admin_role() {
        let config = test_config();
        let token = generate_admin_token(1, "admin@rawi.com", &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        assert!(claims.is_admin());
        // Admin expiry is the short one.
        assert!(claims.exp - claims.iat <= 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let claims = Claims {
            id: 1,
            email: "user@rawi.com".into(),
            role: "user".into(),
            exp: Utc::now().timestamp() - 7200,
            iat: Utc::now().timestamp() - 10_800,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = test_config();
        let mut other = test_config();
        other.jwt_secret = "different".into();
        let token = generate_token(1, "user@rawi.com", "user", &other).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn client_ip_prefers_real_ip_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.5, 10.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.5"));

        headers.insert("x-real-ip", "198.51.100.2".parse().unwrap());
        assert_eq!(client_ip(&headers).as_deref(), Some("198.51.100.2"));

        assert_eq!(client_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn verification_code_is_six_digits() {
        for _ in 0..32 {
            let code = generate_verification_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
