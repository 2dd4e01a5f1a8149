use std::env;

use crate::constants::{
    DEFAULT_BCRYPT_COST, DEFAULT_INVOICE_API_URL, DEFAULT_JOKE_API_URL, DEFAULT_TOKEN_TTL_HOURS,
};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub joke_api_url: String,
    pub joke_api_key: Option<String>,
    pub invoice_api_url: String,
    pub invoice_api_key: Option<String>,
    pub log_requests: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/bookhub.db".to_string());

        let allowed_origins = parse_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".to_string()),
        );

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set for token signing")?;

        let token_ttl_hours = env::var("TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_TTL_HOURS.to_string())
            .parse()
            .map_err(|_| "Invalid TOKEN_TTL_HOURS")?;

        let bcrypt_cost = env::var("BCRYPT_COST")
            .unwrap_or_else(|_| DEFAULT_BCRYPT_COST.to_string())
            .parse()
            .map_err(|_| "Invalid BCRYPT_COST")?;

        let joke_api_url =
            env::var("JOKE_API_URL").unwrap_or_else(|_| DEFAULT_JOKE_API_URL.to_string());
        let joke_api_key = optional_var("JOKE_API_KEY");

        let invoice_api_url =
            env::var("INVOICE_API_URL").unwrap_or_else(|_| DEFAULT_INVOICE_API_URL.to_string());
        let invoice_api_key = optional_var("INVOICE_API_KEY");

        let log_requests = parse_flag(&env::var("LOG_REQUESTS").unwrap_or_else(|_| "true".into()))
            .ok_or("Invalid LOG_REQUESTS")?;

        Ok(Config {
            server_host,
            server_port,
            database_url,
            allowed_origins,
            environment,
            jwt_secret,
            token_ttl_hours,
            bcrypt_cost,
            joke_api_url,
            joke_api_key,
            invoice_api_url,
            invoice_api_key,
            log_requests,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Read a variable, treating unset and blank the same
fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_skips_empty() {
        let origins = parse_origins(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_server_address() {
        let config = Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 9000,
            database_url: "sqlite::memory:".to_string(),
            allowed_origins: vec![],
            environment: "test".to_string(),
            jwt_secret: "secret".to_string(),
            token_ttl_hours: 1,
            bcrypt_cost: 4,
            joke_api_url: DEFAULT_JOKE_API_URL.to_string(),
            joke_api_key: None,
            invoice_api_url: DEFAULT_INVOICE_API_URL.to_string(),
            invoice_api_key: None,
            log_requests: false,
        };
        assert_eq!(config.server_address(), "127.0.0.1:9000");
    }
}
