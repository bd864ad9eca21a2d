use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub admin_token: String,
    pub cors_origin: String,
    pub resend_api_key: String,
    pub from_email: String,
    pub owner_email: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL").ok(),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            resend_api_key: env::var("RESEND_API_KEY").unwrap_or_default(),
            from_email: env::var("RESEND_FROM_EMAIL")
                .unwrap_or_else(|_| "ScooPo <info@scooposervice.com>".to_string()),
            owner_email: env::var("OWNER_EMAIL")
                .unwrap_or_else(|_| "admin@scoopo.com.au".to_string()),
        }
    }
}
