/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing JWT session tokens and signed file URLs.
    pub jwt_secret: String,
    /// Cookie domain attribute (root domain, e.g. "example.com").
    pub cookie_domain: String,
    /// TCP port to listen on (default 3115). Env var: `API_PORT`.
    pub api_port: u16,
    /// Directory for stored submission objects (default "data/objects").
    /// Env var: `STORAGE_ROOT`.
    pub storage_root: String,
    /// Externally visible base URL used in signed file links
    /// (default "http://localhost:3115"). Env var: `PUBLIC_BASE_URL`.
    pub public_base_url: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3115),
            storage_root: std::env::var("STORAGE_ROOT")
                .unwrap_or_else(|_| "data/objects".to_owned()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3115".to_owned()),
        }
    }
}
