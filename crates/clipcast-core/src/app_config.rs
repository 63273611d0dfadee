use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub http_timeout_secs: u64,
    pub fb_app_id: String,
    pub fb_api_secret: String,
    pub fb_redirect_uri: String,
    pub fb_api_version: String,
    pub fb_scopes: Vec<String>,
    pub tiktok_client_key: String,
    pub tiktok_client_secret: String,
    pub tiktok_redirect_uri: String,
    pub tiktok_scopes: Vec<String>,
    pub poll_max_attempts: u32,
    pub poll_interval_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("fb_app_id", &self.fb_app_id)
            .field("fb_api_secret", &"[redacted]")
            .field("fb_redirect_uri", &self.fb_redirect_uri)
            .field("fb_api_version", &self.fb_api_version)
            .field("fb_scopes", &self.fb_scopes)
            .field("tiktok_client_key", &self.tiktok_client_key)
            .field("tiktok_client_secret", &"[redacted]")
            .field("tiktok_redirect_uri", &self.tiktok_redirect_uri)
            .field("tiktok_scopes", &self.tiktok_scopes)
            .field("poll_max_attempts", &self.poll_max_attempts)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .finish()
    }
}
