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

/// Process configuration, built once at startup and passed explicitly into
/// the collaborator clients and the pipeline.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Cultural-insights API key. When absent every cultural call is skipped
    /// and returns an empty result, which is indistinguishable downstream from
    /// a market with no data.
    pub qloo_api_key: Option<String>,
    pub qloo_base_url: String,
    pub qloo_request_timeout_secs: u64,
    /// Upper bound on one country's whole profile fetch.
    pub profile_budget_secs: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub gemini_request_timeout_secs: u64,
    /// Fixed width of the generation worker pool.
    pub generation_workers: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "qloo_api_key",
                &self.qloo_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("qloo_base_url", &self.qloo_base_url)
            .field(
                "qloo_request_timeout_secs",
                &self.qloo_request_timeout_secs,
            )
            .field("profile_budget_secs", &self.profile_budget_secs)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field(
                "gemini_request_timeout_secs",
                &self.gemini_request_timeout_secs,
            )
            .field("generation_workers", &self.generation_workers)
            .finish()
    }
}
