//! Client construction options.

const DEFAULT_API_ROOT: &str = "https://api.wit.ai";
const DEFAULT_API_VERSION: &str = "20160516";

/// Options for building a [`crate::client::WitClient`].
///
/// All fields have working defaults except the token, which defaults to
/// empty (the API will reject unauthenticated calls).
#[derive(Debug, Clone)]
pub struct WitConfig {
    /// Bearer credential sent on every request.
    pub api_token: String,
    /// Base URL of the API.
    pub api_root: String,
    /// Value of the `v` query parameter appended to every request.
    pub api_version: String,
}

impl Default for WitConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            api_root: DEFAULT_API_ROOT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl WitConfig {
    /// Create a config with the given token and default root/version.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            ..Self::default()
        }
    }

    /// Override the API base URL (trailing slash is stripped).
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        let root: String = api_root.into();
        self.api_root = root.trim_end_matches('/').to_string();
        self
    }

    /// Override the API version string.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Load from environment variables (WIT_API_TOKEN, WIT_API_ROOT,
    /// WIT_API_VERSION), reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();

        if let Ok(token) = std::env::var("WIT_API_TOKEN") {
            config.api_token = token;
        }
        if let Ok(root) = std::env::var("WIT_API_ROOT") {
            config = config.with_api_root(root);
        }
        if let Ok(version) = std::env::var("WIT_API_VERSION") {
            config.api_version = version;
        }

        config
    }
}
