//! Configuration management for the newschat service.
//!
//! Configuration is merged from multiple sources, in increasing
//! precedence:
//! - Built-in defaults
//! - An optional YAML config file
//! - Environment variables
//! - Command-line flags (applied by the server binary)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default wall-clock budget for a whole chat request, in seconds.
pub const DEFAULT_REQUEST_BUDGET_SECS: u64 = 60;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to
    pub bind_addr: String,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Vector-search backend settings
    pub search: SearchConfig,

    /// Language-model backend settings
    pub llm: LlmConfig,

    /// Wall-clock budget for the pre-stream pipeline phase, in seconds
    pub request_budget_secs: u64,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Vector-search backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Backend host endpoint (e.g., "https://my-index-abc123.svc.pinecone.io")
    pub host: String,

    /// Index name
    pub index: String,

    /// Record namespace within the index
    pub namespace: String,

    /// API key, resolved from the environment
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

/// Language-model backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible endpoint base URL
    pub endpoint: String,

    /// API key, resolved from the environment
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    server: Option<ServerSection>,
    search: Option<SearchSection>,
    llm: Option<LlmSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Deserialize)]
struct ServerSection {
    bind: Option<String>,
    #[serde(rename = "requestBudgetSecs")]
    request_budget_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchSection {
    host: Option<String>,
    index: Option<String>,
    namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LlmSection {
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            config_file: None,
            search: SearchConfig {
                host: String::new(),
                index: String::new(),
                namespace: "articles".to_string(),
                api_key: None,
            },
            llm: LlmConfig {
                endpoint: "https://api.deepseek.com/v1".to_string(),
                api_key: None,
            },
            request_budget_secs: DEFAULT_REQUEST_BUDGET_SECS,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `NEWSCHAT_CONFIG`: Path to YAML config file
    /// - `NEWSCHAT_BIND`: Bind address
    /// - `PINECONE_HOST`: Search backend host endpoint
    /// - `PINECONE_INDEX`: Search index name
    /// - `PINECONE_API_KEY`: Search backend API key
    /// - `DEEPSEEK_API_KEY`: Language-model API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("NEWSCHAT_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // YAML config file sits below environment variables
        if let Some(path) = config.config_file.clone() {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Config file does not exist: {:?}",
                    path
                )));
            }
            config = config.merge_yaml(&path)?;
        }

        if let Ok(bind) = std::env::var("NEWSCHAT_BIND") {
            config.bind_addr = bind;
        }

        if let Ok(host) = std::env::var("PINECONE_HOST") {
            config.search.host = host;
        }

        if let Ok(index) = std::env::var("PINECONE_INDEX") {
            config.search.index = index;
        }

        config.search.api_key = std::env::var("PINECONE_API_KEY").ok();
        config.llm.api_key = std::env::var("DEEPSEEK_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(server) = config_file.server {
            if let Some(bind) = server.bind {
                result.bind_addr = bind;
            }
            if let Some(budget) = server.request_budget_secs {
                result.request_budget_secs = budget;
            }
        }

        if let Some(search) = config_file.search {
            if let Some(host) = search.host {
                result.search.host = host;
            }
            if let Some(index) = search.index {
                result.search.index = index;
            }
            if let Some(namespace) = search.namespace {
                result.search.namespace = namespace;
            }
        }

        if let Some(llm) = config_file.llm {
            if let Some(endpoint) = llm.endpoint {
                result.llm.endpoint = endpoint;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and files.
    pub fn with_overrides(
        mut self,
        bind_addr: Option<String>,
        config_file: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(bind_addr) = bind_addr {
            self.bind_addr = bind_addr;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration for serving traffic.
    pub fn validate(&self) -> AppResult<()> {
        if self.search.host.is_empty() {
            return Err(AppError::Config(
                "Search backend host is not set (PINECONE_HOST)".to_string(),
            ));
        }

        if self.search.index.is_empty() {
            return Err(AppError::Config(
                "Search index name is not set (PINECONE_INDEX)".to_string(),
            ));
        }

        if self.search.api_key.is_none() {
            return Err(AppError::Config(
                "Search backend API key is not set (PINECONE_API_KEY)".to_string(),
            ));
        }

        if self.llm.api_key.is_none() {
            return Err(AppError::Config(
                "Language-model API key is not set (DEEPSEEK_API_KEY)".to_string(),
            ));
        }

        if self.request_budget_secs == 0 {
            return Err(AppError::Config(
                "Request budget must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}
