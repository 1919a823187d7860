//! LLM provider factory.
//!
//! Creates LLM clients from configuration. Clients are constructed once
//! at startup and injected into the pipeline; no process-wide
//! singletons.

use crate::client::LlmClient;
use crate::providers::DeepSeekClient;
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier (currently only "deepseek")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key for the provider
///
/// # Errors
/// Returns an error if the provider is unknown or a required secret is
/// missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> Result<Arc<dyn LlmClient>, String> {
    match provider.to_lowercase().as_str() {
        "deepseek" => {
            let api_key = api_key.ok_or_else(|| {
                "DeepSeek provider requires an API key".to_string()
            })?;
            let client = match endpoint {
                Some(endpoint) => DeepSeekClient::with_base_url(endpoint, api_key),
                None => DeepSeekClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        _ => Err(format!("Unknown provider: {}", provider)),
    }
}
