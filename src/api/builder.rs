use crate::api::client::OllamaClient;
use crate::core::config::ClientConfig;
use crate::core::errors::OllamaError;
use crate::core::kernel::request::join_url;
use crate::core::kernel::{ReqwestTransport, TransportConfig};
use secrecy::ExposeSecret;

/// Create a client backed by reqwest from a configuration
pub fn build_client(config: ClientConfig) -> Result<OllamaClient<ReqwestTransport>, OllamaError> {
    // Fail early on an unusable base address instead of on the first call
    join_url(&config.base_url, "/")?;

    let transport = ReqwestTransport::new(TransportConfig::from(&config))?;
    let mut client = OllamaClient::new(transport, config.base_url.clone());

    if let Some(token) = config
        .auth_token
        .filter(|token| !token.expose_secret().is_empty())
    {
        client = client.with_token(token);
    }

    Ok(client)
}

/// Create a client from `{PREFIX}_*` environment variables
pub fn build_client_from_env(prefix: &str) -> Result<OllamaClient<ReqwestTransport>, OllamaError> {
    let config = ClientConfig::from_env(prefix)?;
    build_client(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Route;
    use crate::core::config::ConfigError;

    #[test]
    fn test_build_client_default() {
        let client = build_client(ClientConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert!(client.header_overrides().is_empty());
    }

    #[test]
    fn test_build_client_with_token() {
        let config = ClientConfig::default().auth_token("abc".to_string());
        let client = build_client(config).unwrap();

        let request = client.request(&Route::Models).unwrap();
        assert_eq!(request.header("Authorization"), Some("Bearer abc"));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_build_client_rejects_bad_address() {
        let err = build_client(ClientConfig::new("::nope::".to_string())).unwrap_err();
        assert!(matches!(err, OllamaError::AddressError(_)));
    }

    #[test]
    fn test_build_client_from_env() {
        std::env::set_var("OKTEST_BUILD_BASE_URL", "http://gpu-box:11434/ollama");
        std::env::set_var("OKTEST_BUILD_AUTH_TOKEN", "env-token");

        let client = build_client_from_env("oktest_build").unwrap();
        assert_eq!(client.base_url(), "http://gpu-box:11434/ollama");

        let request = client.request(&Route::Models).unwrap();
        assert_eq!(request.url.as_str(), "http://gpu-box:11434/ollama/api/tags");
        assert_eq!(request.header("Authorization"), Some("Bearer env-token"));
    }

    #[test]
    fn test_build_client_from_env_requires_base_url() {
        let err = build_client_from_env("oktest_build_missing").unwrap_err();
        assert!(matches!(
            err,
            OllamaError::ConfigError(ConfigError::MissingEnvironmentVariable(_))
        ));
    }
}
