use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "OllamaKit/1.0";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub auth_token: Option<Secret<String>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL.to_string())
    }
}

// Custom Serialize implementation - never expose the token in serialization
impl Serialize for ClientConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ClientConfig", 4)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.serialize_field("user_agent", &self.user_agent)?;
        state.serialize_field(
            "auth_token",
            &self.auth_token.as_ref().map(|_| "[REDACTED]"),
        )?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ClientConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ClientConfigHelper {
            #[serde(default = "default_base_url")]
            base_url: String,
            #[serde(default = "default_timeout")]
            timeout_seconds: u64,
            #[serde(default = "default_user_agent")]
            user_agent: String,
            #[serde(default)]
            auth_token: Option<String>,
        }

        let helper = ClientConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            base_url: helper.base_url,
            timeout_seconds: helper.timeout_seconds,
            user_agent: helper.user_agent,
            auth_token: helper.auth_token.map(Secret::new),
        })
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl ClientConfig {
    /// Create a configuration pointing at the given server
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            auth_token: None,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_BASE_URL` (e.g., `OLLAMA_BASE_URL`)
    /// - `{PREFIX}_TIMEOUT_SECONDS` (optional, defaults to 30)
    /// - `{PREFIX}_USER_AGENT` (optional)
    /// - `{PREFIX}_AUTH_TOKEN` (optional)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let base_url_var = format!("{}_BASE_URL", prefix);
        let timeout_var = format!("{}_TIMEOUT_SECONDS", prefix);
        let user_agent_var = format!("{}_USER_AGENT", prefix);
        let token_var = format!("{}_AUTH_TOKEN", prefix);

        let base_url = env::var(&base_url_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(base_url_var))?;

        let timeout_seconds = match env::var(&timeout_var) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidConfiguration(format!("{} is not a number: {}", timeout_var, e))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECONDS,
        };

        let user_agent =
            env::var(&user_agent_var).unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        let auth_token = env::var(&token_var)
            .ok()
            .filter(|token| !token.is_empty())
            .map(Secret::new);

        Ok(Self {
            base_url,
            timeout_seconds,
            user_agent,
            auth_token,
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files holding tokens to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    ///
    /// A missing file is not an error; system environment variables are used instead.
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    #[must_use]
    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Set the bearer token sent with every request
    #[must_use]
    pub fn auth_token(mut self, token: String) -> Self {
        self.auth_token = Some(Secret::new(token));
        self
    }

    pub fn has_token(&self) -> bool {
        self.auth_token
            .as_ref()
            .is_some_and(|token| !token.expose_secret().is_empty())
    }

    /// Get the bearer token (use carefully - exposes secret)
    pub fn token(&self) -> Option<&str> {
        self.auth_token
            .as_ref()
            .map(|token| token.expose_secret().as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_redacts_token() {
        let config = ClientConfig::default().auth_token("super-secret".to_string());
        let json = serde_json::to_string(&config).unwrap();

        assert!(json.contains("[REDACTED]"));
        assert!(!json.contains("super-secret"));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"http://10.0.0.2:11434"}"#).unwrap();

        assert_eq!(config.base_url, "http://10.0.0.2:11434");
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(!config.has_token());
    }

    #[test]
    fn test_from_env() {
        env::set_var("OKTEST_CFG_BASE_URL", "http://gpu-box:11434");
        env::set_var("OKTEST_CFG_TIMEOUT_SECONDS", "5");
        env::set_var("OKTEST_CFG_AUTH_TOKEN", "tok");

        let config = ClientConfig::from_env("oktest_cfg").unwrap();
        assert_eq!(config.base_url, "http://gpu-box:11434");
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.token(), Some("tok"));
    }

    #[test]
    fn test_from_env_missing_base_url() {
        let err = ClientConfig::from_env("oktest_missing").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvironmentVariable(ref var) if var == "OKTEST_MISSING_BASE_URL"));
    }

    #[test]
    fn test_from_env_bad_timeout() {
        env::set_var("OKTEST_BAD_BASE_URL", "http://localhost:11434");
        env::set_var("OKTEST_BAD_TIMEOUT_SECONDS", "soon");

        let err = ClientConfig::from_env("oktest_bad").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration(_)));
    }

    #[cfg(feature = "env-file")]
    #[test]
    fn test_from_env_file_missing_path_uses_environment() {
        env::set_var("OKTEST_NOFILE_BASE_URL", "http://fallback:11434");

        let config =
            ClientConfig::from_env_file_with_path("oktest_nofile", "/nonexistent/ollamakit.env")
                .unwrap();
        assert_eq!(config.base_url, "http://fallback:11434");
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[cfg(feature = "env-file")]
    #[test]
    fn test_from_env_file_reads_values() {
        let path = env::temp_dir().join(format!("ollamakit-{}.env", std::process::id()));
        std::fs::write(
            &path,
            "OKTEST_FILE_BASE_URL=http://from-file:11434\nOKTEST_FILE_USER_AGENT=file-agent/2.0\n",
        )
        .unwrap();

        let config =
            ClientConfig::from_env_file_with_path("oktest_file", path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.base_url, "http://from-file:11434");
        assert_eq!(config.user_agent, "file-agent/2.0");
        assert!(!config.has_token());
    }
}
