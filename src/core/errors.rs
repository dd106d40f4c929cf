use thiserror::Error;

#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Invalid address: {0}")]
    AddressError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    /// Non-2xx response surfaced by the transport.
    #[error("API error: {code} - {message}")]
    ApiError { code: u16, message: String },

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),
}

