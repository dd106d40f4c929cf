pub mod api;
pub mod core;

pub use crate::api::{build_client, OllamaClient, Route};
pub use crate::core::{
    config::ClientConfig,
    errors::OllamaError,
    traits::{Authentication, Inference, ModelCatalog, OllamaApi, Reachability},
    types::*,
};
