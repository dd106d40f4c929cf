use crate::api::types::{
    ChatRequest, CopyModelRequest, DeleteModelRequest, EmbeddingsRequest, GenerateRequest,
    LoginRequest, ModelInfoRequest, PullModelRequest,
};
use crate::core::errors::OllamaError;
use crate::core::kernel::Endpoint;
use reqwest::Method;
use serde::Serialize;
use std::collections::HashMap;

/// Every operation the server exposes, with its payload where it has one.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Root,
    Models,
    ModelInfo(ModelInfoRequest),
    Generate(GenerateRequest),
    Chat(ChatRequest),
    CopyModel(CopyModelRequest),
    DeleteModel(DeleteModelRequest),
    PullModel(PullModelRequest),
    Embeddings(EmbeddingsRequest),
    Login(LoginRequest),
}

impl Route {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Models => "models",
            Self::ModelInfo(_) => "model_info",
            Self::Generate(_) => "generate",
            Self::Chat(_) => "chat",
            Self::CopyModel(_) => "copy_model",
            Self::DeleteModel(_) => "delete_model",
            Self::PullModel(_) => "pull_model",
            Self::Embeddings(_) => "embeddings",
            Self::Login(_) => "login",
        }
    }
}

fn encode<T: Serialize>(payload: &T) -> Result<Option<Vec<u8>>, OllamaError> {
    serde_json::to_vec(payload)
        .map(Some)
        .map_err(|e| OllamaError::EncodingError(format!("Failed to serialize request body: {}", e)))
}

impl Endpoint for Route {
    fn path(&self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Models => "/api/tags",
            Self::ModelInfo(_) => "/api/show",
            Self::Generate(_) => "/api/generate",
            Self::Chat(_) => "/api/chat",
            Self::CopyModel(_) => "/api/copy",
            Self::DeleteModel(_) => "/api/delete",
            Self::PullModel(_) => "/api/pull",
            Self::Embeddings(_) => "/api/embeddings",
            Self::Login(_) => "/api/user/apple/login",
        }
    }

    fn method(&self) -> Method {
        match self {
            Self::Root | Self::Models => Method::GET,
            Self::DeleteModel(_) => Method::DELETE,
            Self::ModelInfo(_)
            | Self::Generate(_)
            | Self::Chat(_)
            | Self::CopyModel(_)
            | Self::PullModel(_)
            | Self::Embeddings(_)
            | Self::Login(_) => Method::POST,
        }
    }

    /// Sent on every route, bodiless GET/DELETE included; the server expects it.
    fn default_headers(&self) -> HashMap<String, String> {
        HashMap::from([("Content-Type".to_string(), "application/json".to_string())])
    }

    fn encode_body(&self) -> Result<Option<Vec<u8>>, OllamaError> {
        match self {
            Self::Root | Self::Models => Ok(None),
            Self::ModelInfo(data) => encode(data),
            Self::Generate(data) => encode(data),
            Self::Chat(data) => encode(data),
            Self::CopyModel(data) => encode(data),
            Self::DeleteModel(data) => encode(data),
            Self::PullModel(data) => encode(data),
            Self::Embeddings(data) => encode(data),
            Self::Login(data) => encode(data),
        }
    }
}
