use crate::api::types::{
    ChatRequest, ChatResponse, CopyModelRequest, DeleteModelRequest, EmbeddingsRequest,
    EmbeddingsResponse, GenerateRequest, GenerateResponse, LoginRequest, LoginResponse,
    ModelInfoRequest, ModelInfoResponse, ModelsResponse, PullModelRequest, PullProgress,
};
use crate::core::errors::OllamaError;
use async_trait::async_trait;

#[async_trait]
pub trait Reachability {
    /// Whether the server answers on its root route
    async fn reachable(&self) -> bool;
}

#[async_trait]
pub trait ModelCatalog {
    /// List locally available models
    async fn models(&self) -> Result<ModelsResponse, OllamaError>;

    async fn model_info(&self, data: ModelInfoRequest) -> Result<ModelInfoResponse, OllamaError>;

    async fn copy_model(&self, data: CopyModelRequest) -> Result<(), OllamaError>;

    async fn delete_model(&self, data: DeleteModelRequest) -> Result<(), OllamaError>;

    /// Pull a model; progress lines are returned once the transfer completes
    async fn pull_model(&self, data: PullModelRequest) -> Result<Vec<PullProgress>, OllamaError>;
}

#[async_trait]
pub trait Inference {
    async fn generate(&self, data: GenerateRequest) -> Result<Vec<GenerateResponse>, OllamaError>;

    /// Send a signed chat request; streamed chunks are returned in order
    async fn chat(&self, data: ChatRequest) -> Result<Vec<ChatResponse>, OllamaError>;

    async fn embeddings(&self, data: EmbeddingsRequest)
        -> Result<EmbeddingsResponse, OllamaError>;
}

#[async_trait]
pub trait Authentication {
    async fn login(&self, data: LoginRequest) -> Result<LoginResponse, OllamaError>;
}

// Composite trait for callers that need the whole API surface
pub trait OllamaApi: Reachability + ModelCatalog + Inference + Authentication {}
