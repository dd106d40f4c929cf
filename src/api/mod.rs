pub mod builder;
pub mod client;
pub mod router;
pub mod types;

// Re-export main types for easier importing
pub use builder::{build_client, build_client_from_env};
pub use client::OllamaClient;
pub use router::Route;
pub use types::{
    decode_ndjson, ChatMessage, ChatRequest, ChatResponse, CopyModelRequest, DeleteModelRequest,
    EmbeddingsRequest, EmbeddingsResponse, GenerateRequest, GenerateResponse, LoginRequest,
    LoginResponse, ModelInfoRequest, ModelInfoResponse, ModelSummary, ModelsResponse,
    PullModelRequest, PullProgress,
};
