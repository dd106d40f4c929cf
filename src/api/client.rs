use crate::api::router::Route;
use crate::api::types::{
    decode_ndjson, ChatRequest, ChatResponse, CopyModelRequest, DeleteModelRequest,
    EmbeddingsRequest, EmbeddingsResponse, GenerateRequest, GenerateResponse, LoginRequest,
    LoginResponse, ModelInfoRequest, ModelInfoResponse, ModelsResponse, PullModelRequest,
    PullProgress,
};
use crate::core::errors::OllamaError;
use crate::core::kernel::{OutboundRequest, RequestBuilder, Transport};
use crate::core::traits::{Authentication, Inference, ModelCatalog, OllamaApi, Reachability};
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{instrument, warn};

/// Typed facade over a [`Transport`] for one server
pub struct OllamaClient<T: Transport> {
    transport: T,
    base_url: String,
    headers: HashMap<String, String>,
    auth_token: Option<Secret<String>>,
}

impl<T: Transport> std::fmt::Debug for OllamaClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("has_token", &self.auth_token.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> OllamaClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            headers: HashMap::new(),
            auth_token: None,
        }
    }

    /// Add a header sent with every call, overriding route defaults
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Send `Authorization: Bearer <token>` with every call
    #[must_use]
    pub fn with_token(mut self, token: Secret<String>) -> Self {
        self.auth_token = Some(token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Caller header overrides applied on top of each route's defaults
    pub fn header_overrides(&self) -> HashMap<String, String> {
        let mut headers = self.headers.clone();
        if let Some(token) = &self.auth_token {
            headers.retain(|key, _| !key.eq_ignore_ascii_case("Authorization"));
            headers.insert(
                "Authorization".to_string(),
                format!("Bearer {}", token.expose_secret()),
            );
        }
        headers
    }

    /// Resolve a route into the request this client would send
    pub fn request(&self, route: &Route) -> Result<OutboundRequest, OllamaError> {
        RequestBuilder::new(self.base_url.as_str())
            .with_headers(&self.header_overrides())
            .build(route)
    }

    #[instrument(skip(self, route), fields(route = route.name()))]
    pub async fn send(&self, route: Route) -> Result<Vec<u8>, OllamaError> {
        let request = self.request(&route)?;
        self.transport.send(request).await
    }

    #[instrument(skip(self, route), fields(route = route.name()))]
    pub async fn send_json<R: DeserializeOwned>(&self, route: Route) -> Result<R, OllamaError> {
        let request = self.request(&route)?;
        self.transport.send_json(request).await
    }
}

#[async_trait]
impl<T: Transport> Reachability for OllamaClient<T> {
    async fn reachable(&self) -> bool {
        match self.send(Route::Root).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Server at {} is not reachable: {}", self.base_url, e);
                false
            }
        }
    }
}

#[async_trait]
impl<T: Transport> ModelCatalog for OllamaClient<T> {
    async fn models(&self) -> Result<ModelsResponse, OllamaError> {
        self.send_json(Route::Models).await
    }

    #[instrument(skip(self, data), fields(model = %data.name))]
    async fn model_info(&self, data: ModelInfoRequest) -> Result<ModelInfoResponse, OllamaError> {
        self.send_json(Route::ModelInfo(data)).await
    }

    #[instrument(skip(self, data), fields(source = %data.source, destination = %data.destination))]
    async fn copy_model(&self, data: CopyModelRequest) -> Result<(), OllamaError> {
        self.send(Route::CopyModel(data)).await.map(|_| ())
    }

    #[instrument(skip(self, data), fields(model = %data.name))]
    async fn delete_model(&self, data: DeleteModelRequest) -> Result<(), OllamaError> {
        self.send(Route::DeleteModel(data)).await.map(|_| ())
    }

    #[instrument(skip(self, data), fields(model = %data.model))]
    async fn pull_model(&self, data: PullModelRequest) -> Result<Vec<PullProgress>, OllamaError> {
        let body = self.send(Route::PullModel(data)).await?;
        decode_ndjson(&body)
    }
}

#[async_trait]
impl<T: Transport> Inference for OllamaClient<T> {
    #[instrument(skip(self, data), fields(model = %data.model, stream = data.stream))]
    async fn generate(&self, data: GenerateRequest) -> Result<Vec<GenerateResponse>, OllamaError> {
        let body = self.send(Route::Generate(data)).await?;
        decode_ndjson(&body)
    }

    #[instrument(skip(self, data), fields(model = %data.model(), stream = data.stream(), nonce = %data.nonce()))]
    async fn chat(&self, data: ChatRequest) -> Result<Vec<ChatResponse>, OllamaError> {
        let body = self.send(Route::Chat(data)).await?;
        decode_ndjson(&body)
    }

    #[instrument(skip(self, data), fields(model = %data.model))]
    async fn embeddings(
        &self,
        data: EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, OllamaError> {
        self.send_json(Route::Embeddings(data)).await
    }
}

#[async_trait]
impl<T: Transport> Authentication for OllamaClient<T> {
    #[instrument(skip(self, data), fields(login_type = %data.login_type))]
    async fn login(&self, data: LoginRequest) -> Result<LoginResponse, OllamaError> {
        self.send_json(Route::Login(data)).await
    }
}

impl<T: Transport> OllamaApi for OllamaClient<T> {}
