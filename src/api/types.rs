use crate::core::errors::OllamaError;
use crate::core::kernel::signer::RequestSigner;
use crate::core::kernel::SignatureStamp;
use crate::core::types::{CompletionOptions, Message, Role};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Signed chat request
///
/// `nonce`, `timestamp` and `signature` are computed once, in the constructor,
/// from `stream`, `nonce`, `model`, `timestamp` and (when non-empty) the
/// messages. Nothing recomputes them afterwards: editing `options` later leaves
/// the signature as it was, and the server accepts that.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    stream: bool,
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Value>,
    nonce: String,
    timestamp: i64,
    signature: String,
    /// Extra knobs, flattened into the body. Not covered by the signature.
    #[serde(flatten)]
    pub options: Option<CompletionOptions>,
}

impl ChatRequest {
    /// Build and sign a chat request with a fresh nonce and the current time.
    ///
    /// Streaming is enabled exactly when no tools are given.
    pub fn new(
        model: impl Into<String>,
        messages: Vec<Message>,
        tools: Option<Vec<Value>>,
        format: Option<Value>,
    ) -> Self {
        let model = model.into();
        let stream = tools.is_none();
        let stamp = RequestSigner::new().stamp(signable_params(stream, &model, &messages));
        Self::assemble(model, messages, tools, format, stamp)
    }

    /// Build and sign with a known nonce and timestamp, e.g. to replay a
    /// recorded request.
    pub fn signed_at(
        model: impl Into<String>,
        messages: Vec<Message>,
        tools: Option<Vec<Value>>,
        format: Option<Value>,
        nonce: String,
        timestamp: i64,
    ) -> Self {
        let model = model.into();
        let stream = tools.is_none();
        let stamp = RequestSigner::new().stamp_with(
            signable_params(stream, &model, &messages),
            nonce,
            timestamp,
        );
        Self::assemble(model, messages, tools, format, stamp)
    }

    fn assemble(
        model: String,
        messages: Vec<Message>,
        tools: Option<Vec<Value>>,
        format: Option<Value>,
        stamp: SignatureStamp,
    ) -> Self {
        Self {
            stream: tools.is_none(),
            model,
            messages,
            tools,
            format,
            nonce: stamp.nonce,
            timestamp: stamp.timestamp,
            signature: stamp.signature,
            options: None,
        }
    }

    /// Attach completion knobs; an all-default set is stored as `None`,
    /// the same way a decoded request without knobs comes back.
    #[must_use]
    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options.into_option();
        self
    }

    pub const fn stream(&self) -> bool {
        self.stream
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn tools(&self) -> Option<&[Value]> {
        self.tools.as_deref()
    }

    pub const fn format(&self) -> Option<&Value> {
        self.format.as_ref()
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }
}

/// The signable subset of a chat request, minus nonce and timestamp.
///
/// `messages` is present only for a non-empty list and keeps message order.
pub fn signable_params(stream: bool, model: &str, messages: &[Message]) -> HashMap<String, String> {
    let mut params = HashMap::from([
        ("stream".to_string(), stream.to_string()),
        ("model".to_string(), model.to_string()),
    ]);

    if !messages.is_empty() {
        let folded = messages
            .iter()
            .map(Message::signing_repr)
            .collect::<Vec<_>>()
            .join(",");
        params.insert("messages".to_string(), folded);
    }

    params
}

// Decoding keeps the transmitted stamp as-is; it never re-signs. A body whose
// stream flag contradicts its tools is rejected.
impl<'de> Deserialize<'de> for ChatRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ChatRequestHelper {
            stream: bool,
            model: String,
            messages: Vec<Message>,
            #[serde(default)]
            tools: Option<Vec<Value>>,
            #[serde(default)]
            format: Option<Value>,
            nonce: String,
            timestamp: i64,
            signature: String,
            #[serde(flatten)]
            options: CompletionOptions,
        }

        let helper = ChatRequestHelper::deserialize(deserializer)?;
        if helper.stream != helper.tools.is_none() {
            return Err(D::Error::custom(format!(
                "stream must be {} when tools are {}",
                helper.tools.is_none(),
                if helper.tools.is_none() { "absent" } else { "present" }
            )));
        }
        Ok(Self {
            stream: helper.stream,
            model: helper.model,
            messages: helper.messages,
            tools: helper.tools,
            format: helper.format,
            nonce: helper.nonce,
            timestamp: helper.timestamp,
            signature: helper.signature,
            options: helper.options.into_option(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub identity_token: String,
    pub authorization_code: String,
    pub user_identifier: String,
    pub login_type: String,
}

impl LoginRequest {
    pub fn new(
        identity_token: impl Into<String>,
        authorization_code: impl Into<String>,
        user_identifier: impl Into<String>,
        login_type: impl Into<String>,
    ) -> Self {
        Self {
            identity_token: identity_token.into(),
            authorization_code: authorization_code.into(),
            user_identifier: user_identifier.into(),
            login_type: login_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub msg: String,
    pub code: i64,
    pub token: String,
    #[serde(rename = "userID")]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfoRequest {
    pub name: String,
}

impl ModelInfoRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    pub stream: bool,
    #[serde(flatten)]
    pub options: Option<CompletionOptions>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            images: None,
            system: None,
            context: None,
            format: None,
            stream: true,
            options: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyModelRequest {
    pub source: String,
    pub destination: String,
}

impl CopyModelRequest {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteModelRequest {
    pub name: String,
}

impl DeleteModelRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullModelRequest {
    pub model: String,
    pub stream: bool,
}

impl PullModelRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            stream: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsRequest {
    pub model: String,
    pub prompt: String,
    #[serde(flatten)]
    pub options: Option<CompletionOptions>,
}

impl EmbeddingsRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            options: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub name: String,
    pub digest: String,
    pub size: u64,
    pub modified_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    #[serde(default)]
    pub modelfile: String,
    #[serde(default)]
    pub parameters: String,
    #[serde(default)]
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub model: String,
    pub created_at: String,
    #[serde(default)]
    pub message: Option<ChatMessage>,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub model: String,
    pub created_at: String,
    pub response: String,
    pub done: bool,
    #[serde(default)]
    pub context: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullProgress {
    pub status: String,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub completed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsResponse {
    pub embedding: Vec<f64>,
}

/// Decode a buffered newline-delimited JSON body, one value per line.
pub fn decode_ndjson<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, OllamaError> {
    body.split(|b| *b == b'\n')
        .enumerate()
        .filter(|(_, line)| !line.iter().all(u8::is_ascii_whitespace))
        .map(|(index, line)| {
            serde_json::from_slice(line).map_err(|e| {
                OllamaError::DecodingError(format!("Line {}: {}", index + 1, e))
            })
        })
        .collect()
}
