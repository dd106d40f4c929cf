use ollamakit::api::types::{
    ChatRequest, CopyModelRequest, DeleteModelRequest, EmbeddingsRequest, GenerateRequest,
    LoginRequest, ModelInfoRequest, PullModelRequest,
};
use ollamakit::core::kernel::{Endpoint, RequestBuilder};
use ollamakit::{Message, OllamaError, Route};
use serde_json::json;
use std::collections::HashMap;

fn all_routes() -> Vec<Route> {
    vec![
        Route::Root,
        Route::Models,
        Route::ModelInfo(ModelInfoRequest::new("llama3")),
        Route::Generate(GenerateRequest::new("llama3", "hello")),
        Route::Chat(ChatRequest::new("llama3", vec![Message::user("hi")], None, None)),
        Route::CopyModel(CopyModelRequest::new("llama3", "llama3-backup")),
        Route::DeleteModel(DeleteModelRequest::new("llama3-backup")),
        Route::PullModel(PullModelRequest::new("mistral")),
        Route::Embeddings(EmbeddingsRequest::new("nomic-embed-text", "hello")),
        Route::Login(LoginRequest::new("id-token", "auth-code", "user-1", "apple")),
    ]
}

#[cfg(test)]
mod router_tests {
    use super::*;

    #[test]
    fn test_route_table() {
        let expected = [
            ("/", "GET"),
            ("/api/tags", "GET"),
            ("/api/show", "POST"),
            ("/api/generate", "POST"),
            ("/api/chat", "POST"),
            ("/api/copy", "POST"),
            ("/api/delete", "DELETE"),
            ("/api/pull", "POST"),
            ("/api/embeddings", "POST"),
            ("/api/user/apple/login", "POST"),
        ];

        let routes = all_routes();
        assert_eq!(routes.len(), expected.len());
        for (route, (path, method)) in routes.iter().zip(expected) {
            assert_eq!(route.path(), path, "path for {}", route.name());
            assert_eq!(route.method().as_str(), method, "method for {}", route.name());
        }
    }

    #[test]
    fn test_default_headers_on_every_route() {
        for route in all_routes() {
            let headers = route.default_headers();
            assert_eq!(headers.len(), 1);
            assert_eq!(headers["Content-Type"], "application/json");
        }
    }

    #[test]
    fn test_builder_merges_headers() {
        let overrides = HashMap::from([
            ("Content-Type".to_string(), "application/x-ndjson".to_string()),
            ("X-Request-Id".to_string(), "abc".to_string()),
        ]);

        let request = RequestBuilder::new("http://localhost:11434")
            .with_headers(&overrides)
            .build(&Route::Models)
            .unwrap();

        assert_eq!(request.header("Content-Type"), Some("application/x-ndjson"));
        assert_eq!(request.header("X-Request-Id"), Some("abc"));
        assert_eq!(request.headers.len(), 2);
    }

    #[test]
    fn test_lowercase_override_replaces_default() {
        let overrides = HashMap::from([("content-type".to_string(), "text/plain".to_string())]);

        let request = RequestBuilder::new("http://localhost:11434")
            .with_headers(&overrides)
            .build(&Route::Chat(ChatRequest::new("m", vec![], None, None)))
            .unwrap();

        let content_types: Vec<&String> = request
            .headers
            .keys()
            .filter(|key| key.eq_ignore_ascii_case("content-type"))
            .collect();
        assert_eq!(content_types.len(), 1);
        assert_eq!(request.header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_builder_keeps_defaults_without_overrides() {
        let request = RequestBuilder::new("http://localhost:11434")
            .build(&Route::Root)
            .unwrap();

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.url.as_str(), "http://localhost:11434/");
        assert!(request.body.is_none());
    }

    #[test]
    fn test_builder_appends_path_to_base() {
        let request = RequestBuilder::new("https://gateway.example.com/llm")
            .build(&Route::Login(LoginRequest::new("i", "c", "u", "apple")))
            .unwrap();

        assert_eq!(
            request.url.as_str(),
            "https://gateway.example.com/llm/api/user/apple/login"
        );
        assert_eq!(request.method.as_str(), "POST");
    }

    #[test]
    fn test_builder_rejects_bad_base() {
        let err = RequestBuilder::new("localhost without scheme")
            .build(&Route::Models)
            .unwrap_err();
        assert!(matches!(err, OllamaError::AddressError(_)));
    }

    #[test]
    fn test_bodies_only_on_payload_routes() {
        for route in all_routes() {
            let request = RequestBuilder::new("http://localhost:11434").build(&route).unwrap();
            match route {
                Route::Root | Route::Models => assert!(request.body.is_none()),
                _ => assert!(request.body.is_some(), "{} has no body", route.name()),
            }
        }
    }

    #[test]
    fn test_chat_body_carries_stamp() {
        let chat = ChatRequest::signed_at(
            "m",
            vec![Message::user("hi")],
            None,
            None,
            "000777".to_string(),
            1_700_000_123,
        );
        let signature = chat.signature().to_string();

        let request = RequestBuilder::new("http://localhost:11434")
            .build(&Route::Chat(chat))
            .unwrap();
        let body = request.json_body().unwrap().unwrap();

        assert_eq!(body["stream"], json!(true));
        assert_eq!(body["nonce"], json!("000777"));
        assert_eq!(body["timestamp"], json!(1_700_000_123));
        assert_eq!(body["signature"], json!(signature));
    }

    #[test]
    fn test_login_body_shape() {
        let request = RequestBuilder::new("http://localhost:11434")
            .build(&Route::Login(LoginRequest::new("id", "code", "user", "apple")))
            .unwrap();

        assert_eq!(
            request.json_body().unwrap(),
            Some(json!({
                "identityToken": "id",
                "authorizationCode": "code",
                "userIdentifier": "user",
                "loginType": "apple",
            }))
        );
    }

    #[test]
    fn test_delete_body_shape() {
        let request = RequestBuilder::new("http://localhost:11434")
            .build(&Route::DeleteModel(DeleteModelRequest::new("old")))
            .unwrap();

        assert_eq!(request.method.as_str(), "DELETE");
        assert_eq!(request.json_body().unwrap(), Some(json!({"name": "old"})));
    }
}
