use crate::api::ErrorResponse;
use crate::upstream::UpstreamError;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    /// Upstream JSON reply, unmodified
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

/// Forward a prompt to the generative text endpoint
#[utoipa::path(
    post,
    path = "/api/generate",
    tag = "generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Upstream reply", body = GenerateResponse),
        (status = 400, description = "Missing prompt", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Server misconfigured or internal error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn generate(State(state): State<AppState>, body: Bytes) -> Response {
    // An empty body reads as an empty object
    let request: GenerateRequest = if body.is_empty() {
        GenerateRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!("Rejecting malformed request body: {}", e);
                return error(StatusCode::BAD_REQUEST, "Invalid JSON in request body");
            }
        }
    };

    let Some(prompt) = request.prompt.filter(|p| !p.is_empty()) else {
        return error(StatusCode::BAD_REQUEST, "Missing prompt in request body");
    };

    let Some(upstream) = state.upstream.as_ref() else {
        return error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server misconfigured: GEMINI_API_KEY not set",
        );
    };

    match upstream.generate(&prompt).await {
        Ok(data) => (StatusCode::OK, Json(GenerateResponse { data })).into_response(),
        Err(UpstreamError::Status { status, details }) => {
            tracing::warn!(status = status, "Upstream rejected prompt");
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                Json(ErrorResponse::new("Generative API error").with_details(details)),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Function error: {}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Fallback for every method other than POST on `/api/generate`.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(ErrorResponse::new("Method not allowed")),
    )
        .into_response()
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(generate),
    components(schemas(GenerateRequest, GenerateResponse))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router;
    use crate::upstream::GenerativeUpstream;
    use crate::AppContext;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[derive(Default)]
    struct FakeUpstream {
        reply: Option<(u16, String)>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeUpstream {
        fn failing(status: u16, details: &str) -> Self {
            Self {
                reply: Some((status, details.to_string())),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl GenerativeUpstream for FakeUpstream {
        async fn generate(&self, prompt: &str) -> Result<serde_json::Value, UpstreamError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Some((0, details)) => Err(UpstreamError::Request(details.clone())),
                Some((status, details)) => Err(UpstreamError::Status {
                    status: *status,
                    details: details.clone(),
                }),
                None => Ok(serde_json::json!({"candidates": [{"output": "Toast."}]})),
            }
        }
    }

    fn state(upstream: Option<Arc<FakeUpstream>>, secret: Option<&str>) -> AppState {
        Arc::new(AppContext {
            upstream: upstream.map(|u| u as Arc<dyn GenerativeUpstream>),
            function_secret: secret.map(str::to_string),
        })
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Response) {
        let response = router(state).oneshot(request).await.unwrap();
        (response.status(), response)
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_forwards_prompt() {
        let upstream = Arc::new(FakeUpstream::default());
        let (status, response) =
            send(state(Some(upstream.clone()), None), post(r#"{"prompt":"toast"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"data": {"candidates": [{"output": "Toast."}]}})
        );
        assert_eq!(*upstream.prompts.lock().unwrap(), vec!["toast".to_string()]);
    }

    #[tokio::test]
    async fn test_rejects_other_methods() {
        let request = Request::builder()
            .method("GET")
            .uri("/api/generate")
            .body(Body::empty())
            .unwrap();
        let (status, response) = send(state(None, Some("s3cret")), request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "POST");
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"error": "Method not allowed"})
        );
    }

    #[tokio::test]
    async fn test_missing_prompt() {
        let upstream = Arc::new(FakeUpstream::default());
        for body in ["", "{}", r#"{"prompt":""}"#] {
            let (status, response) = send(state(Some(upstream.clone()), None), post(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
            assert_eq!(
                json_body(response).await["error"],
                "Missing prompt in request body"
            );
        }
        assert!(upstream.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (status, _) = send(state(None, None), post("{prompt")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let (status, response) = send(state(None, None), post(r#"{"prompt":"toast"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await["error"],
            "Server misconfigured: GEMINI_API_KEY not set"
        );
    }

    #[tokio::test]
    async fn test_mirrors_upstream_status() {
        let upstream = Arc::new(FakeUpstream::failing(403, "API key not valid"));
        let (status, response) =
            send(state(Some(upstream), None), post(r#"{"prompt":"toast"}"#)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"error": "Generative API error", "details": "API key not valid"})
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_internal_error() {
        let upstream = Arc::new(FakeUpstream::failing(0, "connection reset"));
        let (status, response) =
            send(state(Some(upstream), None), post(r#"{"prompt":"toast"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"error": "Internal server error"})
        );
    }

    #[tokio::test]
    async fn test_function_secret() {
        let upstream = Arc::new(FakeUpstream::default());
        let app_state = state(Some(upstream), Some("s3cret"));

        let (status, _) = send(app_state.clone(), post(r#"{"prompt":"toast"}"#)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let mut wrong = post(r#"{"prompt":"toast"}"#);
        wrong
            .headers_mut()
            .insert(header::AUTHORIZATION, "Bearer nope".parse().unwrap());
        let (status, _) = send(app_state.clone(), wrong).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let mut authorized = post(r#"{"prompt":"toast"}"#);
        authorized
            .headers_mut()
            .insert(header::AUTHORIZATION, "Bearer s3cret".parse().unwrap());
        let (status, _) = send(app_state, authorized).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unauthed_ping() {
        let request = Request::builder()
            .uri("/api/test/unauthed-ping")
            .body(Body::empty())
            .unwrap();
        let (status, response) = send(state(None, Some("s3cret")), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(response).await["message"], "unauthed-ping");
    }
}
