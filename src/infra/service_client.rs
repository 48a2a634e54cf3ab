//! 远程服务调用 HTTP Client
//!
//! 按服务名调用远程服务层，复用连接池。
//!
//! 请求：`POST {url}/zato/admin/invoke`
//! ```json
//! {"service": "zato.pattern.delivery.definition.get-list", "cid": "...", "payload": {...}}
//! ```
//! 响应：
//! ```json
//! {"zato_env": {"result": "ZATO_OK", "cid": "...", "details": ""}, "response": ...}
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ServiceConfig;

/// 调用路径
const INVOKE_PATH: &str = "/zato/admin/invoke";

/// 服务端成功标记
const RESULT_OK: &str = "ZATO_OK";

/// 远程服务错误
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Failed to reach service invoker: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service invoker returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode response of [{service}]: {message}")]
    Decode { service: String, message: String },

    #[error("Service [{service}] failed: {details}")]
    Failed { service: String, details: String },
}

impl ServiceError {
    /// 远程返回的原始错误文本
    pub fn details(&self) -> String {
        match self {
            ServiceError::Transport(e) => e.to_string(),
            ServiceError::Status { body, .. } => body.clone(),
            ServiceError::Decode { message, .. } => message.clone(),
            ServiceError::Failed { details, .. } => details.clone(),
        }
    }
}

/// 按名字调用远程服务
///
/// handler 只依赖此 trait，测试中替换为内存实现
#[async_trait]
pub trait ServiceInvoker: Send + Sync {
    async fn invoke(&self, service: &str, payload: Value) -> Result<Value, ServiceError>;
}

/// 远程服务客户端
#[derive(Clone)]
pub struct ServiceClient {
    client: Client,
    invoke_url: String,
    credentials: Option<(String, Option<String>)>,
}

impl ServiceClient {
    /// 创建新的远程服务客户端
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        let credentials = config
            .username
            .clone()
            .map(|user| (user, config.password.clone()));

        Ok(Self {
            client,
            invoke_url: format!("{}{}", config.url.trim_end_matches('/'), INVOKE_PATH),
            credentials,
        })
    }

    pub fn invoke_url(&self) -> &str {
        &self.invoke_url
    }
}

#[async_trait]
impl ServiceInvoker for ServiceClient {
    async fn invoke(&self, service: &str, payload: Value) -> Result<Value, ServiceError> {
        let cid = uuid::Uuid::new_v4().to_string();
        let body = InvokeRequest {
            service,
            cid: &cid,
            payload: &payload,
        };

        let mut request = self.client.post(&self.invoke_url).json(&body);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, password.as_deref());
        }

        debug!(service = %service, cid = %cid, "Invoking service");
        let response = request.send().await.map_err(|e| {
            warn!(service = %service, cid = %cid, error = %e, "Service invocation failed");
            ServiceError::Transport(e)
        })?;

        let status = response.status();
        let text = response.text().await?;
        decode_response(service, &cid, status.as_u16(), &text)
    }
}

/// 解析调用结果
///
/// 非 2xx 时优先使用 `zato_env.details` 作为错误文本
fn decode_response(service: &str, cid: &str, status: u16, text: &str) -> Result<Value, ServiceError> {
    let parsed = serde_json::from_str::<InvokeResponse>(text);

    if !(200..300).contains(&status) {
        let body = match parsed {
            Ok(resp) if !resp.zato_env.details.is_empty() => resp.zato_env.details,
            _ => text.to_string(),
        };
        warn!(service = %service, cid = %cid, status = status, "Service invoker returned non-success status");
        return Err(ServiceError::Status { status, body });
    }

    let resp = parsed.map_err(|e| ServiceError::Decode {
        service: service.to_string(),
        message: e.to_string(),
    })?;

    if resp.zato_env.result != RESULT_OK {
        warn!(
            service = %service,
            cid = %cid,
            result = %resp.zato_env.result,
            "Service returned an error"
        );
        return Err(ServiceError::Failed {
            service: service.to_string(),
            details: resp.zato_env.details,
        });
    }

    Ok(resp.response)
}

/// 调用请求体
#[derive(Serialize)]
struct InvokeRequest<'a> {
    service: &'a str,
    cid: &'a str,
    payload: &'a Value,
}

/// 调用响应
#[derive(Deserialize)]
struct InvokeResponse {
    zato_env: ZatoEnv,
    #[serde(default)]
    response: Value,
}

#[derive(Deserialize)]
struct ZatoEnv {
    result: String,
    #[serde(default)]
    details: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State,
        http::{header, HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_invoke_url() {
        let config = ServiceConfig {
            url: "http://localhost:17010/".to_string(),
            ..ServiceConfig::default()
        };
        let client = ServiceClient::new(&config).unwrap();
        assert_eq!(client.invoke_url(), "http://localhost:17010/zato/admin/invoke");
    }

    #[test]
    fn test_decode_ok() {
        let text = r#"{"zato_env": {"result": "ZATO_OK", "cid": "c1", "details": ""},
                       "response": {"id": 1, "name": "N1"}}"#;
        let value = decode_response("svc", "c1", 200, text).unwrap();
        assert_eq!(value["name"], "N1");
    }

    #[test]
    fn test_decode_missing_response_is_null() {
        let text = r#"{"zato_env": {"result": "ZATO_OK"}}"#;
        assert!(decode_response("svc", "c1", 200, text).unwrap().is_null());
    }

    #[test]
    fn test_decode_service_failure() {
        let text = r#"{"zato_env": {"result": "ZATO_ERROR", "details": "Name already exists"}}"#;
        let err = decode_response("svc", "c1", 200, text).unwrap_err();
        assert!(matches!(err, ServiceError::Failed { .. }));
        assert_eq!(err.details(), "Name already exists");
    }

    #[test]
    fn test_decode_http_error() {
        let err = decode_response("svc", "c1", 500, "Traceback (most recent call last)").unwrap_err();
        assert!(matches!(err, ServiceError::Status { status: 500, .. }));
        assert_eq!(err.details(), "Traceback (most recent call last)");

        let text = r#"{"zato_env": {"result": "ZATO_ERROR", "details": "Unauthorized"}}"#;
        let err = decode_response("svc", "c1", 401, text).unwrap_err();
        assert_eq!(err.details(), "Unauthorized");
    }

    type Received = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// 本地起一个 invoke 端点，记录收到的 Authorization 和请求体
    async fn spawn_invoker(received: Received) -> String {
        async fn invoke(
            State(received): State<Received>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> (StatusCode, Json<Value>) {
            let auth = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            received.lock().unwrap().push((auth, body.clone()));

            if body["service"] == "broken" {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"zato_env": {"result": "ZATO_ERROR", "details": "boom"}})),
                );
            }
            let env = json!({"result": "ZATO_OK", "cid": body["cid"], "details": ""});
            (StatusCode::OK, Json(json!({"zato_env": env, "response": body["payload"]})))
        }

        let app = Router::new()
            .route(INVOKE_PATH, post(invoke))
            .with_state(received);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_invoke_over_http() {
        let received = Received::default();
        let url = spawn_invoker(received.clone()).await;

        let client = ServiceClient::new(&ServiceConfig {
            url,
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            ..ServiceConfig::default()
        })
        .unwrap();

        let value = client
            .invoke("zato.pattern.delivery.definition.get-list", json!({"cluster_id": 1}))
            .await
            .unwrap();
        assert_eq!(value, json!({"cluster_id": 1}));

        let err = client.invoke("broken", json!({})).await.unwrap_err();
        assert!(matches!(err, ServiceError::Status { status: 500, .. }));
        assert_eq!(err.details(), "boom");

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 2);
        let (auth, body) = &received[0];
        // base64("admin:secret")
        assert_eq!(auth.as_deref(), Some("Basic YWRtaW46c2VjcmV0"));
        assert_eq!(body["service"], "zato.pattern.delivery.definition.get-list");
        assert_eq!(body["payload"]["cluster_id"], 1);
        assert_eq!(body["cid"].as_str().unwrap().len(), 36);
        assert_ne!(received[1].1["cid"], body["cid"]);
    }

    #[tokio::test]
    async fn test_invoke_without_credentials() {
        let received = Received::default();
        let url = spawn_invoker(received.clone()).await;

        let client = ServiceClient::new(&ServiceConfig {
            url,
            ..ServiceConfig::default()
        })
        .unwrap();
        client.invoke("svc", Value::Null).await.unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert!(received[0].0.is_none());
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_response("svc", "c1", 200, "<html>").unwrap_err();
        assert!(matches!(err, ServiceError::Decode { .. }));
    }
}
