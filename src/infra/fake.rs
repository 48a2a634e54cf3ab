//! 内存版 ServiceInvoker（仅测试使用）
//!
//! 模拟远程投递定义存储，并记录每次调用

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

use super::service_client::{ServiceError, ServiceInvoker};
use crate::domain::short_def;
use crate::services::definition::{CREATE_SERVICE, DELETE_SERVICE, EDIT_SERVICE, GET_LIST_SERVICE};

/// 固定的最后更新时间
pub const LAST_UPDATED_UTC: &str = "2013-05-01T10:00:00";

#[derive(Default)]
pub struct FakeInvoker {
    calls: Mutex<Vec<(String, Value)>>,
    store: Mutex<Vec<Value>>,
    failure: Option<String>,
}

impl FakeInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有调用都返回失败
    pub fn failing(details: &str) -> Self {
        Self {
            failure: Some(details.to_string()),
            ..Self::default()
        }
    }

    /// 已调用的服务名
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn last_payload(&self) -> Option<Value> {
        self.calls.lock().unwrap().last().map(|(_, p)| p.clone())
    }

    fn fail(service: &str, details: impl Into<String>) -> ServiceError {
        ServiceError::Failed {
            service: service.to_string(),
            details: details.into(),
        }
    }
}

#[async_trait]
impl ServiceInvoker for FakeInvoker {
    async fn invoke(&self, service: &str, payload: Value) -> Result<Value, ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push((service.to_string(), payload.clone()));

        if let Some(details) = &self.failure {
            return Err(Self::fail(service, details.clone()));
        }

        let mut store = self.store.lock().unwrap();
        match service {
            GET_LIST_SERVICE => {
                let items: Vec<Value> = store
                    .iter()
                    .filter(|item| {
                        item["cluster_id"] == payload["cluster_id"]
                            && item["target_type"] == payload["target_type"]
                    })
                    .cloned()
                    .collect();
                Ok(Value::Array(items))
            }
            CREATE_SERVICE => {
                let id = store
                    .iter()
                    .filter_map(|item| item["id"].as_i64())
                    .max()
                    .unwrap_or(0)
                    + 1;
                let mut item = payload.clone();
                item["id"] = json!(id);
                item["short_def"] = json!(stored_short_def(&payload));
                item["last_updated_utc"] = json!(LAST_UPDATED_UTC);
                store.push(item);
                // 与真实服务一致：只返回 id 和 name
                Ok(json!({ "id": id, "name": payload["name"] }))
            }
            EDIT_SERVICE => {
                let id = payload["id"].as_str().unwrap_or_default().to_string();
                let item = store
                    .iter_mut()
                    .find(|item| item["id"].to_string() == id)
                    .ok_or_else(|| Self::fail(service, format!("No such definition [{}]", id)))?;
                let mut updated = payload.clone();
                updated["id"] = item["id"].clone();
                updated["short_def"] = json!(stored_short_def(&payload));
                updated["last_updated_utc"] = json!(LAST_UPDATED_UTC);
                *item = updated;
                Ok(json!({ "id": item["id"], "name": payload["name"] }))
            }
            DELETE_SERVICE => {
                let id = payload["id"].as_str().unwrap_or_default().to_string();
                let before = store.len();
                store.retain(|item| item["id"].to_string() != id);
                if store.len() == before {
                    return Err(Self::fail(service, format!("No such definition [{}]", id)));
                }
                Ok(Value::Null)
            }
            _ => Err(Self::fail(service, format!("Unknown service [{}]", service))),
        }
    }
}

fn stored_short_def(payload: &Value) -> String {
    short_def(
        payload["check_after"].as_i64().unwrap_or_default(),
        payload["retry_repeats"].as_i64().unwrap_or_default(),
        payload["retry_seconds"].as_i64().unwrap_or_default(),
    )
}
