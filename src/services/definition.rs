//! 投递定义的列表/创建/编辑/删除
//!
//! 每个操作都是一次性的：校验 → 按服务名调用远程服务 → 字段映射

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::domain::delivery::{parse_int, FormData};
use crate::domain::{
    DefinitionInput, DeliveryDefinition, FormDescriptor, TargetType, UserProfile, ValidationError,
};
use crate::error::{ApiError, ApiResult};
use crate::infra::{ServiceError, ServiceInvoker};

pub const GET_LIST_SERVICE: &str = "zato.pattern.delivery.definition.get-list";
pub const CREATE_SERVICE: &str = "zato.pattern.delivery.definition.create";
pub const EDIT_SERVICE: &str = "zato.pattern.delivery.definition.edit";
pub const DELETE_SERVICE: &str = "zato.pattern.delivery.definition.delete";

/// 删除失败时的固定提示
pub const DELETE_ERROR_MESSAGE: &str = "Could not delete delivery";

/// 编辑表单字段前缀
const EDIT_FORM_PREFIX: &str = "edit-";

/// 列表页上下文
#[derive(Debug, Serialize)]
pub struct ListContext {
    pub items: Vec<DeliveryDefinition>,
    pub delivery_target_form: FormDescriptor,
    pub create_form: FormDescriptor,
    pub edit_form: FormDescriptor,
    pub cluster_id: Option<i64>,
    pub target_type: Option<TargetType>,
    pub target_type_human: String,
}

/// 创建/编辑成功后的返回
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResponse {
    pub id: String,
    pub name: String,
    pub target: String,
    pub short_def: String,
    pub message: String,
}

/// 删除成功后的返回
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: String,
}

/// 列出某集群下某目标类型的投递定义
///
/// 未指定 `target_type` 时不调用远程服务，只返回空列表和表单
pub async fn list(
    invoker: &dyn ServiceInvoker,
    profile: &UserProfile,
    query: &HashMap<String, String>,
) -> ApiResult<ListContext> {
    let target_type = non_blank(query, "target_type")
        .map(TargetType::parse)
        .transpose()?;
    let cluster_id = non_blank(query, "cluster_id")
        .map(|v| parse_int("cluster_id", v))
        .transpose()?;

    let items = match (cluster_id, target_type) {
        (Some(cluster_id), Some(target_type)) => {
            fetch_list(invoker, profile, cluster_id, target_type).await?
        }
        (None, Some(_)) => {
            return Err(ValidationError::MissingField("cluster_id".to_string()).into());
        }
        _ => Vec::new(),
    };

    Ok(ListContext {
        items,
        delivery_target_form: FormDescriptor::delivery_target(query),
        create_form: FormDescriptor::create(),
        edit_form: FormDescriptor::edit(),
        cluster_id,
        target_type,
        target_type_human: target_type.map(|t| t.human().to_string()).unwrap_or_default(),
    })
}

async fn fetch_list(
    invoker: &dyn ServiceInvoker,
    profile: &UserProfile,
    cluster_id: i64,
    target_type: TargetType,
) -> ApiResult<Vec<DeliveryDefinition>> {
    let payload = json!({
        "cluster_id": cluster_id,
        "target_type": target_type.as_str(),
    });

    let response = invoker
        .invoke(GET_LIST_SERVICE, payload)
        .await
        .map_err(|e| remote_error(GET_LIST_SERVICE, e))?;

    let items: Vec<DeliveryDefinition> = if response.is_null() {
        Vec::new()
    } else {
        serde_json::from_value(response).map_err(|e| {
            ApiError::remote(
                format!("Could not parse response of [{}]", GET_LIST_SERVICE),
                Some(e.to_string()),
            )
        })?
    };

    Ok(items
        .into_iter()
        .map(|mut item| {
            if let Some(utc) = item.last_updated_utc {
                item.last_updated = Some(profile.from_utc_to_user(utc));
            }
            item
        })
        .collect())
}

/// 创建投递定义
pub async fn create(
    invoker: &dyn ServiceInvoker,
    form: &HashMap<String, String>,
) -> ApiResult<ActionResponse> {
    let input = DefinitionInput::from_form(form, "")?;
    let payload = to_payload(&input)?;

    let response = create_edit(invoker, CREATE_SERVICE, &input, payload).await?;
    info!(id = %response.id, name = %response.name, "Delivery definition created");
    Ok(ActionResponse {
        message: format!("Definition [{}] created successfully", response.name),
        ..response
    })
}

/// 编辑投递定义
///
/// 字段使用 `edit-` 前缀；`id` 接受 `edit-id` 或 `id`
pub async fn edit(
    invoker: &dyn ServiceInvoker,
    form: &HashMap<String, String>,
) -> ApiResult<ActionResponse> {
    let id = FormData::new(form, EDIT_FORM_PREFIX)
        .get("id")
        .or_else(|| FormData::new(form, "").get("id"))
        .ok_or_else(|| ValidationError::MissingField("id".to_string()))?
        .to_string();
    let input = DefinitionInput::from_form(form, EDIT_FORM_PREFIX)?;

    let mut payload = to_payload(&input)?;
    payload["id"] = Value::String(id.clone());

    let response = create_edit(invoker, EDIT_SERVICE, &input, payload).await?;
    info!(id = %id, name = %response.name, "Delivery definition updated");
    Ok(ActionResponse {
        // 编辑接口可能不回传 id
        id: if response.id.is_empty() { id } else { response.id },
        message: format!("Definition [{}] updated successfully", response.name),
        ..response
    })
}

/// 删除投递定义
///
/// 失败时一律返回 "Could not delete delivery"
pub async fn delete(
    invoker: &dyn ServiceInvoker,
    id: &str,
    cluster_id: i64,
) -> ApiResult<DeleteResponse> {
    let payload = json!({ "id": id, "cluster_id": cluster_id });

    match invoker.invoke(DELETE_SERVICE, payload).await {
        Ok(_) => {
            info!(id = %id, cluster_id = cluster_id, "Delivery definition deleted");
            Ok(DeleteResponse {
                success: true,
                id: id.to_string(),
            })
        }
        Err(e) => {
            warn!(id = %id, error = %e, "Failed to delete delivery definition");
            Err(ApiError::remote(DELETE_ERROR_MESSAGE, Some(e.details())))
        }
    }
}

/// 创建/编辑共用：预填 target 与 short_def，远程返回的字段优先
async fn create_edit(
    invoker: &dyn ServiceInvoker,
    service: &str,
    input: &DefinitionInput,
    payload: Value,
) -> ApiResult<ActionResponse> {
    let response = invoker
        .invoke(service, payload)
        .await
        .map_err(|e| remote_error(service, e))?;

    Ok(ActionResponse {
        id: string_field(&response, "id").unwrap_or_default(),
        name: string_field(&response, "name").unwrap_or_else(|| input.name.clone()),
        target: string_field(&response, "target").unwrap_or_else(|| input.target.clone()),
        short_def: string_field(&response, "short_def").unwrap_or_else(|| input.short_def()),
        message: String::new(),
    })
}

fn to_payload(input: &DefinitionInput) -> ApiResult<Value> {
    serde_json::to_value(input).map_err(|e| ApiError::internal(e.to_string()))
}

/// 远程错误原样返回给用户
fn remote_error(service: &str, err: ServiceError) -> ApiError {
    warn!(service = %service, error = %err, "Service call failed");
    ApiError::remote(err.details(), Some(err.to_string()))
}

fn non_blank<'a>(query: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    query.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
