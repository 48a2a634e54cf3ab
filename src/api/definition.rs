//! 投递定义管理 API
//!
//! 包含 /pattern/delivery/definition/* 端点

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::domain::UserProfile;
use crate::error::ApiResult;
use crate::middleware::{DeletePath, FormFields, QueryFields, RequireApiKey};
use crate::services::definition::{self, ActionResponse, DeleteResponse, ListContext};
use crate::state::AppState;

/// 创建投递定义路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pattern/delivery/definition", get(list_definitions))
        .route("/pattern/delivery/definition/create", post(create_definition))
        .route("/pattern/delivery/definition/edit", post(edit_definition))
        .route(
            "/pattern/delivery/definition/delete/:id/cluster/:cluster_id",
            post(delete_definition),
        )
}

/// 列出投递定义
///
/// GET /pattern/delivery/definition?cluster_id=..&target_type=..
async fn list_definitions(
    _auth: RequireApiKey,
    profile: UserProfile,
    State(state): State<Arc<AppState>>,
    QueryFields(query): QueryFields,
) -> ApiResult<Json<ListContext>> {
    let ctx = definition::list(state.invoker.as_ref(), &profile, &query).await?;
    Ok(Json(ctx))
}

/// 创建投递定义
///
/// POST /pattern/delivery/definition/create (application/x-www-form-urlencoded)
async fn create_definition(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
    FormFields(form): FormFields,
) -> ApiResult<Json<ActionResponse>> {
    let resp = definition::create(state.invoker.as_ref(), &form).await?;
    Ok(Json(resp))
}

/// 编辑投递定义，字段带 `edit-` 前缀
///
/// POST /pattern/delivery/definition/edit
async fn edit_definition(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
    FormFields(form): FormFields,
) -> ApiResult<Json<ActionResponse>> {
    let resp = definition::edit(state.invoker.as_ref(), &form).await?;
    Ok(Json(resp))
}

/// 删除投递定义
///
/// POST /pattern/delivery/definition/delete/:id/cluster/:cluster_id
async fn delete_definition(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
    path: DeletePath,
) -> ApiResult<Json<DeleteResponse>> {
    let resp = definition::delete(state.invoker.as_ref(), &path.id, path.cluster_id).await?;
    Ok(Json(resp))
}
