//! 表单、查询参数与路径参数提取
//!
//! axum 默认的 rejection 是纯文本，这里统一转为 `ApiError::validation`

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Form,
};
use std::collections::HashMap;

use crate::domain::delivery::parse_int;
use crate::error::ApiError;

/// urlencoded 表单字段
#[derive(Debug, Clone)]
pub struct FormFields(pub HashMap<String, String>);

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
            .await
            .map_err(|e| ApiError::validation(format!("Invalid form body: {}", e.body_text())))?;
        Ok(Self(fields))
    }
}

/// 查询字符串参数
#[derive(Debug, Clone)]
pub struct QueryFields(pub HashMap<String, String>);

#[async_trait]
impl<S> FromRequestParts<S> for QueryFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(fields) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::validation(format!("Invalid query string: {}", e.body_text())))?;
        Ok(Self(fields))
    }
}

/// `/delete/:id/cluster/:cluster_id`
#[derive(Debug, Clone)]
pub struct DeletePath {
    pub id: String,
    pub cluster_id: i64,
}

#[async_trait]
impl<S> FromRequestParts<S> for DeletePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((id, cluster_id)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::validation(format!("Invalid path: {}", e.body_text())))?;

        Ok(Self {
            id,
            cluster_id: parse_int("cluster_id", &cluster_id)?,
        })
    }
}
