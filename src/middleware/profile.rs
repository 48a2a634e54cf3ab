//! 用户偏好 Extractor
//!
//! 从请求头读取时区和日期/时间格式，未提供时使用配置中的默认值

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::HeaderMap, request::Parts},
};
use std::sync::Arc;

use super::auth::header_str;
use crate::domain::profile::{parse_utc_offset, UserProfile};
use crate::error::ApiError;
use crate::state::AppState;

pub const TIMEZONE_HEADER: &str = "x-user-timezone";
pub const DATE_FORMAT_HEADER: &str = "x-user-date-format";
pub const TIME_FORMAT_HEADER: &str = "x-user-time-format";

#[async_trait]
impl FromRequestParts<Arc<AppState>> for UserProfile {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        profile_from_headers(&parts.headers, &state.config.default_profile)
    }
}

pub fn profile_from_headers(
    headers: &HeaderMap,
    defaults: &UserProfile,
) -> Result<UserProfile, ApiError> {
    let timezone = match header_str(headers, TIMEZONE_HEADER) {
        Some(value) => parse_utc_offset(value).ok_or_else(|| {
            ApiError::validation(format!("Invalid timezone [{}], expected a UTC offset", value))
        })?,
        None => defaults.timezone,
    };

    let date_format = header_str(headers, DATE_FORMAT_HEADER).unwrap_or(defaults.date_format.as_str());
    let time_format = header_str(headers, TIME_FORMAT_HEADER).unwrap_or(defaults.time_format.as_str());

    Ok(UserProfile::new(timezone, date_format, time_format))
}
