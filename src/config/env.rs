//! 环境变量配置加载

use std::env;
use std::time::Duration;
use tracing::warn;

use crate::domain::profile::{
    parse_utc_offset, UserProfile, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT,
};

use self::constants::{DEFAULT_PORT, DEFAULT_SERVICE_TIMEOUT_SECS, DEFAULT_SERVICE_URL};

/// 环境配置
#[derive(Clone, Debug)]
pub struct EnvConfig {
    /// API 密钥
    pub api_key: String,
    /// 服务监听端口
    pub port: u16,
    /// 远程服务配置
    pub service: ServiceConfig,
    /// 未提供用户偏好时使用的默认值
    pub default_profile: UserProfile,
}

/// 远程服务（service invoker）配置
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// 服务端基础 URL
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// 单次调用超时
    pub timeout: Duration,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        // API Key - 支持旧名称兼容
        let api_key = load_with_fallback("DELIVERY_ADMIN_API_KEY", "API_KEY")
            .unwrap_or_else(|| {
                warn!("DELIVERY_ADMIN_API_KEY not set, using the built-in default key");
                "change-me-in-production".to_string()
            });
        if env::var("API_KEY").is_ok() {
            warn!("Deprecated environment variable API_KEY detected. Please use DELIVERY_ADMIN_API_KEY");
        }

        // Port
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let service = ServiceConfig::from_env();
        let default_profile = default_profile_from_env();

        Self {
            api_key,
            port,
            service,
            default_profile,
        }
    }
}

impl ServiceConfig {
    /// 从环境变量加载远程服务配置
    pub fn from_env() -> Self {
        let url = load_with_fallback("ZATO_SERVICE_URL", "SERVICE_URL")
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());

        let username = env::var("ZATO_SERVICE_USER").ok().filter(|s| !s.is_empty());
        let password = env::var("ZATO_SERVICE_PASSWORD").ok().filter(|s| !s.is_empty());

        let timeout_secs = env::var("ZATO_SERVICE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SERVICE_TIMEOUT_SECS);

        Self {
            url: url.trim_end_matches('/').to_string(),
            username,
            password,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVICE_URL.to_string(),
            username: None,
            password: None,
            timeout: Duration::from_secs(DEFAULT_SERVICE_TIMEOUT_SECS),
        }
    }
}

/// 默认用户偏好
fn default_profile_from_env() -> UserProfile {
    let timezone = match env::var("DEFAULT_TIMEZONE") {
        Ok(v) => parse_utc_offset(&v).unwrap_or_else(|| {
            warn!(timezone = %v, "Invalid DEFAULT_TIMEZONE, falling back to UTC");
            UserProfile::default().timezone
        }),
        Err(_) => UserProfile::default().timezone,
    };

    let date_format =
        env::var("DEFAULT_DATE_FORMAT").unwrap_or_else(|_| DEFAULT_DATE_FORMAT.to_string());
    let time_format =
        env::var("DEFAULT_TIME_FORMAT").unwrap_or_else(|_| DEFAULT_TIME_FORMAT.to_string());

    UserProfile::new(timezone, date_format, time_format)
}

/// 加载环境变量，支持 fallback
fn load_with_fallback(primary: &str, fallback: &str) -> Option<String> {
    env::var(primary).ok().or_else(|| env::var(fallback).ok())
}

/// 常量
pub mod constants {
    /// 默认监听端口
    pub const DEFAULT_PORT: u16 = 8183;

    /// 默认远程服务地址
    pub const DEFAULT_SERVICE_URL: &str = "http://localhost:17010";

    /// 远程调用超时（秒）
    pub const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = 30;

    /// 版本号
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
