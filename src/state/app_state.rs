//! 应用状态

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::env::EnvConfig;
use crate::infra::{ServiceClient, ServiceError, ServiceInvoker};

/// 全局 shutdown token，用于优雅关闭
static GLOBAL_SHUTDOWN: std::sync::OnceLock<CancellationToken> = std::sync::OnceLock::new();

/// 获取全局 shutdown token
pub fn get_shutdown_token() -> CancellationToken {
    GLOBAL_SHUTDOWN
        .get_or_init(CancellationToken::new)
        .clone()
}

/// 触发全局 shutdown
pub fn trigger_shutdown() {
    if let Some(token) = GLOBAL_SHUTDOWN.get() {
        token.cancel();
    }
}

/// 应用状态
///
/// 只读，无请求间共享的可变状态
pub struct AppState {
    /// 环境配置
    pub config: EnvConfig,
    /// 远程服务调用
    pub invoker: Arc<dyn ServiceInvoker>,
    /// 服务启动时间
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// 使用 HTTP 远程服务客户端创建应用状态
    pub fn new(config: EnvConfig) -> Result<Self, ServiceError> {
        let client = ServiceClient::new(&config.service)?;

        tracing::info!(
            api_key_len = config.api_key.len(),
            port = config.port,
            invoke_url = %client.invoke_url(),
            timeout_secs = config.service.timeout.as_secs(),
            default_timezone = %config.default_profile.timezone,
            "Loaded configuration"
        );

        Ok(Self::with_invoker(config, Arc::new(client)))
    }

    /// 使用指定的 invoker 创建应用状态
    pub fn with_invoker(config: EnvConfig, invoker: Arc<dyn ServiceInvoker>) -> Self {
        Self {
            config,
            invoker,
            started_at: Utc::now(),
        }
    }

    /// 运行时长（秒）
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
