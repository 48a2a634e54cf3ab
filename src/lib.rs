//! Delivery Admin - 投递定义管理后台
//!
//! 列表/创建/编辑/删除投递定义，所有数据通过远程服务层读写

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod middleware;
pub mod services;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;
use crate::infra::ServiceError;
use crate::state::{get_shutdown_token, trigger_shutdown, AppState};

/// 命令行参数
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// 覆盖 PORT 环境变量
    pub port_override: Option<u16>,
}

/// 启动错误
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to create service client: {0}")]
    Client(#[from] ServiceError),

    #[error("Failed to bind listener: {0}")]
    Io(#[from] std::io::Error),
}

/// 初始化日志
///
/// 默认 `delivery_admin=info,tower_http=info`，可用 RUST_LOG 覆盖
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("delivery_admin=info,tower_http=info"));

    // 重复初始化（如测试中）时忽略
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 加载配置并运行 HTTP 服务，直到收到退出信号
pub async fn init_and_run_with_config(runtime: RuntimeConfig) -> Result<(), StartupError> {
    init_tracing();

    let mut config = EnvConfig::from_env();
    if let Some(port) = runtime.port_override {
        config.port = port;
    }
    let port = config.port;

    let state = Arc::new(AppState::new(config)?);
    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, version = crate::config::env::constants::VERSION, "Delivery admin listening");

    tokio::spawn(wait_for_signal());

    let shutdown = get_shutdown_token();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Delivery admin stopped");
    Ok(())
}

/// 等待 Ctrl-C / SIGTERM 并触发 shutdown
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    trigger_shutdown();
}
