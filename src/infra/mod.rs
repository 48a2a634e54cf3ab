//! 基础设施模块
//!
//! 封装外部依赖（远程服务调用）

pub mod service_client;

#[cfg(test)]
pub mod fake;

pub use service_client::{ServiceClient, ServiceError, ServiceInvoker};
