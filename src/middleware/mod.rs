//! 请求提取器
//!
//! API Key 认证、用户偏好与参数提取

pub mod auth;
pub mod extract;
pub mod profile;

pub use auth::RequireApiKey;
pub use extract::{DeletePath, FormFields, QueryFields};
