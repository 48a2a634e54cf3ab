//! 领域模型模块
//!
//! 纯数据结构，不依赖 axum/tokio

pub mod delivery;
pub mod forms;
pub mod profile;

// Re-exports for convenience
pub use delivery::{short_def, DefinitionInput, DeliveryDefinition, TargetType, ValidationError};
pub use forms::FormDescriptor;
pub use profile::UserProfile;
