//! 服务层模块
//!
//! 校验表单、调用远程服务、映射返回字段

pub mod definition;
