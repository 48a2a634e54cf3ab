//! 投递定义（delivery definition）领域模型

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// 表单/查询参数校验错误
///
/// 一律在远程调用之前产生
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field [{0}]")]
    MissingField(String),

    #[error("Field [{field}] must be an integer, got [{value}]")]
    InvalidInteger { field: String, value: String },

    #[error("Unknown target type [{0}]")]
    UnknownTargetType(String),
}

/// 投递目标类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    #[serde(rename = "outconn-amqp")]
    OutconnAmqp,
    #[serde(rename = "outconn-wmq")]
    OutconnWmq,
    #[serde(rename = "outconn-zmq")]
    OutconnZmq,
    #[serde(rename = "service")]
    Service,
}

impl TargetType {
    pub const ALL: [TargetType; 4] = [
        TargetType::OutconnAmqp,
        TargetType::OutconnWmq,
        TargetType::OutconnZmq,
        TargetType::Service,
    ];

    /// 线上传输使用的值
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::OutconnAmqp => "outconn-amqp",
            TargetType::OutconnWmq => "outconn-wmq",
            TargetType::OutconnZmq => "outconn-zmq",
            TargetType::Service => "service",
        }
    }

    /// 页面展示用名称
    pub fn human(&self) -> &'static str {
        match self {
            TargetType::OutconnAmqp => "AMQP outgoing connection",
            TargetType::OutconnWmq => "JMS WebSphere MQ outgoing connection",
            TargetType::OutconnZmq => "ZeroMQ outgoing connection",
            TargetType::Service => "Service",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| ValidationError::UnknownTargetType(value.to_string()))
    }
}

/// `check_after-retry_repeats-retry_seconds`
pub fn short_def(check_after: i64, retry_repeats: i64, retry_seconds: i64) -> String {
    format!("{}-{}-{}", check_after, retry_repeats, retry_seconds)
}

/// 列表接口返回的投递定义
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeliveryDefinition {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub target: String,
    pub target_type: TargetType,
    pub expire_after: i64,
    pub expire_arch_succ_after: i64,
    pub expire_arch_fail_after: i64,
    pub check_after: i64,
    pub retry_repeats: i64,
    pub retry_seconds: i64,
    #[serde(default)]
    pub short_def: String,
    /// UTC，仅用于展示，不回传给服务端
    #[serde(default)]
    pub last_updated_utc: Option<NaiveDateTime>,
    /// `last_updated_utc` 转换到用户时区后的展示值
    #[serde(default)]
    pub last_updated: Option<String>,

    // 服务端统计，只读
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub in_progress_count: u64,
    #[serde(default)]
    pub in_doubt_count: u64,
    #[serde(default)]
    pub arch_success_count: u64,
    #[serde(default)]
    pub arch_failed_count: u64,
}

/// 创建/编辑表单提交的字段
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DefinitionInput {
    pub cluster_id: i64,
    pub name: String,
    pub target: String,
    pub target_type: TargetType,
    pub expire_after: i64,
    pub expire_arch_succ_after: i64,
    pub expire_arch_fail_after: i64,
    pub check_after: i64,
    pub retry_repeats: i64,
    pub retry_seconds: i64,
}

impl DefinitionInput {
    /// 必填字段（不含 cluster_id），顺序与表单一致
    pub const REQUIRED: [&'static str; 9] = [
        "name",
        "target",
        "target_type",
        "expire_after",
        "expire_arch_succ_after",
        "expire_arch_fail_after",
        "check_after",
        "retry_repeats",
        "retry_seconds",
    ];

    /// 从表单数据解析
    ///
    /// `prefix` 为表单字段前缀（编辑表单为 `edit-`），`cluster_id` 不带前缀
    pub fn from_form(data: &HashMap<String, String>, prefix: &str) -> Result<Self, ValidationError> {
        let form = FormData::new(data, prefix);

        // 先检查所有必填字段是否存在，再做类型转换
        for field in Self::REQUIRED {
            form.required(field)?;
        }

        Ok(Self {
            cluster_id: form.unprefixed_int("cluster_id")?,
            name: form.required("name")?.to_string(),
            target: form.required("target")?.to_string(),
            target_type: TargetType::parse(form.required("target_type")?)?,
            expire_after: form.required_int("expire_after")?,
            expire_arch_succ_after: form.required_int("expire_arch_succ_after")?,
            expire_arch_fail_after: form.required_int("expire_arch_fail_after")?,
            check_after: form.required_int("check_after")?,
            retry_repeats: form.required_int("retry_repeats")?,
            retry_seconds: form.required_int("retry_seconds")?,
        })
    }

    pub fn short_def(&self) -> String {
        short_def(self.check_after, self.retry_repeats, self.retry_seconds)
    }
}

/// 带前缀的表单数据视图
pub struct FormData<'a> {
    data: &'a HashMap<String, String>,
    prefix: &'a str,
}

impl<'a> FormData<'a> {
    pub fn new(data: &'a HashMap<String, String>, prefix: &'a str) -> Self {
        Self { data, prefix }
    }

    /// 读取带前缀的字段，空白值视为缺失
    pub fn get(&self, field: &str) -> Option<&'a str> {
        lookup(self.data, &format!("{}{}", self.prefix, field))
    }

    pub fn required(&self, field: &str) -> Result<&'a str, ValidationError> {
        self.get(field)
            .ok_or_else(|| ValidationError::MissingField(field.to_string()))
    }

    pub fn required_int(&self, field: &str) -> Result<i64, ValidationError> {
        parse_int(field, self.required(field)?)
    }

    /// 读取不带前缀的整数字段（如 cluster_id）
    pub fn unprefixed_int(&self, field: &str) -> Result<i64, ValidationError> {
        let value = lookup(self.data, field)
            .ok_or_else(|| ValidationError::MissingField(field.to_string()))?;
        parse_int(field, value)
    }
}

fn lookup<'a>(data: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    data.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

pub fn parse_int(field: &str, value: &str) -> Result<i64, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidInteger {
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// 服务端 id 可能是数字也可能是字符串，统一转为字符串
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Str(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(v) => v.to_string(),
        RawId::Str(v) => v,
    })
}
