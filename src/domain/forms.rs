//! 表单描述
//!
//! 列表页需要的三个表单：目标过滤表单、创建表单、编辑表单（前缀 `edit`）

use serde::Serialize;
use std::collections::HashMap;

use super::delivery::{DefinitionInput, TargetType};

/// 字段类型
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Choice,
    Hidden,
}

/// 下拉选项
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

/// 表单字段
#[derive(Clone, Debug, Serialize)]
pub struct FormField {
    /// 提交时使用的完整字段名（含前缀）
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// 表单描述
#[derive(Clone, Debug, Serialize)]
pub struct FormDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<&'static str>,
    pub fields: Vec<FormField>,
}

impl FormDescriptor {
    /// 编辑表单前缀
    pub const EDIT_PREFIX: &'static str = "edit";

    /// 目标类型过滤表单，使用查询参数预填
    pub fn delivery_target(query: &HashMap<String, String>) -> Self {
        let fields = vec![
            FormField {
                value: query.get("cluster_id").cloned(),
                ..field("cluster_id", FieldKind::Hidden, None)
            },
            FormField {
                value: query.get("target_type").cloned(),
                ..field("target_type", FieldKind::Choice, None)
            },
        ];
        Self { prefix: None, fields }
    }

    /// 空白创建表单
    pub fn create() -> Self {
        Self::definition(None)
    }

    /// 空白编辑表单
    pub fn edit() -> Self {
        let mut form = Self::definition(Some(Self::EDIT_PREFIX));
        form.fields.insert(0, field("id", FieldKind::Hidden, Some(Self::EDIT_PREFIX)));
        form
    }

    fn definition(prefix: Option<&'static str>) -> Self {
        let fields = DefinitionInput::REQUIRED
            .iter()
            .map(|name| {
                let kind = match *name {
                    "name" | "target" => FieldKind::Text,
                    "target_type" => FieldKind::Choice,
                    _ => FieldKind::Integer,
                };
                field(name, kind, prefix)
            })
            .collect();
        Self { prefix, fields }
    }

    /// 查找字段（按不含前缀的名字）
    #[cfg(test)]
    fn field(&self, name: &str) -> Option<&FormField> {
        let full = prefixed(name, self.prefix);
        self.fields.iter().find(|f| f.name == full)
    }
}

fn field(name: &str, kind: FieldKind, prefix: Option<&str>) -> FormField {
    let choices = if kind == FieldKind::Choice {
        TargetType::ALL
            .iter()
            .map(|t| Choice {
                value: t.as_str(),
                label: t.human(),
            })
            .collect()
    } else {
        Vec::new()
    };

    FormField {
        name: prefixed(name, prefix),
        kind,
        required: true,
        choices,
        value: None,
    }
}

fn prefixed(name: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(p) => format!("{}-{}", p, name),
        None => name.to_string(),
    }
}
