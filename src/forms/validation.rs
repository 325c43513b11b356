use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 接口返回的校验错误：字段名 → 按顺序排列的错误信息
///
/// 只用于显示，表单自身不会修改。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从接口错误响应中提取，兼容 `{ "errors": {...} }` 与直接的错误对象
    pub fn from_response(body: &serde_json::Value) -> Self {
        let errors = body.get("errors").unwrap_or(body);
        serde_json::from_value(errors.clone()).unwrap_or_default()
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Vec<String>>> for ValidationErrors {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}
