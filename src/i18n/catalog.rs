use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::Translate;
use crate::errors::{MadrasaError, Result};

/// 扁平化的语言包
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locale: String,
    entries: HashMap<String, String>,
}

impl Catalog {
    /// 从嵌套 JSON 对象构建，键展开为 `a.b.c`
    pub fn from_json(locale: impl Into<String>, value: &Value) -> Result<Self> {
        let Value::Object(_) = value else {
            return Err(MadrasaError::serialization(
                "Translation catalog must be a JSON object",
            ));
        };

        let mut entries = HashMap::new();
        flatten_into(&mut entries, String::new(), value);

        Ok(Self {
            locale: locale.into(),
            entries,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten_into(entries: &mut HashMap<String, String>, prefix: String, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(entries, path, child);
            }
        }
        Value::String(s) => {
            entries.insert(prefix, s.clone());
        }
        Value::Null => {}
        other => {
            entries.insert(prefix, other.to_string());
        }
    }
}

impl Translate for Catalog {
    fn t(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(text) => text.clone(),
            None => {
                debug!("Missing translation for '{}' in locale {}", key, self.locale);
                key.to_string()
            }
        }
    }
}
