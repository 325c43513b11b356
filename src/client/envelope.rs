use serde_json::Value;

use super::Resource;
use crate::errors::{MadrasaError, Result};

/// 把列表响应规整为条目数组
///
/// 支持的形状：
/// - `[...]`
/// - `{ "data": [...] }`
/// - `{ "data": { "data": [...] } }`（分页器）
/// - `{ "<resource>": [...] }`
pub fn normalize_list(resource: Resource, body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            if let Some(data) = map.remove("data") {
                match data {
                    Value::Array(items) => return Ok(items),
                    Value::Object(mut inner) => {
                        if let Some(Value::Array(items)) = inner.remove("data") {
                            return Ok(items);
                        }
                    }
                    _ => {}
                }
            }
            match map.remove(resource.path()) {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(MadrasaError::serialization(format!(
                    "Unexpected list envelope for {resource}"
                ))),
            }
        }
        _ => Err(MadrasaError::serialization(format!(
            "Unexpected list envelope for {resource}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_envelope() {
        let items = normalize_list(Resource::Lessons, json!({"data": [{"id": 1}]})).unwrap();
        assert_eq!(items, vec![json!({"id": 1})]);
    }

    #[test]
    fn test_resource_named_envelope() {
        let items = normalize_list(
            Resource::Courses,
            json!({"courses": [{"id": 1}, {"id": 2}], "total": 2}),
        )
        .unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_paginated_and_bare_shapes() {
        let paginated =
            normalize_list(Resource::Students, json!({"data": {"data": [{"id": 5}]}})).unwrap();
        assert_eq!(paginated.len(), 1);
        let bare = normalize_list(Resource::Students, json!([{"id": 5}])).unwrap();
        assert_eq!(bare.len(), 1);
    }

    #[test]
    fn test_unknown_shape_is_error() {
        let err = normalize_list(Resource::Courses, json!({"lessons": []})).unwrap_err();
        assert_eq!(err.code(), "E003");
        assert!(normalize_list(Resource::Courses, json!("nope")).is_err());
    }
}
