//! 宽松的反序列化函数
//!
//! 后端不同接口返回的 ID 有时是数字、有时是字符串，列表字段可能为 null，
//! 时间戳可能是 RFC 3339 也可能是 `YYYY-MM-DD HH:MM:SS`。

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde::de::{Error, Unexpected, Visitor};
use std::fmt;

struct I64Visitor;

impl<'de> Visitor<'de> for I64Visitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or a string containing an integer")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(value)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        if value <= i64::MAX as u64 {
            Ok(value as i64)
        } else {
            Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
        }
    }

    // JSON 中的 7.0 与 7 等价，带小数部分的拒绝
    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            Ok(value as i64)
        } else {
            Err(Error::invalid_value(Unexpected::Float(value), &self))
        }
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        value
            .trim()
            .parse()
            .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
    }
}

/// 整数或数字字符串
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LenientI64(pub i64);

impl<'de> Deserialize<'de> for LenientI64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(I64Visitor).map(LenientI64)
    }
}

// 支持字符串到i64的转换，null 视为 0
pub fn deserialize_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<LenientI64>::deserialize(deserializer)?
        .map(|v| v.0)
        .unwrap_or_default())
}

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<LenientI64>::deserialize(deserializer)?.map(|v| v.0))
}

// null 列表视为空列表
pub fn deserialize_i64_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<LenientI64>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.0)
        .collect())
}

pub fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// null 字符串视为空串
pub fn deserialize_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(
        match Option::<Scalar>::deserialize(deserializer)? {
            Some(Scalar::Text(s)) => s,
            Some(Scalar::Integer(n)) => n.to_string(),
            Some(Scalar::Float(f)) => f.to_string(),
            None => String::new(),
        },
    )
}

/// 解析时间戳：RFC 3339 或 `YYYY-MM-DD HH:MM:SS`（按 UTC）
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| D::Error::invalid_value(Unexpected::Str(&s), &"a timestamp")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "deserialize_i64")]
        id: i64,
        #[serde(default, deserialize_with = "deserialize_i64_list")]
        parts: Vec<i64>,
        #[serde(default, deserialize_with = "deserialize_string")]
        juz: String,
        #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_lenient_ids_and_lists() {
        let sample: Sample =
            serde_json::from_value(json!({"id": "12", "parts": [1, "3"], "juz": 30})).unwrap();
        assert_eq!(sample.id, 12);
        assert_eq!(sample.parts, vec![1, 3]);
        assert_eq!(sample.juz, "30");
        assert!(sample.at.is_none());
    }

    #[test]
    fn test_null_values_default() {
        let sample: Sample =
            serde_json::from_value(json!({"id": null, "parts": null, "juz": null, "at": null}))
                .unwrap();
        assert_eq!(sample.id, 0);
        assert!(sample.parts.is_empty());
        assert!(sample.juz.is_empty());
    }

    #[test]
    fn test_whole_floats_accepted() {
        let sample: Sample = serde_json::from_value(json!({"id": 7.0, "parts": [2.0]})).unwrap();
        assert_eq!(sample.id, 7);
        assert_eq!(sample.parts, vec![2]);
        assert!(serde_json::from_value::<Sample>(json!({"id": 7.5})).is_err());
    }

    #[test]
    fn test_timestamp_formats() {
        let rfc = parse_timestamp("2025-03-01T08:30:00Z").unwrap();
        let plain = parse_timestamp("2025-03-01 08:30:00").unwrap();
        assert_eq!(rfc, plain);
        assert!(parse_timestamp("yesterday").is_none());
    }
}
