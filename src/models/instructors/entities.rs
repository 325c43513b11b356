use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::serde_helpers::{
    deserialize_i64_list, deserialize_optional_i64, deserialize_string, deserialize_string_list,
};

// 可选的宗教资格
pub const RELIGIOUS_QUALIFICATIONS: &[&str] = &[
    "Ijazah in Hafs",
    "Ijazah in Warsh",
    "Ijazah in the Ten Qira'at",
    "Tajweed Certificate",
    "Sharia Degree",
    "Quranic Studies Degree",
    "Arabic Language Degree",
];

// 讲师
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/instructor.ts")]
pub struct Instructor {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_i64"
    )]
    #[ts(optional)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub password: String,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub password_confirmation: String,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub certificate: String,
    // 已存储头像的地址，只读；新头像通过文件上传提交
    #[serde(default, deserialize_with = "deserialize_string")]
    pub instructor_img: String,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub birth_date: String,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_i64_list")]
    pub quran_memorized_parts: Vec<i64>,
    #[serde(default, deserialize_with = "deserialize_i64_list")]
    pub quran_passed_parts: Vec<i64>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub religious_qualifications: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_lists_default_to_empty() {
        let instructor: Instructor = serde_json::from_value(json!({
            "id": 5,
            "name": "Yusuf",
            "quran_memorized_parts": null,
            "religious_qualifications": ["Sharia Degree"]
        }))
        .unwrap();
        assert_eq!(instructor.id, Some(5));
        assert!(instructor.quran_memorized_parts.is_empty());
        assert!(instructor.quran_passed_parts.is_empty());
        assert_eq!(instructor.religious_qualifications, vec!["Sharia Degree"]);
    }
}
