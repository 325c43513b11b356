use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::serde_helpers::{deserialize_i64, deserialize_string};

// 课次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reference.ts")]
pub struct Lesson {
    #[serde(deserialize_with = "deserialize_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub lesson_title: String,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub lesson_date: String,
}

// 学生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reference.ts")]
pub struct Student {
    #[serde(deserialize_with = "deserialize_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub name: String,
    #[serde(default)]
    pub student_img: Option<String>,
}

// 课程
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reference.ts")]
pub struct Course {
    #[serde(deserialize_with = "deserialize_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_student_with_string_id() {
        let student: Student =
            serde_json::from_value(json!({"id": "7", "name": "Amina", "extra": true})).unwrap();
        assert_eq!(student.id, 7);
        assert_eq!(student.name, "Amina");
        assert!(student.student_img.is_none());
    }

    #[test]
    fn test_lesson_without_date() {
        let lesson: Lesson =
            serde_json::from_value(json!({"id": 3, "lesson_title": "Al-Baqarah"})).unwrap();
        assert_eq!(lesson.lesson_date, "");
    }
}
