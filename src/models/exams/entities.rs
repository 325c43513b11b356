use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::serde_helpers::{
    deserialize_i64, deserialize_optional_i64, deserialize_string,
};

// 考试
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct Exam {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_i64"
    )]
    #[ts(optional)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub exam_date: String, // YYYY-MM-DD
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub max_mark: i64,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub passing_mark: i64,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub course_id: i64,
}
