use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::serde_helpers::{
    deserialize_i64, deserialize_i64_list, deserialize_optional_i64, deserialize_string,
};

/// 古兰经分卷（朱兹）数量
pub const QURAN_JUZ_COUNT: i64 = 30;

// 背诵评价
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecitationEvaluation {
    Excellent,
    Good,
    Fair,
    Poor,
    SoBad,
}

impl RecitationEvaluation {
    pub const ALL: [RecitationEvaluation; 5] = [
        RecitationEvaluation::Excellent,
        RecitationEvaluation::Good,
        RecitationEvaluation::Fair,
        RecitationEvaluation::Poor,
        RecitationEvaluation::SoBad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecitationEvaluation::Excellent => "Excellent",
            RecitationEvaluation::Good => "Good",
            RecitationEvaluation::Fair => "Fair",
            RecitationEvaluation::Poor => "Poor",
            RecitationEvaluation::SoBad => "So Bad",
        }
    }

    /// 翻译键
    pub fn label_key(&self) -> &'static str {
        match self {
            RecitationEvaluation::Excellent => "recitation.excellent",
            RecitationEvaluation::Good => "recitation.good",
            RecitationEvaluation::Fair => "recitation.fair",
            RecitationEvaluation::Poor => "recitation.poor",
            RecitationEvaluation::SoBad => "recitation.soBad",
        }
    }
}

impl std::fmt::Display for RecitationEvaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RecitationEvaluation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecitationEvaluation::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("Invalid recitation evaluation: {s}"))
    }
}

// 未评价时接口使用空字符串
fn serialize_evaluation<S>(
    value: &Option<RecitationEvaluation>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(value.map(|e| e.as_str()).unwrap_or_default())
}

fn deserialize_evaluation<'de, D>(deserializer: D) -> Result<Option<RecitationEvaluation>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = deserialize_string(deserializer)?;
    if s.is_empty() {
        return Ok(None);
    }
    s.parse().map(Some).map_err(|_| {
        serde::de::Error::custom(format!(
            "无效的背诵评价: '{s}'. 支持的评价: Excellent, Good, Fair, Poor, So Bad"
        ))
    })
}

fn default_juz_page() -> i64 {
    1
}

// 背诵记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/recitation.ts")]
pub struct Recitation {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_i64"
    )]
    #[ts(optional)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub lesson_id: i64,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub student_id: i64,
    #[serde(default, deserialize_with = "deserialize_i64_list")]
    pub recitation_per_page: Vec<i64>,
    #[serde(
        default,
        serialize_with = "serialize_evaluation",
        deserialize_with = "deserialize_evaluation"
    )]
    #[ts(type = "string")]
    pub recitation_evaluation: Option<RecitationEvaluation>,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub current_juz: String,
    #[serde(default = "default_juz_page", deserialize_with = "deserialize_i64")]
    pub current_juz_page: i64,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub recitation_notes: String,
    #[serde(default, deserialize_with = "deserialize_i64_list")]
    pub homework: Vec<i64>,
}

impl Default for Recitation {
    fn default() -> Self {
        Self {
            id: None,
            lesson_id: 0,
            student_id: 0,
            recitation_per_page: Vec::new(),
            recitation_evaluation: None,
            current_juz: String::new(),
            current_juz_page: default_juz_page(),
            recitation_notes: String::new(),
            homework: Vec::new(),
        }
    }
}
