use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::serde_helpers::{
    deserialize_i64, deserialize_optional_i64, deserialize_optional_timestamp,
};

// 出勤状态，接口中以 1/0 表示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Absent,  // 缺席
    Present, // 出席
}

impl AttendanceStatus {
    pub const ABSENT: i64 = 0;
    pub const PRESENT: i64 = 1;

    pub fn code(&self) -> i64 {
        match self {
            AttendanceStatus::Absent => Self::ABSENT,
            AttendanceStatus::Present => Self::PRESENT,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            Self::ABSENT => Some(AttendanceStatus::Absent),
            Self::PRESENT => Some(AttendanceStatus::Present),
            _ => None,
        }
    }

    /// 翻译键
    pub fn label_key(&self) -> &'static str {
        match self {
            AttendanceStatus::Absent => "attendance.absent",
            AttendanceStatus::Present => "attendance.present",
        }
    }
}

impl Serialize for AttendanceStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = deserialize_i64(deserializer)?;
        AttendanceStatus::from_code(code).ok_or_else(|| {
            serde::de::Error::custom(format!("无效的出勤状态: '{code}'. 支持的状态: 0, 1"))
        })
    }
}

// 出勤记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct Attendance {
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
    #[serde(default)]
    #[ts(type = "number | null")]
    pub student_attendance: Option<AttendanceStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub student_attendance_time: Option<DateTime<Utc>>,
}
