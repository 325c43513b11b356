//! 考勤表单
//!
//! 学生身份有两个入口：摄像头扫码与手动输入学生编号。两者最终都走同一个
//! “签到”步骤（标记出席并记录时间），因此提交逻辑不关心身份来自哪个入口。
//!
//! 扫码状态：`Idle → Scanning → Resolved`，扫码中再次切换回到 `Idle`。

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::loader::ReferenceLists;
use super::options::{attendance_status_options, lesson_options, student_options};
use super::state::{FieldValue, FormRecord, FormState, InputEvent, define_form_fields};
use super::view::{ActionView, FormView, Widget};
use super::{FormContext, SubmissionPayload};
use crate::client::{DataAccess, Resource};
use crate::config::TimestampPolicy;
use crate::errors::{MadrasaError, Result};
use crate::models::attendance::entities::{Attendance, AttendanceStatus};
use crate::models::common::serde_helpers::deserialize_optional_i64;
use crate::models::references::entities::{Lesson, Student};
use crate::utils::parse_int;

define_form_fields! {
    pub enum AttendanceField {
        LessonId("lesson_id", Integer),
        StudentId("student_id", Integer),
        StudentAttendance("student_attendance", Integer),
    }
}

impl FormRecord for Attendance {
    type Field = AttendanceField;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn get(&self, field: AttendanceField) -> FieldValue {
        match field {
            AttendanceField::LessonId => FieldValue::Integer(Some(self.lesson_id)),
            AttendanceField::StudentId => FieldValue::Integer(Some(self.student_id)),
            AttendanceField::StudentAttendance => {
                FieldValue::Integer(self.student_attendance.map(|s| s.code()))
            }
        }
    }

    fn apply(&mut self, field: AttendanceField, value: FieldValue) -> Result<()> {
        match field {
            AttendanceField::LessonId => self.lesson_id = value.into_integer()?.unwrap_or_default(),
            AttendanceField::StudentId => {
                self.student_id = value.into_integer()?.unwrap_or_default()
            }
            AttendanceField::StudentAttendance => {
                self.student_attendance = match value.into_integer()? {
                    None => None,
                    Some(code) => Some(AttendanceStatus::from_code(code).ok_or_else(|| {
                        MadrasaError::validation(format!("Invalid attendance status: {code}"))
                    })?),
                };
            }
        }
        Ok(())
    }
}

/// 扫码状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
    Resolved,
}

/// 一次解码结果的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// 未在扫码或本次没有解出内容
    Ignored,
    /// 内容不是有效的签到二维码
    Invalid,
    Resolved { student_id: i64, lesson_id: i64 },
}

/// 手动输入学生编号的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualOutcome {
    NotFound,
    Resolved { student_id: i64 },
}

#[derive(Debug, Deserialize)]
struct QrPayload {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    lesson_id: Option<i64>,
}

/// 解析签到二维码内容：`{"student_id": .., "lesson_id": ..}`，两个 ID 都必须为正数
pub fn parse_qr_payload(data: &str) -> Result<(i64, i64)> {
    let payload: QrPayload = serde_json::from_str(data)
        .map_err(|e| MadrasaError::invalid_qr_payload(format!("Unparsable QR payload: {e}")))?;

    match (payload.student_id, payload.lesson_id) {
        (Some(student_id), Some(lesson_id)) if student_id > 0 && lesson_id > 0 => {
            Ok((student_id, lesson_id))
        }
        _ => Err(MadrasaError::invalid_qr_payload(
            "QR payload must contain student_id and lesson_id",
        )),
    }
}

#[derive(Debug)]
pub struct AttendanceForm {
    ctx: FormContext,
    state: FormState<Attendance>,
    references: ReferenceLists,
    scan: ScanState,
    manual_input: String,
    policy: TimestampPolicy,
    // 本次会话中签到的时间
    stamped_at: Option<DateTime<Utc>>,
}

impl AttendanceForm {
    pub fn new(ctx: FormContext, initial: Option<&Attendance>) -> Self {
        Self {
            ctx,
            state: FormState::new(initial),
            references: ReferenceLists::default(),
            scan: ScanState::Idle,
            manual_input: String::new(),
            policy: TimestampPolicy::default(),
            stamped_at: None,
        }
    }

    /// 创建表单并并发加载课次与学生列表
    pub async fn mount(
        ctx: FormContext,
        initial: Option<&Attendance>,
        client: &dyn DataAccess,
    ) -> Self {
        let mut form = Self::new(ctx, initial);
        form.load_references(client).await;
        form
    }

    pub fn with_timestamp_policy(mut self, policy: TimestampPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn load_references(&mut self, client: &dyn DataAccess) {
        self.references =
            ReferenceLists::load(client, &[Resource::Lessons, Resource::Students]).await;
    }

    pub fn set_references(&mut self, lessons: Vec<Lesson>, students: Vec<Student>) {
        self.references.lessons = lessons;
        self.references.students = students;
    }

    pub fn reseed(&mut self, initial: Option<&Attendance>) {
        self.state.reseed(initial);
        self.scan = ScanState::Idle;
        self.manual_input.clear();
        self.stamped_at = None;
    }

    pub fn state(&self) -> &FormState<Attendance> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState<Attendance> {
        &mut self.state
    }

    pub fn record(&self) -> &Attendance {
        self.state.record()
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.references.lessons
    }

    pub fn students(&self) -> &[Student] {
        &self.references.students
    }

    pub fn scan_state(&self) -> ScanState {
        self.scan
    }

    pub fn manual_input(&self) -> &str {
        &self.manual_input
    }

    pub fn handle_change(&mut self, field: AttendanceField, value: FieldValue) -> Result<()> {
        self.state.update(field, value)
    }

    pub fn handle_input(&mut self, field: AttendanceField, event: InputEvent) -> Result<()> {
        self.state.handle_input(field, event)
    }

    /// 打开或关闭扫码
    pub fn toggle_scanner(&mut self) -> ScanState {
        self.scan = match self.scan {
            ScanState::Scanning => ScanState::Idle,
            ScanState::Idle | ScanState::Resolved => ScanState::Scanning,
        };
        debug!("Scanner state: {:?}", self.scan);
        self.scan
    }

    /// 处理一次解码结果
    pub fn on_scan(&mut self, data: Option<&str>) -> ScanOutcome {
        self.on_scan_at(data, Utc::now())
    }

    pub fn on_scan_at(&mut self, data: Option<&str>, now: DateTime<Utc>) -> ScanOutcome {
        if self.scan != ScanState::Scanning {
            debug!("Ignoring decode result while scanner is {:?}", self.scan);
            return ScanOutcome::Ignored;
        }
        let Some(data) = data.filter(|d| !d.is_empty()) else {
            return ScanOutcome::Ignored;
        };

        match parse_qr_payload(data) {
            Ok((student_id, lesson_id)) => {
                self.stamp(student_id, Some(lesson_id), now);
                self.scan = ScanState::Resolved;
                ScanOutcome::Resolved {
                    student_id,
                    lesson_id,
                }
            }
            Err(e) => {
                warn!("{}", e);
                self.ctx.notify("attendance.invalidQrFormat");
                ScanOutcome::Invalid
            }
        }
    }

    /// 解码器报错只记录日志
    pub fn on_scan_error(&self, err: &str) {
        error!("QR decoder error: {}", err);
    }

    pub fn set_manual_input(&mut self, input: impl Into<String>) {
        self.manual_input = input.into();
    }

    /// 按手动输入的编号在学生列表中查找并签到，不改变扫码状态
    pub fn resolve_manual(&mut self) -> ManualOutcome {
        self.resolve_manual_at(Utc::now())
    }

    pub fn resolve_manual_at(&mut self, now: DateTime<Utc>) -> ManualOutcome {
        let student_id = parse_int(&self.manual_input)
            .and_then(|id| self.references.student(id))
            .map(|student| student.id);

        match student_id {
            Some(student_id) => {
                self.stamp(student_id, None, now);
                ManualOutcome::Resolved { student_id }
            }
            None => {
                debug!("No student matches manual input '{}'", self.manual_input);
                self.ctx.notify("attendance.studentNotFound");
                ManualOutcome::NotFound
            }
        }
    }

    fn stamp(&mut self, student_id: i64, lesson_id: Option<i64>, now: DateTime<Utc>) {
        self.state.modify(|record| {
            record.student_id = student_id;
            if let Some(lesson_id) = lesson_id {
                record.lesson_id = lesson_id;
            }
            record.student_attendance = Some(AttendanceStatus::Present);
            record.student_attendance_time = Some(now);
        });
        self.stamped_at = Some(now);
    }

    /// 整理提交载荷：出席时间由状态推导，不沿用表单中的旧值
    pub fn shape_payload_at(&self, now: DateTime<Utc>) -> Result<SubmissionPayload> {
        let mut record = self.state.record().clone();
        record.student_attendance_time = match record.student_attendance {
            Some(AttendanceStatus::Present) => Some(match self.policy {
                TimestampPolicy::Submit => now,
                TimestampPolicy::Scan => self.stamped_at.unwrap_or(now),
            }),
            _ => None,
        };
        Ok(SubmissionPayload::Json(serde_json::to_value(record)?))
    }

    pub async fn submit(&self, client: &dyn DataAccess) -> Result<Value> {
        let payload = self.shape_payload_at(Utc::now())?;
        self.state
            .save_with(client, Resource::Attendance, payload)
            .await
    }

    pub fn render(&self) -> FormView {
        let ctx = &self.ctx;
        let state = &self.state;

        let fields = vec![
            state.field_view(
                ctx,
                AttendanceField::LessonId,
                "attendance.lesson",
                Widget::Select,
                true,
                lesson_options(&self.references.lessons),
            ),
            state.field_view(
                ctx,
                AttendanceField::StudentId,
                "attendance.student",
                Widget::Select,
                true,
                student_options(&self.references.students),
            ),
            state.field_view(
                ctx,
                AttendanceField::StudentAttendance,
                "attendance.attendanceStatus",
                Widget::Select,
                false,
                attendance_status_options(ctx),
            ),
        ];

        let scanner_label = if self.scan == ScanState::Scanning {
            "attendance.hideScanner"
        } else {
            "attendance.scanQrCode"
        };

        FormView {
            title: Some(ctx.t("attendance.attendanceForm")),
            subtitle: Some(ctx.t("attendance.fillAttendanceDetails")),
            fields,
            actions: vec![
                ActionView {
                    id: "use_qr_number",
                    label: ctx.t("attendance.useQrNumber"),
                },
                ActionView {
                    id: "toggle_scanner",
                    label: ctx.t(scanner_label),
                },
            ],
            submit_label: ctx.t(if state.is_edit() {
                "attendance.updateAttendance"
            } else {
                "attendance.createAttendance"
            }),
            cancel_label: ctx.cancel_label(),
            busy: state.is_busy(),
        }
    }
}
