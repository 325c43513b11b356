//! 背诵表单
//!
//! 新建时只选择课次；编辑已有记录时才显示进度、评价与备注。
//! 课次、学生列表以及当前课程/学生由调用方提供，表单自身不获取。

use serde_json::{Value, json};

use super::options::{
    dated_lesson_options, evaluation_options, homework_options, page_options, quran_part_options,
};
use super::state::{FieldValue, FormRecord, FormState, InputEvent, define_form_fields};
use super::view::{FormView, Widget};
use super::{FormContext, SubmissionPayload};
use crate::client::{DataAccess, Resource};
use crate::errors::{MadrasaError, Result};
use crate::models::recitations::entities::{Recitation, RecitationEvaluation};
use crate::models::references::entities::{Lesson, Student};

define_form_fields! {
    pub enum RecitationField {
        LessonId("lesson_id", Integer),
        StudentId("student_id", Integer),
        RecitationPerPage("recitation_per_page", Integers),
        RecitationEvaluation("recitation_evaluation", Text),
        CurrentJuz("current_juz", Text),
        CurrentJuzPage("current_juz_page", Integer),
        RecitationNotes("recitation_notes", Text),
        Homework("homework", Integers),
    }
}

impl FormRecord for Recitation {
    type Field = RecitationField;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn get(&self, field: RecitationField) -> FieldValue {
        match field {
            RecitationField::LessonId => FieldValue::Integer(Some(self.lesson_id)),
            RecitationField::StudentId => FieldValue::Integer(Some(self.student_id)),
            RecitationField::RecitationPerPage => {
                FieldValue::Integers(self.recitation_per_page.clone())
            }
            RecitationField::RecitationEvaluation => FieldValue::Text(
                self.recitation_evaluation
                    .map(|e| e.as_str().to_string())
                    .unwrap_or_default(),
            ),
            RecitationField::CurrentJuz => FieldValue::Text(self.current_juz.clone()),
            RecitationField::CurrentJuzPage => FieldValue::Integer(Some(self.current_juz_page)),
            RecitationField::RecitationNotes => FieldValue::Text(self.recitation_notes.clone()),
            RecitationField::Homework => FieldValue::Integers(self.homework.clone()),
        }
    }

    fn apply(&mut self, field: RecitationField, value: FieldValue) -> Result<()> {
        match field {
            RecitationField::LessonId => self.lesson_id = value.into_integer()?.unwrap_or_default(),
            RecitationField::StudentId => {
                self.student_id = value.into_integer()?.unwrap_or_default()
            }
            RecitationField::RecitationPerPage => {
                self.recitation_per_page = value.into_integers()?
            }
            RecitationField::RecitationEvaluation => {
                let text = value.into_text()?;
                self.recitation_evaluation = if text.is_empty() {
                    None
                } else {
                    Some(
                        text.parse::<RecitationEvaluation>()
                            .map_err(MadrasaError::validation)?,
                    )
                };
            }
            RecitationField::CurrentJuz => self.current_juz = value.into_text()?,
            // 页码为空、无法解析或为 0 时回到第 1 页
            RecitationField::CurrentJuzPage => {
                self.current_juz_page = value.into_integer()?.filter(|n| *n != 0).unwrap_or(1)
            }
            RecitationField::RecitationNotes => self.recitation_notes = value.into_text()?,
            RecitationField::Homework => self.homework = value.into_integers()?,
        }
        Ok(())
    }

    fn prepare_for_edit(mut self) -> Self {
        if self.current_juz_page == 0 {
            self.current_juz_page = 1;
        }
        self
    }
}

/// 调用方提供的课程上下文
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecitationContext {
    pub course_id: i64,
    pub course_name: String,
    pub student: Option<Student>,
    pub lessons: Vec<Lesson>,
    pub students: Vec<Student>,
}

/// 课程信息横幅
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseBanner {
    pub name: String,
    pub caption: String,
}

#[derive(Debug)]
pub struct RecitationForm {
    ctx: FormContext,
    state: FormState<Recitation>,
    course: RecitationContext,
}

impl RecitationForm {
    pub fn new(ctx: FormContext, initial: Option<&Recitation>, course: RecitationContext) -> Self {
        Self {
            ctx,
            state: FormState::new(initial),
            course,
        }
    }

    pub fn reseed(&mut self, initial: Option<&Recitation>) {
        self.state.reseed(initial);
    }

    pub fn set_context(&mut self, course: RecitationContext) {
        self.course = course;
    }

    pub fn context(&self) -> &RecitationContext {
        &self.course
    }

    pub fn state(&self) -> &FormState<Recitation> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState<Recitation> {
        &mut self.state
    }

    pub fn record(&self) -> &Recitation {
        self.state.record()
    }

    pub fn is_edit(&self) -> bool {
        self.state.is_edit()
    }

    pub fn handle_change(&mut self, field: RecitationField, value: FieldValue) -> Result<()> {
        self.state.update(field, value)
    }

    pub fn handle_input(&mut self, field: RecitationField, event: InputEvent) -> Result<()> {
        self.state.handle_input(field, event)
    }

    pub fn course_banner(&self) -> CourseBanner {
        CourseBanner {
            name: self.course.course_name.clone(),
            caption: self.ctx.t("recitation.tahfeezCourse"),
        }
    }

    /// 学生信息只在编辑模式且有选中学生时显示
    pub fn student_info(&self) -> Option<&Student> {
        if !self.is_edit() {
            return None;
        }
        self.course.student.as_ref()
    }

    pub fn shape_payload(&self) -> Result<SubmissionPayload> {
        let record = self.state.record();
        if !self.is_edit() {
            return Ok(SubmissionPayload::Json(json!({ "lesson_id": record.lesson_id })));
        }

        let mut body = serde_json::to_value(record)?;
        if let Some(fields) = body.as_object_mut() {
            fields.remove("id");
        }
        Ok(SubmissionPayload::Json(body))
    }

    pub async fn submit(&self, client: &dyn DataAccess) -> Result<Value> {
        let payload = self.shape_payload()?;
        self.state
            .save_with(client, Resource::Recitations, payload)
            .await
    }

    pub fn render(&self) -> FormView {
        let ctx = &self.ctx;
        let state = &self.state;
        let is_edit = state.is_edit();

        let mut fields = vec![state.field_view(
            ctx,
            RecitationField::LessonId,
            "recitation.lesson",
            Widget::Select,
            true,
            dated_lesson_options(&self.course.lessons),
        )];

        if is_edit {
            fields.extend([
                state.field_view(
                    ctx,
                    RecitationField::CurrentJuzPage,
                    "recitation.currentJuzPage",
                    Widget::Number,
                    false,
                    Vec::new(),
                ),
                state.field_view(
                    ctx,
                    RecitationField::CurrentJuz,
                    "recitation.quranMemorizedParts",
                    Widget::Select,
                    false,
                    quran_part_options(ctx),
                ),
                state.field_view(
                    ctx,
                    RecitationField::RecitationPerPage,
                    "recitation.recitationPerPage",
                    Widget::MultiSelect,
                    false,
                    page_options(ctx),
                ),
                state.field_view(
                    ctx,
                    RecitationField::Homework,
                    "recitation.homework",
                    Widget::MultiSelect,
                    false,
                    homework_options(ctx),
                ),
                state.field_view(
                    ctx,
                    RecitationField::RecitationEvaluation,
                    "recitation.evaluation",
                    Widget::Select,
                    false,
                    evaluation_options(ctx),
                ),
                state.field_view(
                    ctx,
                    RecitationField::RecitationNotes,
                    "recitation.recitationNotes",
                    Widget::TextArea,
                    false,
                    Vec::new(),
                ),
            ]);
        }

        FormView {
            title: Some(ctx.t(if is_edit {
                "recitation.editRecitationRecord"
            } else {
                "recitation.addNewRecitation"
            })),
            subtitle: Some(ctx.t(if is_edit {
                "recitation.updateRecitationDetails"
            } else {
                "recitation.fillRecitationDetails"
            })),
            fields,
            actions: Vec::new(),
            submit_label: ctx.t(if is_edit {
                "recitation.updateRecitation"
            } else {
                "recitation.createRecitation"
            }),
            cancel_label: ctx.cancel_label(),
            busy: state.is_busy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::MemoryDataAccess;
    use crate::forms::FormMode;

    fn course() -> RecitationContext {
        RecitationContext {
            course_id: 2,
            course_name: "Tahfeez Al-Quran".to_string(),
            student: None,
            lessons: vec![Lesson {
                id: 3,
                lesson_title: "Al-Mulk".to_string(),
                lesson_date: "2025-02-01".to_string(),
            }],
            students: vec![Student {
                id: 7,
                name: "Amina".to_string(),
                student_img: None,
            }],
        }
    }

    fn existing() -> Recitation {
        Recitation {
            id: Some(11),
            lesson_id: 3,
            student_id: 7,
            recitation_per_page: vec![1, 2],
            recitation_evaluation: Some(RecitationEvaluation::Good),
            current_juz: "29".to_string(),
            current_juz_page: 4,
            recitation_notes: "Smooth".to_string(),
            homework: vec![5],
        }
    }

    #[test]
    fn test_create_mode_shows_and_submits_lesson_only() {
        let mut form = RecitationForm::new(FormContext::untranslated(), None, course());
        form.handle_input(RecitationField::LessonId, InputEvent::Value("3".to_string()))
            .unwrap();
        form.handle_input(
            RecitationField::RecitationNotes,
            InputEvent::Value("ignored".to_string()),
        )
        .unwrap();

        let view = form.render();
        assert_eq!(view.field_names(), vec!["lesson_id"]);
        assert_eq!(
            view.field("lesson_id").unwrap().options[0].label,
            "Al-Mulk - 2025-02-01"
        );
        assert_eq!(view.submit_label, "recitation.createRecitation");

        let payload = form.shape_payload().unwrap();
        assert_eq!(payload.as_json().unwrap(), &json!({"lesson_id": 3}));
        assert!(form.student_info().is_none());
    }

    #[test]
    fn test_edit_mode_shows_progress_fields() {
        let form = RecitationForm::new(FormContext::untranslated(), Some(&existing()), course());
        let view = form.render();

        assert_eq!(
            view.field_names(),
            vec![
                "lesson_id",
                "current_juz_page",
                "current_juz",
                "recitation_per_page",
                "homework",
                "recitation_evaluation",
                "recitation_notes",
            ]
        );
        assert_eq!(view.field("current_juz").unwrap().options.len(), 30);
        assert_eq!(view.field("homework").unwrap().options.len(), 20);
        assert_eq!(
            view.field("recitation_evaluation").unwrap().options[4].value,
            "So Bad"
        );
        // 未选中学生时不显示学生信息，即使学生列表中有该记录的学生
        assert!(form.student_info().is_none());
    }

    #[test]
    fn test_edit_payload_carries_all_fields() {
        let form = RecitationForm::new(FormContext::untranslated(), Some(&existing()), course());
        let payload = form.shape_payload().unwrap();

        assert_eq!(
            payload.as_json().unwrap(),
            &json!({
                "lesson_id": 3,
                "student_id": 7,
                "recitation_per_page": [1, 2],
                "recitation_evaluation": "Good",
                "current_juz": "29",
                "current_juz_page": 4,
                "recitation_notes": "Smooth",
                "homework": [5]
            })
        );
    }

    #[test]
    fn test_reopening_unchanged_record_shapes_same_payload() {
        let record = existing();
        let first = RecitationForm::new(FormContext::untranslated(), Some(&record), course());
        let second = RecitationForm::new(FormContext::untranslated(), Some(&record), course());
        assert_eq!(first.shape_payload().unwrap(), second.shape_payload().unwrap());
    }

    #[test]
    fn test_juz_page_falls_back_to_first_page() {
        let mut seeded = existing();
        seeded.current_juz_page = 0;
        let mut form = RecitationForm::new(FormContext::untranslated(), Some(&seeded), course());
        assert_eq!(form.record().current_juz_page, 1);

        form.handle_input(
            RecitationField::CurrentJuzPage,
            InputEvent::Value("7".to_string()),
        )
        .unwrap();
        assert_eq!(form.record().current_juz_page, 7);

        for input in ["", "abc", "0"] {
            form.handle_input(
                RecitationField::CurrentJuzPage,
                InputEvent::Value(input.to_string()),
            )
            .unwrap();
            assert_eq!(form.record().current_juz_page, 1, "input {input:?}");
        }
    }

    #[test]
    fn test_evaluation_binding() {
        let mut form = RecitationForm::new(FormContext::untranslated(), Some(&existing()), course());
        form.handle_input(
            RecitationField::RecitationEvaluation,
            InputEvent::Value("So Bad".to_string()),
        )
        .unwrap();
        assert_eq!(
            form.record().recitation_evaluation,
            Some(RecitationEvaluation::SoBad)
        );

        assert!(
            form.handle_input(
                RecitationField::RecitationEvaluation,
                InputEvent::Value("Average".to_string()),
            )
            .is_err()
        );
        form.handle_input(RecitationField::RecitationEvaluation, InputEvent::Cleared)
            .unwrap();
        assert_eq!(form.record().recitation_evaluation, None);
    }

    #[test]
    fn test_selected_student_is_shown_in_edit_mode() {
        let mut context = course();
        context.student = Some(Student {
            id: 8,
            name: "Bilal".to_string(),
            student_img: Some("https://cdn.example.com/bilal.png".to_string()),
        });
        let form = RecitationForm::new(FormContext::untranslated(), Some(&existing()), context);
        assert_eq!(form.student_info().map(|s| s.id), Some(8));
        assert_eq!(form.student_info().map(|s| s.name.as_str()), Some("Bilal"));
        assert_eq!(form.course_banner().name, "Tahfeez Al-Quran");
        assert_eq!(form.course_banner().caption, "recitation.tahfeezCourse");
    }

    #[tokio::test]
    async fn test_submit_routes_by_mode() {
        let client = MemoryDataAccess::new();
        let create = RecitationForm::new(FormContext::untranslated(), None, course());
        let edit = RecitationForm::new(FormContext::untranslated(), Some(&existing()), course());

        create.submit(&client).await.unwrap();
        edit.submit(&client).await.unwrap();

        let saves = client.saves();
        assert_eq!(saves[0].resource, Resource::Recitations);
        assert_eq!(saves[0].mode, FormMode::Create);
        assert_eq!(saves[1].mode, FormMode::Edit(11));
    }
}
