use serde_json::Value;

use super::loader::ReferenceLists;
use super::options::course_options;
use super::state::{FieldValue, FormRecord, FormState, InputEvent, define_form_fields};
use super::view::{FormView, Widget};
use super::{FormContext, SubmissionPayload};
use crate::client::{DataAccess, Resource};
use crate::errors::Result;
use crate::models::exams::entities::Exam;
use crate::models::references::entities::Course;

define_form_fields! {
    pub enum ExamField {
        Title("title", Text),
        ExamDate("exam_date", Text),
        MaxMark("max_mark", Integer),
        PassingMark("passing_mark", Integer),
        CourseId("course_id", Integer),
    }
}

impl FormRecord for Exam {
    type Field = ExamField;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn get(&self, field: ExamField) -> FieldValue {
        match field {
            ExamField::Title => FieldValue::Text(self.title.clone()),
            ExamField::ExamDate => FieldValue::Text(self.exam_date.clone()),
            ExamField::MaxMark => FieldValue::Integer(Some(self.max_mark)),
            ExamField::PassingMark => FieldValue::Integer(Some(self.passing_mark)),
            ExamField::CourseId => FieldValue::Integer(Some(self.course_id)),
        }
    }

    fn apply(&mut self, field: ExamField, value: FieldValue) -> Result<()> {
        match field {
            ExamField::Title => self.title = value.into_text()?,
            ExamField::ExamDate => self.exam_date = value.into_text()?,
            ExamField::MaxMark => self.max_mark = value.into_integer()?.unwrap_or_default(),
            ExamField::PassingMark => {
                self.passing_mark = value.into_integer()?.unwrap_or_default()
            }
            ExamField::CourseId => self.course_id = value.into_integer()?.unwrap_or_default(),
        }
        Ok(())
    }
}

/// 考试表单
#[derive(Debug)]
pub struct ExamForm {
    ctx: FormContext,
    state: FormState<Exam>,
    courses: Vec<Course>,
}

impl ExamForm {
    pub fn new(ctx: FormContext, initial: Option<&Exam>) -> Self {
        Self {
            ctx,
            state: FormState::new(initial),
            courses: Vec::new(),
        }
    }

    pub async fn mount(ctx: FormContext, initial: Option<&Exam>, client: &dyn DataAccess) -> Self {
        let mut form = Self::new(ctx, initial);
        form.load_references(client).await;
        form
    }

    pub async fn load_references(&mut self, client: &dyn DataAccess) {
        self.courses = ReferenceLists::load(client, &[Resource::Courses])
            .await
            .courses;
    }

    pub fn reseed(&mut self, initial: Option<&Exam>) {
        self.state.reseed(initial);
    }

    pub fn state(&self) -> &FormState<Exam> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState<Exam> {
        &mut self.state
    }

    pub fn record(&self) -> &Exam {
        self.state.record()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn handle_change(&mut self, field: ExamField, value: FieldValue) -> Result<()> {
        self.state.update(field, value)
    }

    pub fn handle_input(&mut self, field: ExamField, event: InputEvent) -> Result<()> {
        self.state.handle_input(field, event)
    }

    pub fn shape_payload(&self) -> Result<SubmissionPayload> {
        Ok(SubmissionPayload::Json(serde_json::to_value(
            self.state.record(),
        )?))
    }

    pub async fn submit(&self, client: &dyn DataAccess) -> Result<Value> {
        let payload = self.shape_payload()?;
        self.state.save_with(client, Resource::Exams, payload).await
    }

    pub fn render(&self) -> FormView {
        let ctx = &self.ctx;
        let state = &self.state;

        FormView {
            title: None,
            subtitle: None,
            fields: vec![
                state.field_view(
                    ctx,
                    ExamField::Title,
                    "exams.examTitle",
                    Widget::Text,
                    true,
                    Vec::new(),
                ),
                state.field_view(
                    ctx,
                    ExamField::ExamDate,
                    "exams.examDate",
                    Widget::Date,
                    true,
                    Vec::new(),
                ),
                state.field_view(
                    ctx,
                    ExamField::MaxMark,
                    "exams.maximumMark",
                    Widget::Number,
                    true,
                    Vec::new(),
                ),
                state.field_view(
                    ctx,
                    ExamField::PassingMark,
                    "exams.passingMark",
                    Widget::Number,
                    true,
                    Vec::new(),
                ),
                state.field_view(
                    ctx,
                    ExamField::CourseId,
                    "exams.course",
                    Widget::Select,
                    true,
                    course_options(&self.courses),
                ),
            ],
            actions: Vec::new(),
            submit_label: ctx.t(if state.is_edit() {
                "exams.updateExam"
            } else {
                "exams.createExam"
            }),
            cancel_label: ctx.cancel_label(),
            busy: state.is_busy(),
        }
    }
}
