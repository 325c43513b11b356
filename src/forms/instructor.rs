//! 讲师表单
//!
//! 讲师带头像文件，以 multipart 提交。数组字段逐个元素展开为 `<field>[]` 部分；
//! 只有重新选择了头像时才附带 `instructor_img` 文件部分，已存储的头像地址不会回传。

use serde_json::Value;
use tracing::{debug, warn};

use super::options::{quran_part_options, religious_qualification_options};
use super::state::{FieldValue, FormRecord, FormState, InputEvent, define_form_fields};
use super::view::{ActionView, FieldView, FormView, Widget};
use super::{ChosenFile, FormContext, MultipartPayload, SubmissionPayload};
use crate::client::{DataAccess, Resource};
use crate::config::AppConfig;
use crate::errors::{MadrasaError, Result};
use crate::models::instructors::entities::Instructor;
use crate::utils::passwords_match;

define_form_fields! {
    pub enum InstructorField {
        Name("name", Text),
        Email("email", Text),
        Password("password", Text),
        PasswordConfirmation("password_confirmation", Text),
        Certificate("certificate", Text),
        BirthDate("birth_date", Text),
        PhoneNumber("phone_number", Text),
        Address("address", Text),
        QuranMemorizedParts("quran_memorized_parts", Integers),
        QuranPassedParts("quran_passed_parts", Integers),
        ReligiousQualifications("religious_qualifications", Texts),
    }
}

impl FormRecord for Instructor {
    type Field = InstructorField;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn get(&self, field: InstructorField) -> FieldValue {
        match field {
            InstructorField::Name => FieldValue::Text(self.name.clone()),
            InstructorField::Email => FieldValue::Text(self.email.clone()),
            InstructorField::Password => FieldValue::Text(self.password.clone()),
            InstructorField::PasswordConfirmation => {
                FieldValue::Text(self.password_confirmation.clone())
            }
            InstructorField::Certificate => FieldValue::Text(self.certificate.clone()),
            InstructorField::BirthDate => FieldValue::Text(self.birth_date.clone()),
            InstructorField::PhoneNumber => FieldValue::Text(self.phone_number.clone()),
            InstructorField::Address => FieldValue::Text(self.address.clone()),
            InstructorField::QuranMemorizedParts => {
                FieldValue::Integers(self.quran_memorized_parts.clone())
            }
            InstructorField::QuranPassedParts => {
                FieldValue::Integers(self.quran_passed_parts.clone())
            }
            InstructorField::ReligiousQualifications => {
                FieldValue::Texts(self.religious_qualifications.clone())
            }
        }
    }

    fn apply(&mut self, field: InstructorField, value: FieldValue) -> Result<()> {
        match field {
            InstructorField::Name => self.name = value.into_text()?,
            InstructorField::Email => self.email = value.into_text()?,
            InstructorField::Password => self.password = value.into_text()?,
            InstructorField::PasswordConfirmation => {
                self.password_confirmation = value.into_text()?
            }
            InstructorField::Certificate => self.certificate = value.into_text()?,
            InstructorField::BirthDate => self.birth_date = value.into_text()?,
            InstructorField::PhoneNumber => self.phone_number = value.into_text()?,
            InstructorField::Address => self.address = value.into_text()?,
            InstructorField::QuranMemorizedParts => {
                self.quran_memorized_parts = value.into_integers()?
            }
            InstructorField::QuranPassedParts => self.quran_passed_parts = value.into_integers()?,
            InstructorField::ReligiousQualifications => {
                self.religious_qualifications = value.into_texts()?
            }
        }
        Ok(())
    }

    // 确认密码不从已有记录带入
    fn prepare_for_edit(mut self) -> Self {
        self.password_confirmation.clear();
        self
    }
}

#[derive(Debug)]
pub struct InstructorForm {
    ctx: FormContext,
    state: FormState<Instructor>,
    image: Option<ChosenFile>,
    show_password: bool,
    show_confirm_password: bool,
    max_image_size: usize,
}

impl InstructorForm {
    pub fn new(ctx: FormContext, initial: Option<&Instructor>) -> Self {
        Self {
            ctx,
            state: FormState::new(initial),
            image: None,
            show_password: false,
            show_confirm_password: false,
            max_image_size: AppConfig::default().upload.max_size,
        }
    }

    pub fn with_upload_limit(mut self, max_size: usize) -> Self {
        self.max_image_size = max_size;
        self
    }

    pub fn reseed(&mut self, initial: Option<&Instructor>) {
        self.state.reseed(initial);
        self.image = None;
    }

    pub fn state(&self) -> &FormState<Instructor> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState<Instructor> {
        &mut self.state
    }

    pub fn record(&self) -> &Instructor {
        self.state.record()
    }

    pub fn handle_change(&mut self, field: InstructorField, value: FieldValue) -> Result<()> {
        self.state.update(field, value)
    }

    pub fn handle_input(&mut self, field: InstructorField, event: InputEvent) -> Result<()> {
        self.state.handle_input(field, event)
    }

    pub fn toggle_password_visibility(&mut self) -> bool {
        self.show_password = !self.show_password;
        self.show_password
    }

    pub fn toggle_confirm_password_visibility(&mut self) -> bool {
        self.show_confirm_password = !self.show_confirm_password;
        self.show_confirm_password
    }

    /// 选择新的头像文件
    pub fn select_image(&mut self, file: ChosenFile) -> Result<()> {
        if file.size() > self.max_image_size {
            warn!(
                "Rejected profile image {} ({} bytes, limit {})",
                file.file_name,
                file.size(),
                self.max_image_size
            );
            return Err(MadrasaError::validation(format!(
                "Image {} exceeds the {} byte limit",
                file.file_name, self.max_image_size
            )));
        }
        debug!("Selected profile image {} ({})", file.file_name, file.content_type);
        self.image = Some(file);
        Ok(())
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn image(&self) -> Option<&ChosenFile> {
        self.image.as_ref()
    }

    pub fn shape_payload(&self) -> SubmissionPayload {
        let record = self.state.record();
        let mut payload = MultipartPayload::new();

        payload.append_text("name", record.name.as_str());
        payload.append_text("email", record.email.as_str());
        payload.append_text("password", record.password.as_str());
        payload.append_text("password_confirmation", record.password_confirmation.as_str());
        payload.append_text("certificate", record.certificate.as_str());
        payload.append_text("birth_date", record.birth_date.as_str());
        payload.append_text("phone_number", record.phone_number.as_str());
        payload.append_text("address", record.address.as_str());

        payload.append_list("religious_qualifications", &record.religious_qualifications);
        payload.append_list("quran_memorized_parts", &record.quran_memorized_parts);
        payload.append_list("quran_passed_parts", &record.quran_passed_parts);

        if let Some(image) = &self.image {
            payload.append_file("instructor_img", image.clone());
        }

        SubmissionPayload::Multipart(payload)
    }

    /// 密码不一致时只提示，不发起请求
    pub async fn submit(&self, client: &dyn DataAccess) -> Result<Value> {
        let record = self.state.record();
        if !passwords_match(&record.password, &record.password_confirmation) {
            self.ctx.notify("instructors.passwordsDoNotMatch");
            return Err(MadrasaError::password_mismatch(
                "Password and confirmation differ",
            ));
        }

        self.state
            .save_with(client, Resource::Instructors, self.shape_payload())
            .await
    }

    fn visibility_label(&self, revealed: bool) -> String {
        self.ctx.t(if revealed {
            "instructors.hide"
        } else {
            "instructors.show"
        })
    }

    fn image_field(&self) -> FieldView {
        let value = match &self.image {
            Some(file) => file.file_name.clone(),
            None => self.state.record().instructor_img.clone(),
        };
        FieldView {
            name: "instructor_img",
            label: self.ctx.t("instructors.profileImage"),
            widget: Widget::File,
            required: false,
            value: FieldValue::Text(value),
            options: Vec::new(),
            error: self
                .state
                .validation_errors()
                .first("instructor_img")
                .map(str::to_string),
        }
    }

    pub fn render(&self) -> FormView {
        let ctx = &self.ctx;
        let state = &self.state;
        let is_edit = state.is_edit();
        let quran_parts = quran_part_options(ctx);

        let mut fields = vec![
            state.field_view(
                ctx,
                InstructorField::Name,
                "instructors.fullName",
                Widget::Text,
                true,
                Vec::new(),
            ),
            state.field_view(
                ctx,
                InstructorField::Email,
                "instructors.email",
                Widget::Email,
                true,
                Vec::new(),
            ),
            // 编辑时密码可留空
            state.field_view(
                ctx,
                InstructorField::Password,
                "instructors.password",
                Widget::Password {
                    revealed: self.show_password,
                },
                !is_edit,
                Vec::new(),
            ),
            state.field_view(
                ctx,
                InstructorField::PasswordConfirmation,
                "instructors.confirmPassword",
                Widget::Password {
                    revealed: self.show_confirm_password,
                },
                !is_edit,
                Vec::new(),
            ),
            state.field_view(
                ctx,
                InstructorField::PhoneNumber,
                "instructors.phoneNumber",
                Widget::Text,
                true,
                Vec::new(),
            ),
            state.field_view(
                ctx,
                InstructorField::BirthDate,
                "instructors.birthDate",
                Widget::Date,
                true,
                Vec::new(),
            ),
            state.field_view(
                ctx,
                InstructorField::Certificate,
                "instructors.certificate",
                Widget::Text,
                false,
                Vec::new(),
            ),
            state.field_view(
                ctx,
                InstructorField::Address,
                "instructors.address",
                Widget::TextArea,
                true,
                Vec::new(),
            ),
        ];
        fields.push(self.image_field());
        fields.extend([
            state.field_view(
                ctx,
                InstructorField::ReligiousQualifications,
                "instructors.religiousQualifications",
                Widget::MultiSelect,
                false,
                religious_qualification_options(),
            ),
            state.field_view(
                ctx,
                InstructorField::QuranMemorizedParts,
                "instructors.quranMemorizedParts",
                Widget::MultiSelect,
                false,
                quran_parts.clone(),
            ),
            state.field_view(
                ctx,
                InstructorField::QuranPassedParts,
                "instructors.quranPassedParts",
                Widget::MultiSelect,
                false,
                quran_parts,
            ),
        ]);

        FormView {
            title: Some(ctx.t(if is_edit {
                "instructors.editInstructor"
            } else {
                "instructors.addNewInstructor"
            })),
            subtitle: Some(ctx.t(if is_edit {
                "instructors.updateInstructorDetails"
            } else {
                "instructors.fillInstructorDetails"
            })),
            fields,
            actions: vec![
                ActionView {
                    id: "toggle_password",
                    label: self.visibility_label(self.show_password),
                },
                ActionView {
                    id: "toggle_password_confirmation",
                    label: self.visibility_label(self.show_confirm_password),
                },
            ],
            submit_label: ctx.t(if is_edit {
                "instructors.updateInstructor"
            } else {
                "instructors.createInstructor"
            }),
            cancel_label: ctx.cancel_label(),
            busy: state.is_busy(),
        }
    }
}
