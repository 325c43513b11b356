//! 可绑定的表单状态
//!
//! 所有输入事件都经过同一条路径：输入事件 → 按字段类型转换为 [`FieldValue`] →
//! 只替换该字段。字段集合由记录的字段枚举决定，未知字段会被拒绝。

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use super::submit::BusyFlag;
use super::validation::ValidationErrors;
use super::view::{FieldView, Widget};
use super::{FormContext, SubmissionPayload};
use crate::client::{DataAccess, Resource};
use crate::errors::{MadrasaError, Result};
use crate::models::ChoiceOption;
use crate::utils::parse_int;

/// 表单模式，在填充表单时确定一次
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }
}

impl Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormMode::Create => write!(f, "create"),
            FormMode::Edit(id) => write!(f, "edit #{id}"),
        }
    }
}

/// 字段的值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Integers,
    Texts,
}

/// 类型化的字段值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Integer(Option<i64>),
    Text(String),
    Integers(Vec<i64>),
    Texts(Vec<String>),
}

/// 来自界面的原始输入事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// 文本框、数字框、日期框或单选下拉框的当前值
    Value(String),
    /// 多选框的已选值
    Values(Vec<String>),
    /// 清空
    Cleared,
}

impl FieldValue {
    /// 按字段类型转换输入事件
    pub fn from_input(kind: FieldKind, event: InputEvent) -> Result<Self> {
        match (kind, event) {
            (FieldKind::Integer, InputEvent::Value(s)) => Ok(FieldValue::Integer(parse_int(&s))),
            (FieldKind::Integer, InputEvent::Cleared) => Ok(FieldValue::Integer(None)),
            (FieldKind::Text, InputEvent::Value(s)) => Ok(FieldValue::Text(s)),
            (FieldKind::Text, InputEvent::Cleared) => Ok(FieldValue::Text(String::new())),
            (FieldKind::Integers, InputEvent::Values(values)) => Ok(FieldValue::Integers(
                values.iter().filter_map(|v| parse_int(v)).collect(),
            )),
            (FieldKind::Integers, InputEvent::Cleared) => Ok(FieldValue::Integers(Vec::new())),
            (FieldKind::Texts, InputEvent::Values(values)) => Ok(FieldValue::Texts(values)),
            (FieldKind::Texts, InputEvent::Cleared) => Ok(FieldValue::Texts(Vec::new())),
            (kind, event) => Err(MadrasaError::validation(format!(
                "Input {event:?} does not fit a {kind:?} field"
            ))),
        }
    }

    pub fn into_integer(self) -> Result<Option<i64>> {
        match self {
            FieldValue::Integer(n) => Ok(n),
            FieldValue::Text(s) => Ok(parse_int(&s)),
            other => Err(MadrasaError::validation(format!(
                "Expected a single number, got {other:?}"
            ))),
        }
    }

    pub fn into_text(self) -> Result<String> {
        match self {
            FieldValue::Text(s) => Ok(s),
            FieldValue::Integer(n) => Ok(n.map(|n| n.to_string()).unwrap_or_default()),
            other => Err(MadrasaError::validation(format!(
                "Expected text, got {other:?}"
            ))),
        }
    }

    pub fn into_integers(self) -> Result<Vec<i64>> {
        match self {
            FieldValue::Integers(values) => Ok(values),
            FieldValue::Texts(values) => Ok(values.iter().filter_map(|v| parse_int(v)).collect()),
            other => Err(MadrasaError::validation(format!(
                "Expected a list of numbers, got {other:?}"
            ))),
        }
    }

    pub fn into_texts(self) -> Result<Vec<String>> {
        match self {
            FieldValue::Texts(values) => Ok(values),
            FieldValue::Integers(values) => Ok(values.iter().map(|v| v.to_string()).collect()),
            other => Err(MadrasaError::validation(format!(
                "Expected a list of text values, got {other:?}"
            ))),
        }
    }
}

/// 记录的字段枚举
pub trait FormField: Copy + Eq + Debug + Display + FromStr<Err = MadrasaError> + 'static {
    fn all() -> &'static [Self];
    fn name(&self) -> &'static str;
    fn kind(&self) -> FieldKind;
}

/// 定义字段枚举：变体、接口字段名、值类型
macro_rules! define_form_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident($field:literal, $kind:ident)),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant,)*
        }

        impl $crate::forms::state::FormField for $name {
            fn all() -> &'static [Self] {
                &[$($name::$variant,)*]
            }

            fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $field,)*
                }
            }

            fn kind(&self) -> $crate::forms::state::FieldKind {
                match self {
                    $($name::$variant => $crate::forms::state::FieldKind::$kind,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", $crate::forms::state::FormField::name(self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::MadrasaError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($field => Ok($name::$variant),)*
                    _ => Err($crate::errors::MadrasaError::validation(format!(
                        "Unknown field '{}' for {}",
                        s,
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

pub(crate) use define_form_fields;

/// 表单记录的结构描述
pub trait FormRecord: Clone + Default + PartialEq + Serialize + Send + Sync + 'static {
    type Field: FormField;

    fn id(&self) -> Option<i64>;

    fn get(&self, field: Self::Field) -> FieldValue;

    /// 只替换一个字段；转换失败时记录保持不变
    fn apply(&mut self, field: Self::Field, value: FieldValue) -> Result<()>;

    /// 以已有记录填充编辑表单前的整理
    fn prepare_for_edit(self) -> Self {
        self
    }
}

/// 表单状态：模式、工作副本、外部校验错误与提交中标记
#[derive(Debug, Clone)]
pub struct FormState<R: FormRecord> {
    mode: FormMode,
    record: R,
    errors: ValidationErrors,
    busy: BusyFlag,
}

impl<R: FormRecord> Default for FormState<R> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<R: FormRecord> FormState<R> {
    /// 有初始记录时深拷贝，否则使用零值
    pub fn new(initial: Option<&R>) -> Self {
        let (mode, record) = match initial {
            Some(record) => {
                let mode = match record.id() {
                    Some(id) => FormMode::Edit(id),
                    None => FormMode::Create,
                };
                (mode, record.clone().prepare_for_edit())
            }
            None => (FormMode::Create, R::default()),
        };

        Self {
            mode,
            record,
            errors: ValidationErrors::default(),
            busy: BusyFlag::default(),
        }
    }

    /// 初始记录变化时重新填充
    pub fn reseed(&mut self, initial: Option<&R>) {
        let busy = self.busy.clone();
        *self = Self::new(initial);
        self.busy = busy;
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_edit(&self) -> bool {
        self.mode.is_edit()
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn value(&self, field: R::Field) -> FieldValue {
        self.record.get(field)
    }

    pub fn update(&mut self, field: R::Field, value: FieldValue) -> Result<()> {
        self.record.apply(field, value)
    }

    /// 按接口字段名更新
    pub fn update_named(&mut self, name: &str, value: FieldValue) -> Result<()> {
        let field: R::Field = name.parse()?;
        self.update(field, value)
    }

    pub fn handle_input(&mut self, field: R::Field, event: InputEvent) -> Result<()> {
        let value = FieldValue::from_input(field.kind(), event)?;
        self.update(field, value)
    }

    /// 联动更新多个字段（例如扫码签到）
    pub(crate) fn modify(&mut self, change: impl FnOnce(&mut R)) {
        change(&mut self.record);
    }

    pub fn set_validation_errors(&mut self, errors: ValidationErrors) {
        self.errors = errors;
    }

    pub fn validation_errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn first_error(&self, field: R::Field) -> Option<&str> {
        self.errors.first(field.name())
    }

    pub fn busy(&self) -> &BusyFlag {
        &self.busy
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// 构造字段视图
    pub fn field_view(
        &self,
        ctx: &FormContext,
        field: R::Field,
        label_key: &str,
        widget: Widget,
        required: bool,
        options: Vec<ChoiceOption>,
    ) -> FieldView {
        FieldView {
            name: field.name(),
            label: ctx.t(label_key),
            widget,
            required,
            value: self.value(field),
            options,
            error: self.first_error(field).map(str::to_string),
        }
    }

    /// 提交载荷；提交期间占用提交中标记，结束后无论成功失败都会释放
    pub async fn save_with(
        &self,
        client: &dyn DataAccess,
        resource: Resource,
        payload: SubmissionPayload,
    ) -> Result<Value> {
        let _guard = self.busy.try_acquire()?;

        match client.save(resource, self.mode, payload).await {
            Ok(response) => {
                info!("Saved {} ({})", resource, self.mode);
                Ok(response)
            }
            Err(e) => {
                error!("Failed to save {} ({}): {}", resource, self.mode, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    define_form_fields! {
        enum SampleField {
            Title("title", Text),
            Mark("mark", Integer),
            Parts("parts", Integers),
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize)]
    struct Sample {
        id: Option<i64>,
        title: String,
        mark: i64,
        parts: Vec<i64>,
    }

    impl FormRecord for Sample {
        type Field = SampleField;

        fn id(&self) -> Option<i64> {
            self.id
        }

        fn get(&self, field: SampleField) -> FieldValue {
            match field {
                SampleField::Title => FieldValue::Text(self.title.clone()),
                SampleField::Mark => FieldValue::Integer(Some(self.mark)),
                SampleField::Parts => FieldValue::Integers(self.parts.clone()),
            }
        }

        fn apply(&mut self, field: SampleField, value: FieldValue) -> Result<()> {
            match field {
                SampleField::Title => self.title = value.into_text()?,
                SampleField::Mark => self.mark = value.into_integer()?.unwrap_or_default(),
                SampleField::Parts => self.parts = value.into_integers()?,
            }
            Ok(())
        }
    }

    #[test]
    fn test_mode_from_initial_record() {
        assert_eq!(FormState::<Sample>::new(None).mode(), FormMode::Create);
        let existing = Sample {
            id: Some(9),
            ..Sample::default()
        };
        assert_eq!(FormState::new(Some(&existing)).mode(), FormMode::Edit(9));
        let unsaved = Sample::default();
        assert_eq!(FormState::new(Some(&unsaved)).mode(), FormMode::Create);
    }

    #[test]
    fn test_update_replaces_only_one_field() {
        let mut state = FormState::new(Some(&Sample {
            id: Some(1),
            title: "Old".to_string(),
            mark: 5,
            parts: vec![2],
        }));
        state
            .handle_input(SampleField::Title, InputEvent::Value("New".to_string()))
            .unwrap();

        assert_eq!(state.record().title, "New");
        assert_eq!(state.record().mark, 5);
        assert_eq!(state.record().parts, vec![2]);
    }

    #[test]
    fn test_numeric_inputs_are_parsed() {
        let mut state = FormState::<Sample>::new(None);
        state
            .handle_input(SampleField::Mark, InputEvent::Value("80pts".to_string()))
            .unwrap();
        state
            .handle_input(
                SampleField::Parts,
                InputEvent::Values(vec!["1".to_string(), "x".to_string(), "3".to_string()]),
            )
            .unwrap();
        assert_eq!(state.record().mark, 80);
        assert_eq!(state.record().parts, vec![1, 3]);
    }

    #[test]
    fn test_unknown_and_mismatched_fields_rejected() {
        let mut state = FormState::<Sample>::new(None);
        let before = state.record().clone();

        assert!(
            state
                .update_named("nickname", FieldValue::Text("x".to_string()))
                .is_err()
        );
        assert!(
            state
                .handle_input(SampleField::Parts, InputEvent::Value("1".to_string()))
                .is_err()
        );
        assert!(
            state
                .update(SampleField::Title, FieldValue::Integers(vec![1]))
                .is_err()
        );
        assert_eq!(state.record(), &before);
    }

    #[test]
    fn test_field_names_parse_back() {
        assert_eq!("mark".parse::<SampleField>().unwrap(), SampleField::Mark);
        assert_eq!(SampleField::Parts.to_string(), "parts");
        let err = "nickname".parse::<SampleField>().unwrap_err();
        assert_eq!(err.code(), MadrasaError::validation("").code());
    }

    #[test]
    fn test_named_update_and_reseed() {
        let mut state = FormState::<Sample>::new(None);
        state
            .update_named("title", FieldValue::Text("Tajweed".to_string()))
            .unwrap();
        assert_eq!(state.record().title, "Tajweed");

        state.reseed(Some(&Sample {
            id: Some(3),
            ..Sample::default()
        }));
        assert_eq!(state.mode(), FormMode::Edit(3));
        assert!(state.record().title.is_empty());
    }
}
