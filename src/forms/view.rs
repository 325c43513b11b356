use super::state::FieldValue;
use crate::models::ChoiceOption;

/// 输入控件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    Text,
    Email,
    Password { revealed: bool },
    Date,
    Number,
    Select,
    MultiSelect,
    TextArea,
    File,
}

/// 单个字段的渲染数据
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: &'static str,
    pub label: String,
    pub widget: Widget,
    pub required: bool,
    pub value: FieldValue,
    pub options: Vec<ChoiceOption>,
    pub error: Option<String>,
}

/// 表单上的附加按钮
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    pub id: &'static str,
    pub label: String,
}

/// 整个表单的渲染数据，所有文字均已本地化
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub fields: Vec<FieldView>,
    pub actions: Vec<ActionView>,
    pub submit_label: String,
    pub cancel_label: String,
    pub busy: bool,
}

impl FormView {
    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}
