//! 提交载荷
//!
//! 普通实体以 JSON 对象提交；带文件的实体（讲师）以 multipart 提交。
//! 数组字段在 multipart 中展开为多个同名 `<field>[]` 部分，而不是一个编码后的字符串。

use std::path::Path;

use serde_json::Value;

use crate::errors::Result;
use crate::utils::detect_content_type;

/// 选择的本地文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChosenFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ChosenFile {
    /// 按内容嗅探 Content-Type
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = detect_content_type(&file_name, &bytes).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::from_bytes(file_name, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartBody {
    Text(String),
    File(ChosenFile),
}

/// multipart 中的一个部分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub body: PartBody,
}

/// 保持追加顺序的 multipart 载荷
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    parts: Vec<Part>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push(Part {
            name: name.into(),
            body: PartBody::Text(value.into()),
        });
    }

    /// 每个元素追加一个 `<name>[]` 部分
    pub fn append_list<I, T>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let key = format!("{name}[]");
        for value in values {
            self.append_text(key.clone(), value.to_string());
        }
    }

    pub fn append_file(&mut self, name: impl Into<String>, file: ChosenFile) {
        self.parts.push(Part {
            name: name.into(),
            body: PartBody::File(file),
        });
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<Part> {
        self.parts
    }

    /// 指定名称的全部文本值（按追加顺序）
    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter(|p| p.name == name)
            .filter_map(|p| match &p.body {
                PartBody::Text(s) => Some(s.as_str()),
                PartBody::File(_) => None,
            })
            .collect()
    }

    pub fn file(&self, name: &str) -> Option<&ChosenFile> {
        self.parts.iter().find_map(|p| match &p.body {
            PartBody::File(f) if p.name == name => Some(f),
            _ => None,
        })
    }
}

/// 提交到创建/更新接口的载荷
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionPayload {
    Json(Value),
    Multipart(MultipartPayload),
}

impl SubmissionPayload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            SubmissionPayload::Json(v) => Some(v),
            SubmissionPayload::Multipart(_) => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&MultipartPayload> {
        match self {
            SubmissionPayload::Json(_) => None,
            SubmissionPayload::Multipart(m) => Some(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_expands_to_repeated_parts() {
        let mut payload = MultipartPayload::new();
        payload.append_text("name", "Yusuf");
        payload.append_list("quran_memorized_parts", [1, 3]);
        payload.append_list("quran_passed_parts", Vec::<i64>::new());

        assert_eq!(payload.parts().len(), 3);
        assert_eq!(payload.texts("quran_memorized_parts[]"), vec!["1", "3"]);
        assert!(payload.texts("quran_memorized_parts").is_empty());
        assert!(payload.texts("quran_passed_parts[]").is_empty());
    }

    #[test]
    fn test_file_part_lookup() {
        let mut payload = MultipartPayload::new();
        payload.append_file(
            "instructor_img",
            ChosenFile {
                file_name: "me.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![0x89, 0x50],
            },
        );
        assert_eq!(payload.file("instructor_img").unwrap().file_name, "me.png");
        assert!(payload.file("other").is_none());
        assert!(payload.texts("instructor_img").is_empty());
    }

    #[test]
    fn test_chosen_file_sniffs_content_type() {
        let file = ChosenFile::from_bytes("avatar.bin", vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(file.content_type, "image/jpeg");
        assert_eq!(file.size(), 4);

        let missing = ChosenFile::from_path("/nonexistent/avatar.png");
        assert_eq!(missing.unwrap_err().code(), "E010");
    }
}
