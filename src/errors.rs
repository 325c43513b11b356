//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_madrasa_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum MadrasaError {
            $($variant(String),)*
        }

        impl MadrasaError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(MadrasaError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(MadrasaError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(MadrasaError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl MadrasaError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        MadrasaError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_madrasa_errors! {
    Network("E001", "Network Error"),
    Api("E002", "API Error"),
    Serialization("E003", "Serialization Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    InvalidQrPayload("E006", "Invalid QR Payload"),
    PasswordMismatch("E007", "Password Mismatch"),
    SubmissionInProgress("E008", "Submission In Progress"),
    Config("E009", "Configuration Error"),
    FileOperation("E010", "File Operation Error"),
    BackendNotFound("E011", "Data Access Backend Not Found"),
}

impl MadrasaError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为用户输入类错误（只需提示，不影响表单状态）
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MadrasaError::InvalidQrPayload(_)
                | MadrasaError::NotFound(_)
                | MadrasaError::PasswordMismatch(_)
        )
    }
}

impl fmt::Display for MadrasaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for MadrasaError {}

// 为常见的错误类型实现 From trait
impl From<reqwest::Error> for MadrasaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MadrasaError::Serialization(err.to_string())
        } else {
            MadrasaError::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for MadrasaError {
    fn from(err: std::io::Error) -> Self {
        MadrasaError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for MadrasaError {
    fn from(err: serde_json::Error) -> Self {
        MadrasaError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for MadrasaError {
    fn from(err: config::ConfigError) -> Self {
        MadrasaError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MadrasaError>;
