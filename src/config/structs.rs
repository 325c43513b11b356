use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ApiConfig,
    pub attendance: AttendanceConfig,
    pub upload: UploadConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// REST 接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub backend: String, // 数据访问后端: http / memory
    pub base_url: String,
    #[serde(skip_serializing, default)] // 不序列化 token
    pub token: String,
    pub timeout_ms: u64,
}

/// 考勤时间戳策略
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// 提交时重新取当前时间
    #[default]
    Submit,
    /// 保留本次会话中扫码/手动签到时记录的时间
    Scan,
}

/// 考勤表单配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceConfig {
    pub timestamp_policy: TimestampPolicy,
}

/// 上传配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_size: usize, // 头像文件最大字节数
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                system_name: "Yakhtimoon".to_string(),
                environment: "development".to_string(),
                log_level: "info".to_string(),
            },
            api: ApiConfig {
                backend: "http".to_string(),
                base_url: "http://127.0.0.1:8000/api".to_string(),
                token: String::new(),
                timeout_ms: 10_000,
            },
            attendance: AttendanceConfig {
                timestamp_policy: TimestampPolicy::Submit,
            },
            upload: UploadConfig {
                max_size: 2 * 1024 * 1024,
            },
        }
    }
}
