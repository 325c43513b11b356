use config::{Config, ConfigError, Environment, File, Map};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(None)
    }

    /// 加载配置，`env` 为 `None` 时读取进程环境变量
    ///
    /// 嵌套键用双下划线分隔，例如 `MADRASA_API__TIMEOUT_MS` 对应 `api.timeout_ms`。
    pub fn load_with_env(env: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        let mut builder = Config::builder()
            // 内置默认值
            .set_default("app.system_name", defaults.app.system_name)?
            .set_default("app.environment", defaults.app.environment)?
            .set_default("app.log_level", defaults.app.log_level)?
            .set_default("api.backend", defaults.api.backend)?
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.token", defaults.api.token)?
            .set_default("api.timeout_ms", defaults.api.timeout_ms)?
            .set_default("attendance.timestamp_policy", "submit")?
            .set_default("upload.max_size", defaults.upload.max_size as u64)?
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("MADRASA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("api.backend", std::env::var("API_BACKEND").ok())?
            .set_override_option("api.base_url", std::env::var("API_BASE_URL").ok())?
            .set_override_option("api.token", std::env::var("API_TOKEN").ok())?;

        builder.build()?.try_deserialize()
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimestampPolicy;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.is_development());
        assert!(!config.is_production());
        assert_eq!(config.api.backend, "http");
    }

    #[test]
    fn test_env_overrides_multi_word_keys() {
        let env: Map<String, String> = [
            ("MADRASA_APP__SYSTEM_NAME", "Dar al-Huda"),
            ("MADRASA_API__TIMEOUT_MS", "1234"),
            ("MADRASA_UPLOAD__MAX_SIZE", "99"),
            ("MADRASA_ATTENDANCE__TIMESTAMP_POLICY", "scan"),
            ("OTHER_API__TIMEOUT_MS", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = AppConfig::load_with_env(Some(env)).unwrap();
        assert_eq!(config.app.system_name, "Dar al-Huda");
        assert_eq!(config.api.timeout_ms, 1234);
        assert_eq!(config.upload.max_size, 99);
        assert_eq!(config.attendance.timestamp_policy, TimestampPolicy::Scan);
    }

    #[test]
    fn test_empty_env_keeps_defaults() {
        let config = AppConfig::load_with_env(Some(Map::new())).unwrap();
        assert_eq!(config.api.timeout_ms, 10_000);
        assert_eq!(config.upload.max_size, 2 * 1024 * 1024);
    }
}
