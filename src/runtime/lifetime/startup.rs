use crate::client::DataAccess;
use crate::client::register::{debug_data_access_registry, get_data_access_plugin};
use crate::config::AppConfig;
use crate::errors::{MadrasaError, Result};
use std::sync::Arc;
use tracing::{debug, warn};

const FALLBACK_BACKEND: &str = "memory";

pub struct StartupContext {
    pub data_access: Arc<dyn DataAccess>,
    /// 实际使用的后端名称
    pub backend: String,
}

async fn build_backend(name: &str, config: &AppConfig) -> Result<Arc<dyn DataAccess>> {
    let constructor = get_data_access_plugin(name).ok_or_else(|| {
        MadrasaError::backend_not_found(format!("Data access backend '{name}' not found"))
    })?;
    constructor(config.clone()).await
}

/// 创建数据访问实例
async fn create_data_access(config: &AppConfig) -> Result<(String, Arc<dyn DataAccess>)> {
    let backend = &config.api.backend;

    warn!("Attempting to create {} data access backend", backend);

    match build_backend(backend, config).await {
        Ok(client) => {
            warn!("Successfully created {} data access backend", backend);
            return Ok((backend.clone(), client));
        }
        Err(e) => {
            warn!("Failed to create {} data access backend: {}", backend, e);
        }
    }

    // 配置的后端不可用时回退到内存后端
    if backend != FALLBACK_BACKEND {
        warn!("Falling back to {} data access backend", FALLBACK_BACKEND);
        match build_backend(FALLBACK_BACKEND, config).await {
            Ok(client) => return Ok((FALLBACK_BACKEND.to_string(), client)),
            Err(e) => {
                warn!("Failed to create fallback {} backend: {}", FALLBACK_BACKEND, e);
            }
        }
    }

    Err(MadrasaError::backend_not_found(format!(
        "No data access backend available (tried: {backend})"
    )))
}

/// 准备运行所需的上下文
pub async fn prepare_startup(config: &AppConfig) -> Result<StartupContext> {
    if cfg!(debug_assertions) {
        debug_data_access_registry();
        debug!("Debug mode: data access registry is enabled");
    }

    let (backend, data_access) = create_data_access(config).await?;
    debug!("Data access backend {} initialized", backend);

    Ok(StartupContext {
        data_access,
        backend,
    })
}
