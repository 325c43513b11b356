use crate::client::DataAccess;
use crate::client::http::HttpDataAccess;
use crate::client::memory::MemoryDataAccess;
use crate::config::AppConfig;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedDataAccessFuture = Pin<Box<dyn Future<Output = Result<Arc<dyn DataAccess>>> + Send>>;
pub type DataAccessConstructor = Arc<dyn Fn(AppConfig) -> BoxedDataAccessFuture + Send + Sync>;

fn http_plugin(config: AppConfig) -> BoxedDataAccessFuture {
    Box::pin(async move {
        let client: Arc<dyn DataAccess> = Arc::new(HttpDataAccess::from_config(&config)?);
        Ok(client)
    })
}

fn memory_plugin(_config: AppConfig) -> BoxedDataAccessFuture {
    Box::pin(async move {
        let client: Arc<dyn DataAccess> = Arc::new(MemoryDataAccess::new());
        Ok(client)
    })
}

// 内置后端随注册表一起初始化
static DATA_ACCESS_REGISTRY: Lazy<RwLock<HashMap<String, DataAccessConstructor>>> =
    Lazy::new(|| {
        let mut registry: HashMap<String, DataAccessConstructor> = HashMap::new();
        registry.insert("http".to_string(), Arc::new(http_plugin));
        registry.insert("memory".to_string(), Arc::new(memory_plugin));
        RwLock::new(registry)
    });

pub fn register_data_access_plugin<S: Into<String>>(name: S, constructor: DataAccessConstructor) {
    let name = name.into();
    let mut registry = DATA_ACCESS_REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    registry.insert(name, constructor);
}

pub fn get_data_access_plugin(name: &str) -> Option<DataAccessConstructor> {
    DATA_ACCESS_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(name)
        .cloned()
}

pub fn debug_data_access_registry() {
    let registry = DATA_ACCESS_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if registry.is_empty() {
        tracing::debug!("No data access plugins registered.");
    } else {
        tracing::debug!("Registered data access plugins:");
        for key in registry.keys() {
            tracing::debug!(" - {}", key);
        }
    }
}
