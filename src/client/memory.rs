use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use super::envelope::normalize_list;
use super::{DataAccess, Resource};
use crate::errors::{MadrasaError, Result};
use crate::forms::{FormMode, SubmissionPayload};

/// 一次保存请求
#[derive(Debug, Clone)]
pub struct SavedRequest {
    pub resource: Resource,
    pub mode: FormMode,
    pub payload: SubmissionPayload,
}

/// 内存数据源
///
/// 列表以原始响应体保存，读取时同样经过外壳规整；保存请求全部记录下来。
pub struct MemoryDataAccess {
    lists: Mutex<HashMap<Resource, Value>>,
    failing: Mutex<HashSet<Resource>>,
    saves: Mutex<Vec<SavedRequest>>,
    fail_saves: AtomicBool,
    next_id: AtomicI64,
}

impl Default for MemoryDataAccess {
    fn default() -> Self {
        Self {
            lists: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            saves: Mutex::new(Vec::new()),
            fail_saves: AtomicBool::new(false),
            next_id: AtomicI64::new(1),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryDataAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置资源的原始响应体
    pub fn with_list(self, resource: Resource, body: Value) -> Self {
        lock(&self.lists).insert(resource, body);
        self
    }

    /// 让该资源的读取失败
    pub fn fail_fetch(&self, resource: Resource) {
        lock(&self.failing).insert(resource);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn saves(&self) -> Vec<SavedRequest> {
        lock(&self.saves).clone()
    }

    pub fn save_count(&self) -> usize {
        lock(&self.saves).len()
    }
}

#[async_trait]
impl DataAccess for MemoryDataAccess {
    async fn get_all(&self, resource: Resource) -> Result<Vec<Value>> {
        if lock(&self.failing).contains(&resource) {
            return Err(MadrasaError::network(format!(
                "{resource} is unavailable"
            )));
        }
        let body = lock(&self.lists)
            .get(&resource)
            .cloned()
            .unwrap_or_else(|| json!({ "data": [] }));
        normalize_list(resource, body)
    }

    async fn save(
        &self,
        resource: Resource,
        mode: FormMode,
        payload: SubmissionPayload,
    ) -> Result<Value> {
        // 让出一次调度，模拟网络往返
        tokio::task::yield_now().await;

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(MadrasaError::network(format!("Saving {resource} failed")));
        }

        let id = match mode {
            FormMode::Create => self.next_id.fetch_add(1, Ordering::SeqCst),
            FormMode::Edit(id) => id,
        };
        debug!("Memory backend stored {} #{}", resource, id);

        lock(&self.saves).push(SavedRequest {
            resource,
            mode,
            payload,
        });
        Ok(json!({ "id": id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lists_pass_through_envelope() {
        let memory = MemoryDataAccess::new()
            .with_list(Resource::Courses, json!({"courses": [{"id": 1}]}));
        assert_eq!(memory.get_all(Resource::Courses).await.unwrap().len(), 1);
        assert!(memory.get_all(Resource::Lessons).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_configurable() {
        let memory = MemoryDataAccess::new();
        memory.fail_fetch(Resource::Students);
        assert!(memory.get_all(Resource::Students).await.is_err());

        memory.fail_saves(true);
        let result = memory
            .save(
                Resource::Exams,
                FormMode::Create,
                SubmissionPayload::Json(json!({})),
            )
            .await;
        assert!(result.is_err());
        assert_eq!(memory.save_count(), 0);
    }

    #[tokio::test]
    async fn test_save_assigns_ids() {
        let memory = MemoryDataAccess::new();
        let created = memory
            .save(
                Resource::Exams,
                FormMode::Create,
                SubmissionPayload::Json(json!({"title": "A"})),
            )
            .await
            .unwrap();
        let updated = memory
            .save(
                Resource::Exams,
                FormMode::Edit(40),
                SubmissionPayload::Json(json!({"title": "B"})),
            )
            .await
            .unwrap();
        assert_eq!(created["id"], 1);
        assert_eq!(updated["id"], 40);
        assert_eq!(memory.saves()[1].mode, FormMode::Edit(40));
    }
}
