//! 数据访问层
//!
//! 表单通过 [`DataAccess`] 读取参考列表、提交记录。不同接口的列表响应外壳不一致
//! （`{ data: [...] }` 或 `{ <资源名>: [...] }`），在这里统一规整为条目列表。

pub mod envelope;
pub mod http;
pub mod memory;
pub mod register;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::errors::Result;
use crate::forms::{FormMode, SubmissionPayload};

/// REST 资源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Lessons,
    Students,
    Courses,
    Attendance,
    Exams,
    Instructors,
    Recitations,
}

impl Resource {
    /// 资源路径，同时也是非 `data` 外壳中的列表键名
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Lessons => "lessons",
            Resource::Students => "students",
            Resource::Courses => "courses",
            Resource::Attendance => "attendance",
            Resource::Exams => "exams",
            Resource::Instructors => "instructors",
            Resource::Recitations => "recitations",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[async_trait::async_trait]
pub trait DataAccess: Send + Sync {
    /// 获取资源列表（已去除响应外壳）
    async fn get_all(&self, resource: Resource) -> Result<Vec<Value>>;
    /// 创建或更新记录
    async fn save(
        &self,
        resource: Resource,
        mode: FormMode,
        payload: SubmissionPayload,
    ) -> Result<Value>;
}

/// 获取并反序列化资源列表
///
/// 逐条解析，无法解析的条目记录日志后跳过，其余条目照常返回。
pub async fn fetch_list<T: DeserializeOwned>(
    client: &dyn DataAccess,
    resource: Resource,
) -> Result<Vec<T>> {
    let items = client.get_all(resource).await?;
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(row) => Some(row),
            Err(e) => {
                warn!("Skipping {} row {}: {}", resource, index, e);
                None
            }
        })
        .collect();

    if decoded.len() < total {
        warn!("Loaded {} of {} {} rows", decoded.len(), total, resource);
    }
    Ok(decoded)
}
