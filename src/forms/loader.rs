//! 参考列表加载
//!
//! 表单挂载时并发获取下拉框所需的参考列表。某个列表获取失败时只记录日志并使用空列表，
//! 表单仍然可用，不重试。

use futures_util::future::join3;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::client::{DataAccess, Resource, fetch_list};
use crate::models::references::entities::{Course, Lesson, Student};

/// 获取单个参考列表，失败时返回空列表
pub async fn load_list<T: DeserializeOwned>(client: &dyn DataAccess, resource: Resource) -> Vec<T> {
    match fetch_list(client, resource).await {
        Ok(items) => {
            debug!("Loaded {} {}", items.len(), resource);
            items
        }
        Err(e) => {
            error!("Failed to fetch {}: {}", resource, e);
            Vec::new()
        }
    }
}

/// 表单持有的参考列表副本
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceLists {
    pub lessons: Vec<Lesson>,
    pub students: Vec<Student>,
    pub courses: Vec<Course>,
}

impl ReferenceLists {
    /// 并发加载所需的列表；未请求的列表保持为空
    pub async fn load(client: &dyn DataAccess, needs: &[Resource]) -> Self {
        let wants = |resource: Resource| needs.contains(&resource);

        let (lessons, students, courses) = join3(
            async {
                if wants(Resource::Lessons) {
                    load_list(client, Resource::Lessons).await
                } else {
                    Vec::new()
                }
            },
            async {
                if wants(Resource::Students) {
                    load_list(client, Resource::Students).await
                } else {
                    Vec::new()
                }
            },
            async {
                if wants(Resource::Courses) {
                    load_list(client, Resource::Courses).await
                } else {
                    Vec::new()
                }
            },
        )
        .await;

        Self {
            lessons,
            students,
            courses,
        }
    }

    pub fn student(&self, id: i64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::MemoryDataAccess;
    use serde_json::json;

    fn backend() -> MemoryDataAccess {
        MemoryDataAccess::new()
            .with_list(
                Resource::Lessons,
                json!({"data": [{"id": 1, "lesson_title": "Al-Mulk"}]}),
            )
            .with_list(
                Resource::Students,
                json!({"data": [{"id": 7, "name": "Amina"}, {"id": 8, "name": "Bilal"}]}),
            )
            .with_list(Resource::Courses, json!({"courses": [{"id": 3, "title": "Hifz"}]}))
    }

    #[tokio::test]
    async fn test_loads_only_requested_lists() {
        let client = backend();
        let lists = ReferenceLists::load(&client, &[Resource::Lessons, Resource::Students]).await;
        assert_eq!(lists.lessons.len(), 1);
        assert_eq!(lists.students.len(), 2);
        assert!(lists.courses.is_empty());
        assert_eq!(lists.student(8).map(|s| s.name.as_str()), Some("Bilal"));
    }

    #[tokio::test]
    async fn test_failed_fetch_degrades_to_empty() {
        let client = backend();
        client.fail_fetch(Resource::Students);
        let lists = ReferenceLists::load(&client, &[Resource::Lessons, Resource::Students]).await;
        assert_eq!(lists.lessons.len(), 1);
        assert!(lists.students.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_items_degrade_to_empty() {
        let client = MemoryDataAccess::new()
            .with_list(Resource::Courses, json!({"courses": [{"title": "no id"}]}));
        let courses: Vec<Course> = load_list(&client, Resource::Courses).await;
        assert!(courses.is_empty());
    }
}
