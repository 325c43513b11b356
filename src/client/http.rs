use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part as ReqwestPart};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, error};

use super::envelope::normalize_list;
use super::{DataAccess, Resource};
use crate::config::AppConfig;
use crate::errors::{MadrasaError, Result};
use crate::forms::payload::{MultipartPayload, PartBody};
use crate::forms::{FormMode, SubmissionPayload};

/// 基于 reqwest 的 REST 客户端
pub struct HttpDataAccess {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpDataAccess {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.api.base_url.clone(),
            Some(config.api.token.clone()),
            config.api.timeout_ms,
        )
    }

    fn url(&self, resource: Resource, id: Option<i64>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.base_url, resource.path(), id),
            None => format!("{}/{}", self.base_url, resource.path()),
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(reqwest::header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn read_json(response: Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(MadrasaError::api(format!("{status}: {body}")));
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// 转换为 reqwest 的 multipart 表单，保持部分顺序
fn to_form(payload: MultipartPayload) -> Result<Form> {
    let mut form = Form::new();
    for part in payload.into_parts() {
        form = match part.body {
            PartBody::Text(text) => form.text(part.name, text),
            PartBody::File(file) => {
                let file_part = ReqwestPart::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)?;
                form.part(part.name, file_part)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl DataAccess for HttpDataAccess {
    async fn get_all(&self, resource: Resource) -> Result<Vec<Value>> {
        let url = self.url(resource, None);
        debug!("GET {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let body = Self::read_json(response).await?;
        normalize_list(resource, body)
    }

    async fn save(
        &self,
        resource: Resource,
        mode: FormMode,
        payload: SubmissionPayload,
    ) -> Result<Value> {
        let request = match (payload, mode) {
            (SubmissionPayload::Json(body), FormMode::Create) => {
                self.client.post(self.url(resource, None)).json(&body)
            }
            (SubmissionPayload::Json(body), FormMode::Edit(id)) => {
                self.client.put(self.url(resource, Some(id))).json(&body)
            }
            (SubmissionPayload::Multipart(parts), FormMode::Create) => self
                .client
                .post(self.url(resource, None))
                .multipart(to_form(parts)?),
            // multipart 的 PUT 请求体不会被后端解析，改用 POST 并声明 _method
            (SubmissionPayload::Multipart(parts), FormMode::Edit(id)) => self
                .client
                .post(self.url(resource, Some(id)))
                .multipart(to_form(parts)?.text("_method", "PUT")),
        };

        debug!("Saving {} ({})", resource, mode);
        let response = self.authorize(request).send().await.inspect_err(|e| {
            error!("Request to save {} failed: {}", resource, e);
        })?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::payload::ChosenFile;
    use actix_multipart::Multipart;
    use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
    use futures_util::StreamExt;
    use serde_json::json;

    async fn lessons() -> HttpResponse {
        HttpResponse::Ok().json(json!({"data": [{"id": 1, "lesson_title": "Al-Fatiha"}]}))
    }

    async fn courses() -> HttpResponse {
        HttpResponse::Ok().json(json!({"courses": [{"id": 2, "title": "Tahfeez"}]}))
    }

    async fn broken() -> HttpResponse {
        HttpResponse::InternalServerError().body("boom")
    }

    async fn echo_json(req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
        HttpResponse::Ok().json(json!({
            "method": req.method().as_str(),
            "path": req.path(),
            "body": body.into_inner(),
        }))
    }

    // 以 [名称, 值] 数组的形式回显 multipart 部分
    async fn echo_multipart(req: HttpRequest, mut payload: Multipart) -> HttpResponse {
        let mut parts = Vec::new();
        while let Some(Ok(mut field)) = payload.next().await {
            let name = field.name().unwrap_or_default().to_string();
            let is_file = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .is_some();
            let mut data = Vec::new();
            while let Some(Ok(chunk)) = field.next().await {
                data.extend_from_slice(&chunk);
            }
            let value = if is_file {
                format!("<file:{} bytes>", data.len())
            } else {
                String::from_utf8_lossy(&data).to_string()
            };
            parts.push(json!([name, value]));
        }
        HttpResponse::Ok().json(json!({
            "method": req.method().as_str(),
            "path": req.path(),
            "parts": parts,
        }))
    }

    fn start_server() -> String {
        let server = HttpServer::new(|| {
            App::new()
                .route("/api/lessons", web::get().to(lessons))
                .route("/api/courses", web::get().to(courses))
                .route("/api/students", web::get().to(broken))
                .route("/api/exams", web::post().to(echo_json))
                .route("/api/exams/{id}", web::put().to(echo_json))
                .route("/api/instructors", web::post().to(echo_multipart))
                .route("/api/instructors/{id}", web::post().to(echo_multipart))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind test server");
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{addr}/api/")
    }

    #[actix_web::test]
    async fn test_get_all_normalizes_both_envelopes() {
        let client = HttpDataAccess::new(start_server(), None, 5_000).unwrap();

        let lessons = client.get_all(Resource::Lessons).await.unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0]["lesson_title"], "Al-Fatiha");

        let courses = client.get_all(Resource::Courses).await.unwrap();
        assert_eq!(courses[0]["title"], "Tahfeez");
    }

    #[actix_web::test]
    async fn test_error_status_becomes_api_error() {
        let client = HttpDataAccess::new(start_server(), None, 5_000).unwrap();
        let err = client.get_all(Resource::Students).await.unwrap_err();
        assert_eq!(err.code(), "E002");
        assert!(err.message().contains("boom"));
    }

    #[actix_web::test]
    async fn test_json_create_and_update_routes() {
        let client = HttpDataAccess::new(start_server(), None, 5_000).unwrap();

        let created = client
            .save(
                Resource::Exams,
                FormMode::Create,
                SubmissionPayload::Json(json!({"title": "Juz Amma"})),
            )
            .await
            .unwrap();
        assert_eq!(created["method"], "POST");
        assert_eq!(created["path"], "/api/exams");
        assert_eq!(created["body"]["title"], "Juz Amma");

        let updated = client
            .save(
                Resource::Exams,
                FormMode::Edit(8),
                SubmissionPayload::Json(json!({"title": "Juz Tabarak"})),
            )
            .await
            .unwrap();
        assert_eq!(updated["method"], "PUT");
        assert_eq!(updated["path"], "/api/exams/8");
    }

    #[actix_web::test]
    async fn test_multipart_repeats_list_parts_and_spoofs_put() {
        let client = HttpDataAccess::new(start_server(), None, 5_000).unwrap();

        let mut payload = MultipartPayload::new();
        payload.append_text("name", "Yusuf");
        payload.append_list("quran_memorized_parts", [1, 3]);
        payload.append_file(
            "instructor_img",
            ChosenFile {
                file_name: "me.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![0x89, 0x50, 0x4E, 0x47],
            },
        );

        let response = client
            .save(
                Resource::Instructors,
                FormMode::Edit(3),
                SubmissionPayload::Multipart(payload),
            )
            .await
            .unwrap();

        assert_eq!(response["method"], "POST");
        assert_eq!(response["path"], "/api/instructors/3");
        assert_eq!(
            response["parts"],
            json!([
                ["name", "Yusuf"],
                ["quran_memorized_parts[]", "1"],
                ["quran_memorized_parts[]", "3"],
                ["instructor_img", "<file:4 bytes>"],
                ["_method", "PUT"]
            ])
        );
    }
}
