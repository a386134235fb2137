use actix_cors::Cors;
use actix_multipart::form::bytes::Bytes as UploadedFile;
use actix_multipart::form::text::Text;
use actix_multipart::form::MultipartForm;
use actix_web::{dev::Server, http::header, post, web, App, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::application::{AnalyzeUseCase, ChatUseCase};
use crate::domain::error::AnalyzeError;
use crate::infrastructure::config::AppConfig;

/// Request-handling dependencies, constructed once at startup.
pub struct HttpState {
    pub analyze_use_case: AnalyzeUseCase,
    pub chat_use_case: ChatUseCase,
}

#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    #[multipart(limit = "10MB")]
    pub file: UploadedFile,
    pub question: Text<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub status: &'static str,
    pub answer: String,
}

impl AnswerResponse {
    fn success(answer: String) -> Self {
        Self {
            status: "success",
            answer,
        }
    }
}

#[post("/upload")]
async fn upload(
    data: web::Data<HttpState>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> impl Responder {
    let question = form.question.into_inner();
    if question.trim().is_empty() {
        return HttpResponse::BadRequest().body("Question is required");
    }

    let file_content = String::from_utf8_lossy(&form.file.data).into_owned();
    info!(bytes = form.file.data.len(), "processing uploaded table");

    match data.analyze_use_case.execute(&file_content, &question).await {
        Ok(result) => HttpResponse::Ok().json(AnswerResponse::success(result.answer)),
        Err(AnalyzeError::Parse(e)) => {
            error!(error = %e, "rejected uploaded table");
            HttpResponse::BadRequest().body(e.to_string())
        }
        Err(AnalyzeError::Inference(e)) => {
            error!(error = %e, "table analysis failed");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

#[post("/chat")]
async fn chat(data: web::Data<HttpState>, req: web::Json<ChatRequest>) -> impl Responder {
    match data.chat_use_case.execute(&req.query).await {
        Ok(reply) => HttpResponse::Ok().json(AnswerResponse::success(reply.content)),
        Err(e) => {
            error!(error = %e, "chat request failed");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

pub fn start_server(config: &AppConfig, state: Arc<HttpState>) -> std::io::Result<Server> {
    let data = web::Data::from(state);
    let allowed_origin = config.allowed_origin.clone();

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION]);

        App::new()
            .wrap(cors)
            .app_data(data.clone())
            .service(upload)
            .service(chat)
    })
    .bind((config.host.clone(), config.port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::InferenceError;
    use crate::infrastructure::llm_clients::gateway::{InferenceGateway, ProviderEndpoints};
    use crate::infrastructure::llm_clients::{HttpTransport, TransportReply};
    use actix_web::test;
    use async_trait::async_trait;
    use serde_json::Value;

    struct StubTransport {
        status: u16,
        body: String,
    }

    #[async_trait]
    impl HttpTransport for StubTransport {
        async fn post_json(
            &self,
            _url: &str,
            _token: &str,
            _body: &Value,
        ) -> Result<TransportReply, InferenceError> {
            Ok(TransportReply {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    fn state_with(status: u16, body: &str) -> web::Data<HttpState> {
        let transport = Arc::new(StubTransport {
            status,
            body: body.to_string(),
        });
        let gateway = Arc::new(InferenceGateway::new(
            transport,
            "test-token".to_string(),
            ProviderEndpoints {
                table_qa: "http://table-qa.test".to_string(),
                chat: "http://chat.test".to_string(),
                chat_completions: "http://chat-completions.test".to_string(),
            },
        ));
        web::Data::new(HttpState {
            analyze_use_case: AnalyzeUseCase::new(gateway.clone()),
            chat_use_case: ChatUseCase::new(gateway),
        })
    }

    fn multipart_body(boundary: &str, file: &str, question: Option<&str>) -> String {
        let mut body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"data.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n{file}\r\n"
        );
        if let Some(question) = question {
            body.push_str(&format!(
                "--{boundary}\r\n\
                 Content-Disposition: form-data; name=\"question\"\r\n\r\n{question}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));
        body
    }

    #[actix_web::test]
    async fn upload_returns_success_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(200, r#"{"answer":"42","confidence":0.9}"#))
                .service(upload),
        )
        .await;

        let boundary = "test-boundary";
        let req = test::TestRequest::post()
            .uri("/upload")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            ))
            .set_payload(multipart_body(
                boundary,
                "name,age\nAlice,30\nBob,25",
                Some("how many people?"),
            ))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["answer"], "42");
    }

    #[actix_web::test]
    async fn upload_rejects_malformed_table() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(200, r#"{"answer":"42"}"#))
                .service(upload),
        )
        .await;

        let boundary = "test-boundary";
        let req = test::TestRequest::post()
            .uri("/upload")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            ))
            .set_payload(multipart_body(boundary, "a,b\n1", Some("how many?")))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn upload_maps_provider_failure_to_500() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(503, "model is loading"))
                .service(upload),
        )
        .await;

        let boundary = "test-boundary";
        let req = test::TestRequest::post()
            .uri("/upload")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            ))
            .set_payload(multipart_body(boundary, "a,b\n1,2", Some("how many?")))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("model is loading"));
    }

    #[actix_web::test]
    async fn chat_returns_success_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(
                    200,
                    r#"{"choices":[{"message":{"content":"hello!"}}]}"#,
                ))
                .service(chat),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({"query": "hi"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["answer"], "hello!");
    }
}
