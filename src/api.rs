//! HTTP surface for the lab report simplifier.
//!
//! A single endpoint is exposed:
//!
//! - `POST /api/simplify` – Accepts a multipart upload in the `file` field (PDF or image) and
//!   returns `{ "summary": string, "source_type": "pdf" | "image" }`.
//!
//! Failures are returned as `{ "detail": string }`. Client mistakes (empty upload, unsupported
//! type, unreadable PDF, PDF without text) map to `400`; inference provider failures map to
//! `502`. CORS allows credentials, and a `*` entry in the allowed origins mirrors the caller's
//! origin.

use crate::config::Config;
use crate::processing::{SimplifyApi, SimplifyError, SimplifyResult, UploadedFile};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::{HeaderValue, StatusCode, header::InvalidHeaderValue},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

const FILE_FIELD: &str = "file";
const WILDCARD_ORIGIN: &str = "*";

/// HTTP-level settings applied around the router.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Origins accepted by the CORS layer; `*` mirrors any origin.
    pub allowed_origins: Vec<String>,
    /// Maximum request body size in bytes.
    pub max_upload_bytes: usize,
}

impl From<&Config> for ServerOptions {
    fn from(config: &Config) -> Self {
        Self {
            allowed_origins: config.cors_allowed_origins.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Build the HTTP router exposing the simplification endpoint.
///
/// Fails only when a configured CORS origin is not a valid header value.
pub fn create_router<S>(
    service: Arc<S>,
    options: &ServerOptions,
) -> Result<Router, InvalidHeaderValue>
where
    S: SimplifyApi + 'static,
{
    Ok(Router::new()
        .route("/api/simplify", post(simplify::<S>))
        .with_state(service)
        .layer(DefaultBodyLimit::max(options.max_upload_bytes))
        .layer(cors_layer(&options.allowed_origins)?)
        .layer(TraceLayer::new_for_http()))
}

/// Build the CORS layer: every method and header, credentials allowed.
///
/// Browsers refuse a literal `*` together with credentials, so a wildcard entry mirrors the
/// request origin instead.
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
    let allow_origin = if allowed_origins.iter().any(|origin| origin == WILDCARD_ORIGIN) {
        AllowOrigin::mirror_request()
    } else {
        let origins = allowed_origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Summarize one uploaded lab report.
async fn simplify<S>(
    State(service): State<Arc<S>>,
    multipart: Multipart,
) -> Result<Json<SimplifyResult>, AppError>
where
    S: SimplifyApi,
{
    let upload = read_upload(multipart).await?;
    let filename = upload.filename.clone();
    let result = service.simplify(upload).await?;
    tracing::info!(
        filename = %filename,
        source_type = result.source_type().as_str(),
        summary_bytes = result.summary().len(),
        "Simplify request completed"
    );
    Ok(Json(result))
}

/// Pull the `file` field out of the multipart body; other fields are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok(UploadedFile {
            bytes,
            filename,
            content_type,
        });
    }
    Err(AppError::MissingFile)
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

enum AppError {
    Simplify(SimplifyError),
    Multipart(MultipartError),
    MissingFile,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Simplify(error) => match error {
                SimplifyError::EmptyUpload
                | SimplifyError::UnsupportedFileType
                | SimplifyError::UnreadablePdf(_)
                | SimplifyError::NoReadableText => StatusCode::BAD_REQUEST,
                SimplifyError::Inference(_) => StatusCode::BAD_GATEWAY,
                SimplifyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Multipart(error) => error.status(),
            Self::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Simplify(SimplifyError::Inference(_)) => {
                "The summary service is unavailable. Please try again later.".to_string()
            }
            Self::Simplify(SimplifyError::Internal(_)) => "Internal server error.".to_string(),
            Self::Simplify(error) => error.to_string(),
            Self::Multipart(error) => error.body_text(),
            Self::MissingFile => "No file uploaded.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Simplify(SimplifyError::UnreadablePdf(source)) => {
                tracing::warn!(%status, error = %source, "Rejected unreadable PDF");
            }
            Self::Simplify(error) if status.is_server_error() => {
                tracing::error!(%status, error = %error, "Simplify request failed");
            }
            Self::Simplify(error) => tracing::warn!(%status, error = %error, "Rejected upload"),
            Self::Multipart(error) => {
                tracing::warn!(%status, error = %error, "Malformed multipart body");
            }
            Self::MissingFile => tracing::warn!(%status, "Multipart body had no file field"),
        }
        (
            status,
            Json(ErrorBody {
                detail: self.detail(),
            }),
        )
            .into_response()
    }
}

impl From<SimplifyError> for AppError {
    fn from(inner: SimplifyError) -> Self {
        Self::Simplify(inner)
    }
}

impl From<MultipartError> for AppError {
    fn from(inner: MultipartError) -> Self {
        Self::Multipart(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::{ServerOptions, create_router};
    use crate::extraction::fixtures::pdf_with_pages;
    use crate::inference::testing::{InferenceCall, RecordingInferenceClient};
    use crate::processing::SimplifyService;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "lab-simplifier-test-boundary";

    fn options() -> ServerOptions {
        ServerOptions {
            allowed_origins: vec!["http://localhost:3000".into(), "*".into()],
            max_upload_bytes: 1024 * 1024,
        }
    }

    fn router(stub: &RecordingInferenceClient) -> Router {
        let service = Arc::new(SimplifyService::new(Arc::new(stub.clone())));
        create_router(service, &options()).expect("router")
    }

    fn multipart_body(field: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/simplify")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.expect("router response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json body");
        (status, json)
    }

    #[tokio::test]
    async fn pdf_upload_returns_summary() {
        let stub = RecordingInferenceClient::replying("Glucose is slightly high.");
        let pdf = pdf_with_pages(&[Some("Glucose: 110 mg/dL (High)")]);

        let (status, json) = send(
            router(&stub),
            upload_request(multipart_body("file", "report.pdf", "application/pdf", &pdf)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["summary"], "Glucose is slightly high.");
        assert_eq!(json["source_type"], "pdf");
        assert_eq!(stub.recorded_calls().await.len(), 1);
    }

    #[tokio::test]
    async fn image_upload_returns_image_source_type() {
        let stub = RecordingInferenceClient::replying("Image summary");

        let (status, json) = send(
            router(&stub),
            upload_request(multipart_body("file", "scan.png", "image/png", b"\x89PNG")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["source_type"], "image");
        let calls = stub.recorded_calls().await;
        assert!(matches!(
            &calls[..],
            [InferenceCall::Image { mime_type, .. }] if mime_type == "image/png"
        ));
    }

    #[tokio::test]
    async fn text_upload_is_unsupported() {
        let stub = RecordingInferenceClient::replying("unused");

        let (status, json) = send(
            router(&stub),
            upload_request(multipart_body("file", "notes.txt", "text/plain", b"hello")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["detail"],
            "Unsupported file type. Upload a PDF or image file."
        );
        assert!(stub.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn empty_upload_is_bad_request() {
        let stub = RecordingInferenceClient::replying("unused");

        let (status, json) = send(
            router(&stub),
            upload_request(multipart_body("file", "report.pdf", "application/pdf", b"")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["detail"], "Uploaded file is empty.");
    }

    #[tokio::test]
    async fn corrupt_and_blank_pdfs_have_distinct_messages() {
        let stub = RecordingInferenceClient::replying("unused");

        let (status, json) = send(
            router(&stub),
            upload_request(multipart_body(
                "file",
                "report.pdf",
                "application/pdf",
                b"%PDF-garbage",
            )),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["detail"],
            "Unable to read PDF. Make sure the file is not scanned or blurry."
        );

        let blank = pdf_with_pages(&[None]);
        let (status, json) = send(
            router(&stub),
            upload_request(multipart_body("file", "report.pdf", "application/pdf", &blank)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["detail"], "No readable text found in PDF.");

        assert!(stub.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn missing_file_field_is_unprocessable() {
        let stub = RecordingInferenceClient::replying("unused");

        let (status, json) = send(
            router(&stub),
            upload_request(multipart_body("document", "report.pdf", "application/pdf", b"x")),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["detail"], "No file uploaded.");
    }

    #[tokio::test]
    async fn inference_failure_is_bad_gateway() {
        let stub = RecordingInferenceClient::failing();

        let (status, json) = send(
            router(&stub),
            upload_request(multipart_body(
                "file",
                "scan.jpg",
                "image/jpeg",
                b"\xff\xd8\xff",
            )),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json["detail"].as_str().expect("detail").contains("unavailable"));
    }

    #[tokio::test]
    async fn preflight_mirrors_origin_with_credentials() {
        let stub = RecordingInferenceClient::replying("unused");
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/simplify")
            .header(header::ORIGIN, "https://reports.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .expect("request");

        let response = router(&stub).oneshot(request).await.expect("response");
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://reports.example"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
    }

    #[test]
    fn explicit_origin_list_rejects_invalid_values() {
        assert!(super::cors_layer(&["http://localhost:3000".into()]).is_ok());
        assert!(super::cors_layer(&["bad\norigin".into()]).is_err());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn completion_log_reports_summary_size_in_bytes() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        // Four characters, six UTF-8 bytes.
        let stub = RecordingInferenceClient::replying("Déjà");
        let (status, _) = send(
            router(&stub),
            upload_request(multipart_body("file", "scan.png", "image/png", b"\x89PNG")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let output = String::from_utf8(logs.0.lock().expect("log buffer").clone()).expect("utf8");
        assert!(output.contains("summary_bytes=6"), "got {output}");
    }
}
