//! HTTP server for the csvmatrix API.
//!
//! # API Endpoints
//!
//! | Method | Path        | Description                              |
//! |--------|-------------|------------------------------------------|
//! | POST   | `/echo`     | Matrix as uploaded                       |
//! | POST   | `/invert`   | Transposed matrix                        |
//! | POST   | `/flatten`  | All values on one line                   |
//! | POST   | `/sum`      | Sum of all values                        |
//! | POST   | `/multiply` | Product of all values                    |
//! | GET    | `/health`   | Health check                             |
//! | GET    | `/logs`     | SSE stream of request logs               |
//!
//! Operation routes come from the [`RouteTable`] in [`ServerConfig`].
//! Each expects a multipart upload with a field named `file`.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart},
    http::{header, Method, Uri},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use std::{convert::Infallible, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use super::logs::{log_info, log_request, LogEntry, LOG_BROADCASTER};
use super::routes::{RouteTable, HEALTH_PATH, LOGS_PATH};
use super::types::HealthResponse;
use crate::config::ServerConfig;
use crate::error::{RequestError, RequestResult, ServerResult};
use crate::models::OperationOutput;
use crate::operations::Operation;
use crate::parser::parse_grid;
use crate::validation::validate;

/// Name of the multipart field holding the CSV.
pub const FILE_FIELD: &str = "file";

/// Bind to the configured address and serve until the process stops.
pub async fn start_server(config: ServerConfig) -> ServerResult<()> {
    let addr = config.socket_addr();
    let app = build_router(&config);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    log_info(format!("🚀 csvmatrix listening on http://{}", listener.local_addr()?));
    for endpoint in endpoint_list(&config.routes) {
        log_info(format!("   {}", endpoint));
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router from `config`.
///
/// Unknown paths fall through to a plaintext 404, and a known path hit
/// with the wrong method gets a plaintext 405.
pub fn build_router(config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let mut operations = Router::new();
    for (path, op) in config.routes.iter() {
        operations = operations.route(
            path,
            post(move |multipart: Result<Multipart, MultipartRejection>| {
                run_operation(op, multipart)
            }),
        );
    }
    let operations = operations.layer(DefaultBodyLimit::max(config.max_upload_bytes));

    let endpoints = endpoint_list(&config.routes);

    Router::new()
        .route(HEALTH_PATH, get(move || health(endpoints)))
        .route(LOGS_PATH, get(sse_logs))
        .merge(operations)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(cors)
}

fn endpoint_list(routes: &RouteTable) -> Vec<String> {
    routes
        .iter()
        .map(|(path, op)| format!("POST {} - {}", path, op))
        .chain([
            format!("GET {} - health check", HEALTH_PATH),
            format!("GET {} - SSE log stream", LOGS_PATH),
        ])
        .collect()
}

/// Health check endpoint
async fn health(endpoints: Vec<String>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "csvmatrix".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

async fn not_found(method: Method, uri: Uri) -> Response {
    let err = RequestError::RouteNotFound(uri.path().to_string());
    log_request(
        Uuid::new_v4(),
        LogEntry::warning(format!("{} {} -> {}", method, uri.path(), err.status_code())),
    );
    err.into_response()
}

async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    let err = RequestError::MethodNotAllowed(format!("{} {}", method, uri.path()));
    log_request(
        Uuid::new_v4(),
        LogEntry::warning(format!("{} {} -> {}", method, uri.path(), err.status_code())),
    );
    err.into_response()
}

/// Run one operation request; exactly one response is produced.
async fn run_operation(
    op: Operation,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let request_id = Uuid::new_v4();

    match process_upload(op, request_id, multipart).await {
        Ok(output) => {
            log_request(
                request_id,
                LogEntry::success(format!("{} {} -> 200", op, op.path())),
            );
            output.into_response()
        }
        Err(err) => {
            let status = err.status_code();
            let entry = format!("{} {} -> {}: {}", op, op.path(), status.as_u16(), err);
            let entry = if status.is_server_error() {
                LogEntry::error(entry)
            } else {
                LogEntry::warning(entry)
            };
            log_request(request_id, entry);
            err.into_response()
        }
    }
}

async fn process_upload(
    op: Operation,
    request_id: Uuid,
    multipart: Result<Multipart, MultipartRejection>,
) -> RequestResult<OperationOutput> {
    let mut multipart = multipart.map_err(|e| RequestError::FileRetrieval(e.to_string()))?;
    let upload = read_file_field(&mut multipart).await?;

    log_request(
        request_id,
        LogEntry::info(format!(
            "📄 {} upload: {} ({} bytes)",
            op,
            upload.file_name.as_deref().unwrap_or("unknown"),
            upload.bytes.len()
        )),
    );

    let grid = parse_grid(&upload.bytes)?;
    let square = validate(grid)?;

    log_request(
        request_id,
        LogEntry::info(format!("{}x{} matrix", square.size(), square.size())),
    );

    Ok(op.apply(&square)?)
}

struct Upload {
    file_name: Option<String>,
    bytes: Bytes,
}

/// Read the first multipart field named `file`.
async fn read_file_field(multipart: &mut Multipart) -> RequestResult<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RequestError::FileRetrieval(format!("multipart error: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| RequestError::FileRetrieval(format!("read error: {}", e)))?;

        return Ok(Upload { file_name, bytes });
    }

    Err(RequestError::FileRetrieval(format!(
        "no such file: multipart field '{}' is missing",
        FILE_FIELD
    )))
}
