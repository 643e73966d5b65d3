//! End-to-end tests: the router is served on an ephemeral port and
//! driven with real multipart uploads.

use csvmatrix::{server::build_router, Operation, RouteTable, ServerConfig};
use reqwest::{multipart, StatusCode};

const MATRIX: &str = include_str!("../testdata/matrix.csv");
const MATRIX_INVALID: &str = include_str!("../testdata/matrix-invalid.csv");
const MATRIX_EMPTY: &str = include_str!("../testdata/matrix-empty.csv");
const MATRIX_RAGGED: &str = include_str!("../testdata/matrix-ragged.csv");
const MATRIX_WORDS: &str = include_str!("../testdata/matrix-words.csv");
const MATRIX_UTF8: &str = include_str!("../testdata/matrix-utf8.csv");

const OPERATION_PATHS: [&str; 5] = ["/echo", "/invert", "/flatten", "/sum", "/multiply"];

async fn spawn_app(config: ServerConfig) -> String {
    let app = build_router(&config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn csv_form(content: &str) -> multipart::Form {
    let part = multipart::Part::bytes(content.as_bytes().to_vec())
        .file_name("matrix.csv")
        .mime_str("text/csv")
        .unwrap();
    multipart::Form::new().part("file", part)
}

async fn upload(base: &str, path: &str, content: &str) -> (StatusCode, String) {
    let res = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .multipart(csv_form(content))
        .send()
        .await
        .unwrap_or_else(|e| panic!("error making POST request to {}: {}", path, e));

    let status = res.status();
    let body = res.text().await.unwrap();
    (status, body)
}

fn trimmed(body: &str) -> &str {
    body.trim_matches(|c| c == '\r' || c == '\n')
}

#[tokio::test]
async fn test_echo() {
    let base = spawn_app(ServerConfig::default()).await;
    let (status, body) = upload(&base, "/echo", MATRIX).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(trimmed(&body), "1,2,3\n4,5,6\n7,8,9");
}

#[tokio::test]
async fn test_invert() {
    let base = spawn_app(ServerConfig::default()).await;
    let (status, body) = upload(&base, "/invert", MATRIX).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(trimmed(&body), "1,4,7\n2,5,8\n3,6,9");
}

#[tokio::test]
async fn test_flatten() {
    let base = spawn_app(ServerConfig::default()).await;
    let (status, body) = upload(&base, "/flatten", MATRIX).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(trimmed(&body), "1,2,3,4,5,6,7,8,9");
}

#[tokio::test]
async fn test_sum() {
    let base = spawn_app(ServerConfig::default()).await;
    let (status, body) = upload(&base, "/sum", MATRIX).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(trimmed(&body), "45");
}

#[tokio::test]
async fn test_multiply() {
    let base = spawn_app(ServerConfig::default()).await;
    let (status, body) = upload(&base, "/multiply", MATRIX).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(trimmed(&body), "362880");
}

#[tokio::test]
async fn test_invalid_quoting_is_500_everywhere() {
    let base = spawn_app(ServerConfig::default()).await;

    for path in OPERATION_PATHS {
        let (status, body) = upload(&base, path, MATRIX_INVALID).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "path {}", path);
        assert!(body.starts_with("error "), "path {}: {}", path, body);
    }
}

#[tokio::test]
async fn test_empty_is_400_everywhere() {
    let base = spawn_app(ServerConfig::default()).await;

    for path in OPERATION_PATHS {
        let (status, body) = upload(&base, path, MATRIX_EMPTY).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "path {}", path);
        assert_eq!(trimmed(&body), "error no data provided");
    }
}

#[tokio::test]
async fn test_non_square_is_400() {
    let base = spawn_app(ServerConfig::default()).await;

    let (status, body) = upload(&base, "/echo", MATRIX_RAGGED).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(trimmed(&body), "error unequal rows and column lengths");

    let (status, _) = upload(&base, "/sum", "1,2\n3,4\n5,6\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validation_failure_writes_only_the_error() {
    let base = spawn_app(ServerConfig::default()).await;
    let (_, body) = upload(&base, "/flatten", MATRIX_RAGGED).await;

    assert_eq!(body, "error unequal rows and column lengths\n");
}

#[tokio::test]
async fn test_bad_url_is_404() {
    let base = spawn_app(ServerConfig::default()).await;

    let (status, body) = upload(&base, "/bad", MATRIX).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(trimmed(&body), "error endpoint not found");

    let (status, _) = upload(&base, "/sum/extra", MATRIX).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_sum_is_500() {
    let base = spawn_app(ServerConfig::default()).await;

    for path in ["/sum", "/multiply"] {
        let (status, body) = upload(&base, path, MATRIX_WORDS).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("\"a\""), "{}", body);
    }

    let (status, body) = upload(&base, "/echo", MATRIX_WORDS).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trimmed(&body), "a,b\nc,d");
}

#[tokio::test]
async fn test_missing_file_field_is_500() {
    let base = spawn_app(ServerConfig::default()).await;

    let form = multipart::Form::new().text("other", "1,2\n3,4\n");
    let res = reqwest::Client::new()
        .post(format!("{}/echo", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.text().await.unwrap().contains("no such file"));
}

#[tokio::test]
async fn test_non_multipart_body_is_500() {
    let base = spawn_app(ServerConfig::default()).await;

    let res = reqwest::Client::new()
        .post(format!("{}/sum", base))
        .body("1,2\n3,4\n")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_upload_over_limit_is_500() {
    let base = spawn_app(ServerConfig::default().with_max_upload_bytes(1024)).await;

    let big = "1,".repeat(2000) + "1\n";
    let (status, _) = upload(&base, "/echo", &big).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = upload(&base, "/sum", "5\n").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_on_operation_route_is_405() {
    let base = spawn_app(ServerConfig::default()).await;

    let res = reqwest::get(format!("{}/echo", base)).await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.text().await.unwrap(), "error method not allowed\n");

    let (status, body) = upload(&base, "/health", MATRIX).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(trimmed(&body), "error method not allowed");
}

#[tokio::test]
async fn test_utf8_upload_round_trips() {
    let base = spawn_app(ServerConfig::default()).await;

    let (status, body) = upload(&base, "/echo", MATRIX_UTF8).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, MATRIX_UTF8);

    let (status, body) = upload(&base, "/invert", "€,1\n2,3\n").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trimmed(&body), "€,2\n1,3");
}

#[tokio::test]
async fn test_custom_route_table() {
    let routes = RouteTable::empty()
        .with_route("/transpose", Operation::Invert)
        .unwrap();
    let base = spawn_app(ServerConfig::default().with_routes(routes)).await;

    let (status, body) = upload(&base, "/transpose", "1,2\n3,4\n").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trimmed(&body), "1,3\n2,4");

    let (status, _) = upload(&base, "/invert", "1,2\n3,4\n").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let base = spawn_app(ServerConfig::default()).await;

    let res = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "csvmatrix");

    let endpoints = body["endpoints"].as_array().unwrap();
    assert!(endpoints.iter().any(|e| e.as_str().unwrap().starts_with("POST /multiply")));
}
