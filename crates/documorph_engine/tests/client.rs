use std::io::Write;
use std::time::Duration;

use documorph_engine::{ClientSettings, FailureKind, JobClient, JobRequest, ReqwestJobClient};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestJobClient {
    ReqwestJobClient::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

fn pdf_attachment() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"%PDF-1.4 test document").unwrap();
    file
}

#[tokio::test]
async fn create_job_posts_multipart_and_returns_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/compress"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .and(body_string_contains("name=\"quality\""))
        .and(body_string_contains("%PDF-1.4 test document"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"task_id":"abc"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let attachment = pdf_attachment();
    let request = JobRequest {
        page_path: "/compress".to_string(),
        fields: vec![("quality".to_string(), "screen".to_string())],
        attachments: vec![("file".to_string(), attachment.path().to_path_buf())],
    };

    let task_id = client_for(&server).create_job(&request).await.expect("created");
    assert_eq!(task_id, "abc");
}

#[tokio::test]
async fn create_job_rejects_html_and_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/merge"))
        .respond_with(ResponseTemplate::new(500).set_body_raw(
            "<html><h1>Internal Server Error</h1></html>",
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let request = JobRequest {
        page_path: "/merge".to_string(),
        ..JobRequest::default()
    };
    let err = client_for(&server).create_job(&request).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::NotJson {
            body: "<html><h1>Internal Server Error</h1></html>".to_string()
        }
    );
}

#[tokio::test]
async fn create_job_without_task_id_is_missing_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/split"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"status":"queued"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let request = JobRequest {
        page_path: "/split".to_string(),
        ..JobRequest::default()
    };
    let err = client_for(&server).create_job(&request).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MissingTaskId);
}

#[tokio::test]
async fn create_job_fails_on_unreadable_attachment_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = JobRequest {
        page_path: "/split".to_string(),
        fields: Vec::new(),
        attachments: vec![("file".to_string(), "/definitely/not/here.pdf".into())],
    };
    let err = client_for(&server).create_job(&request).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Io);
    assert!(err.message.contains("here.pdf"));
}

#[tokio::test]
async fn fetch_status_decodes_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"progress":100,"status":"done","download_url":"/download/abc.pdf"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let report = client_for(&server).fetch_status("abc").await.expect("status");
    assert_eq!(report.progress, Some(100));
    assert_eq!(report.status.as_deref(), Some("done"));
    assert_eq!(report.download_url.as_deref(), Some("/download/abc.pdf"));
    assert!(report.is_terminal());
}

#[tokio::test]
async fn fetch_status_rejects_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_status("abc").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn fetch_status_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw(r#"{"progress":1,"status":"running"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let client = ReqwestJobClient::new(ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .unwrap();
    let err = client.fetch_status("slow").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn status_bound_does_not_cap_downloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/slow.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_bytes(b"%PDF-1.4 slow".to_vec()),
        )
        .mount(&server)
        .await;

    let client = ReqwestJobClient::new(ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .unwrap();
    let artifact = client.download("/download/slow.pdf").await.expect("download");
    assert_eq!(&artifact.bytes[..], b"%PDF-1.4 slow");
}

#[tokio::test]
async fn stalled_download_hits_read_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/stalled.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_bytes(b"never".to_vec()),
        )
        .mount(&server)
        .await;

    let client = ReqwestJobClient::new(ClientSettings {
        base_url: server.uri(),
        read_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .unwrap();
    let err = client.download("/download/stalled.pdf").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn download_returns_bytes_and_disposition() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/abc.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=abc.pdf")
                .set_body_bytes(b"%PDF-1.4 result".to_vec()),
        )
        .mount(&server)
        .await;

    let artifact = client_for(&server)
        .download("/download/abc.pdf")
        .await
        .expect("download");
    assert_eq!(&artifact.bytes[..], b"%PDF-1.4 result");
    assert_eq!(
        artifact.content_disposition.as_deref(),
        Some("attachment; filename=abc.pdf")
    );
}

#[tokio::test]
async fn download_rejects_oversized_artifact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/big.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
        .mount(&server)
        .await;

    let client = ReqwestJobClient::new(ClientSettings {
        base_url: server.uri(),
        max_download_bytes: 16,
        ..ClientSettings::default()
    })
    .unwrap();
    let err = client.download("/download/big.zip").await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 16,
            actual: Some(64)
        }
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestJobClient::new(ClientSettings {
        base_url: "not a url".to_string(),
        ..ClientSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
