//! Integration tests for the firmware downloader.
//!
//! These tests verify the full download flow with mock HTTP servers.

use firmware_downloader_core::download::{DownloadError, FirmwareDownloader, destination_path};
use firmware_downloader_core::{FirmwareRelease, Pacer};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a mock server with a file endpoint.
async fn setup_mock_file(path_str: &str, content: &[u8]) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(&mock_server)
        .await;

    mock_server
}

/// Serves a single `200` response that promises more body than it sends,
/// then closes the connection. Returns the URL of `path_str` on that server.
async fn serve_truncated_body(path_str: &str, sent: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        let head = "HTTP/1.1 200 OK\r\n\
                    content-type: application/octet-stream\r\n\
                    content-length: 1000\r\n\r\n";
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(sent).await.unwrap();
        socket.flush().await.unwrap();
    });

    format!("http://{addr}{path_str}")
}

#[tokio::test]
async fn test_download_writes_under_model_directory() {
    let content = b"\x7fELF firmware payload";
    let mock_server = setup_mock_file("/2022/library/33320356/filename.zip", content).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let downloader = FirmwareDownloader::new(reqwest::Client::new(), temp_dir.path());
    let url = format!("{}/2022/library/33320356/filename.zip", mock_server.uri());
    let file_path = downloader
        .download("A6G209PF", &url)
        .await
        .expect("download should succeed");

    assert_eq!(
        file_path,
        temp_dir.path().join("A6G209PF").join("filename.zip")
    );
    assert_eq!(
        file_path,
        destination_path(temp_dir.path(), "A6G209PF", &url).unwrap()
    );
    assert_eq!(std::fs::read(&file_path).expect("should read file"), content);
}

#[tokio::test]
async fn test_download_into_existing_directory_overwrites_file() {
    let mock_server = setup_mock_file("/fw/update.bin", b"new image").await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let model_dir = temp_dir.path().join("A6G209PF");
    std::fs::create_dir_all(&model_dir).unwrap();
    std::fs::write(model_dir.join("update.bin"), b"old image that is longer").unwrap();

    let downloader = FirmwareDownloader::new(reqwest::Client::new(), temp_dir.path());
    let url = format!("{}/fw/update.bin", mock_server.uri());

    let first = downloader.download("A6G209PF", &url).await.unwrap();
    let second = downloader.download("A6G209PF", &url).await.unwrap();

    assert_eq!(first, second, "repeat download must reuse the same path");
    assert_eq!(std::fs::read(&second).unwrap(), b"new image");
    let entries = std::fs::read_dir(&model_dir).unwrap().count();
    assert_eq!(entries, 1, "no duplicate files should be created");
}

#[tokio::test]
async fn test_truncated_download_keeps_existing_file() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let model_dir = temp_dir.path().join("A6G209PF");
    std::fs::create_dir_all(&model_dir).unwrap();
    std::fs::write(model_dir.join("fw.zip"), b"previous good image").unwrap();

    let url = serve_truncated_body("/fw/fw.zip", b"trunc").await;
    let downloader = FirmwareDownloader::new(reqwest::Client::new(), temp_dir.path());
    let result = downloader.download("A6G209PF", &url).await;

    assert!(
        matches!(result, Err(DownloadError::Network { .. })),
        "Expected a network error, got: {result:?}"
    );
    assert_eq!(
        std::fs::read(model_dir.join("fw.zip")).unwrap(),
        b"previous good image",
        "a failed re-download must not touch the earlier copy"
    );
    assert!(!model_dir.join("fw.zip.part").exists());
    assert_eq!(std::fs::read_dir(&model_dir).unwrap().count(), 1);
}

#[tokio::test]
async fn test_truncated_download_without_earlier_copy_writes_nothing() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let url = serve_truncated_body("/fw/new.bin", b"half").await;
    let downloader = FirmwareDownloader::new(reqwest::Client::new(), temp_dir.path());
    let result = downloader.download("A6G209PF", &url).await;

    assert!(result.is_err());
    let model_dir = temp_dir.path().join("A6G209PF");
    assert!(model_dir.is_dir(), "model directory is created before the fetch");
    assert_eq!(std::fs::read_dir(&model_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn test_download_404_creates_no_file() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/fw/missing.zip"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let downloader = FirmwareDownloader::new(reqwest::Client::new(), temp_dir.path());
    let url = format!("{}/fw/missing.zip", mock_server.uri());
    let result = downloader.download("A6G209PF", &url).await;

    match result {
        Err(DownloadError::HttpStatus {
            status,
            url: err_url,
        }) => {
            assert_eq!(status, 404);
            assert!(err_url.contains("/fw/missing.zip"));
        }
        other => panic!("Expected HttpStatus(404), got: {other:?}"),
    }
    assert!(!temp_dir.path().join("A6G209PF").join("missing.zip").exists());
}

#[tokio::test]
async fn test_fetch_release_swallows_failure_and_paces() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/fw/broken.zip"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let downloader = FirmwareDownloader::new(reqwest::Client::new(), temp_dir.path());
    let pacer = Pacer::disabled();
    let release = FirmwareRelease {
        model: "A6G209PF".to_string(),
        version: String::new(),
        url: format!("{}/fw/broken.zip", mock_server.uri()),
    };

    assert!(downloader.fetch_release(&release, &pacer).await.is_none());
    assert_eq!(pacer.pauses(), 1, "failed downloads are still paced");
}

#[tokio::test]
async fn test_download_url_without_filename_is_rejected() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let downloader = FirmwareDownloader::new(reqwest::Client::new(), temp_dir.path());
    let url = format!("{}/fw/", mock_server.uri());
    let result = downloader.download("A6G209PF", &url).await;

    assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    assert!(
        mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .is_empty(),
        "no request should be sent for an unusable URL"
    );
    assert!(temp_dir.path().join("A6G209PF").is_dir());
}
