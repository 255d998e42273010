// cargo test -p downloader --test downloader_test

use downloader::{DownloadError, Downloader};
use tempfile::tempdir;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

/// Answers exactly one HTTP request with `status_line` and `body`.
async fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
    let mut response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(&body);

    serve_raw(response).await
}

/// Answers exactly one HTTP request with the bytes of `response`, then
/// closes the connection.
async fn serve_raw(response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = vec![];
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        socket.write_all(&response).await.unwrap();
        _ = socket.shutdown().await;
    });

    format!("http://{addr}/image.png")
}

#[tokio::test]
async fn test_download_finished() {
    let dir = tempdir().unwrap();
    let save_path = dir.path().join("target_image.jpg");
    let body: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();

    let url = serve_once("200 OK", body.clone()).await;
    let downloader = Downloader::new(url, &save_path);

    let mut last_progress = (0, None);
    let downloaded = downloader
        .start(|downloaded, total| last_progress = (downloaded, total))
        .await
        .unwrap();

    assert_eq!(downloaded, 5000);
    assert_eq!(std::fs::read(&save_path).unwrap(), body);
    assert_eq!(last_progress, (5000, Some(5000)));
    assert!(!dir.path().join("target_image.jpg.tmp").exists());
}

#[tokio::test]
async fn test_download_overwrites_previous_file() {
    let dir = tempdir().unwrap();
    let save_path = dir.path().join("target_image.jpg");
    std::fs::write(&save_path, b"old content").unwrap();

    let url = serve_once("200 OK", b"new".to_vec()).await;
    let downloaded = Downloader::new(url, &save_path).start(|_, _| {}).await.unwrap();

    assert_eq!(downloaded, 3);
    assert_eq!(std::fs::read(&save_path).unwrap(), b"new");
}

#[tokio::test]
async fn test_download_http_error_status() {
    let dir = tempdir().unwrap();
    let save_path = dir.path().join("target_image.jpg");

    let url = serve_once("404 Not Found", b"missing".to_vec()).await;
    let result = Downloader::new(url, &save_path).start(|_, _| {}).await;

    assert!(matches!(
        result,
        Err(DownloadError::StatusError { status: 404, .. })
    ));
    assert!(!save_path.exists());
}

#[tokio::test]
async fn test_download_connection_refused() {
    let dir = tempdir().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let downloader = Downloader::new(format!("http://{addr}/x.png"), dir.path().join("x.png"));
    let result = downloader.start(|_, _| {}).await;

    assert!(matches!(result, Err(DownloadError::RequestError { .. })));
}

#[tokio::test]
async fn test_download_truncated_body() {
    let dir = tempdir().unwrap();
    let save_path = dir.path().join("target_image.jpg");
    std::fs::write(&save_path, b"previous image").unwrap();

    let mut response =
        b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\n".to_vec();
    response.extend_from_slice(&[7u8; 10]);
    let url = serve_raw(response).await;

    let result = Downloader::new(url, &save_path).start(|_, _| {}).await;

    match result {
        Err(DownloadError::IncompleteDownload { downloaded, .. }) => assert!(downloaded <= 10),
        other => panic!("unexpected download result: {other:?}"),
    }
    assert!(!dir.path().join("target_image.jpg.tmp").exists());
    assert_eq!(std::fs::read(&save_path).unwrap(), b"previous image");
}
