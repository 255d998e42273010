pub mod downloader;

pub use downloader::Downloader;

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, DownloadError>;

#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request {url} failed. Error: {error}")]
    RequestError { error: reqwest::Error, url: String },

    #[error("HTTP request {url} returned status {status}")]
    StatusError { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Download incomplete: {downloaded} bytes received. Error: {error}")]
    IncompleteDownload { error: String, downloaded: u64 },

    #[error("Failed to create file: {}. Error: {error}", path.display())]
    FileCreateError { error: std::io::Error, path: PathBuf },
}
