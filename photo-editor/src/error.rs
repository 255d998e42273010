use image_filter::ImageFilterError;
use std::path::PathBuf;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a valid image: {}. Error: {reason}", path.display())]
    InvalidImage { path: PathBuf, reason: String },

    #[error("Download failed. Error: {0}")]
    Download(#[from] downloader::DownloadError),

    #[error(transparent)]
    Filter(#[from] ImageFilterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No image loaded")]
    NoImage,

    #[error("No filter preview to confirm")]
    NoPendingPreview,

    #[error("The current image has no source file")]
    NoSourcePath,

    #[error("Invalid command: {0}")]
    Command(String),
}
