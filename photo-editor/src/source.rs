use crate::{EditorError, EditorResult};
use downloader::Downloader;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub const DEFAULT_DOWNLOAD_NAME: &str = "target_image.jpg";

/// Turns user input into a readable image file.
///
/// Input starting with `http://` or `https://` is downloaded into
/// `work_dir` under one fixed file name, so every download replaces the
/// previous one. Anything else is treated as a local path.
#[derive(Debug, Clone)]
pub struct ImageSource {
    work_dir: PathBuf,
    download_name: String,
}

impl ImageSource {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
        }
    }

    pub fn with_download_name(mut self, name: impl Into<String>) -> Self {
        self.download_name = name.into();
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn download_path(&self) -> PathBuf {
        self.work_dir.join(&self.download_name)
    }

    pub fn is_url(input: &str) -> bool {
        let input = input.trim_start();
        input.starts_with("http://") || input.starts_with("https://")
    }

    /// Resolve `input` to a local file holding a decodable PNG or JPEG.
    pub fn resolve(&self, input: &str) -> EditorResult<PathBuf> {
        self.open(input).map(|(path, _)| path)
    }

    /// Like [`ImageSource::resolve`] but also hands back the decoded image.
    pub fn open(&self, input: &str) -> EditorResult<(PathBuf, DynamicImage)> {
        let input = input.trim();
        if input.is_empty() {
            return Err(EditorError::NotFound(PathBuf::new()));
        }

        let path = if Self::is_url(input) {
            self.download(input)?
        } else {
            PathBuf::from(input)
        };

        let image = decode(&path)?;
        log::info!(
            "opened {} ({}x{} {:?})",
            path.display(),
            image.width(),
            image.height(),
            image.color()
        );

        Ok((path, image))
    }

    fn download(&self, url: &str) -> EditorResult<PathBuf> {
        fs::create_dir_all(&self.work_dir)?;

        let save_path = self.download_path();
        let downloader = Downloader::new(url, &save_path);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let downloaded = runtime.block_on(downloader.start(|downloaded, total| match total {
            Some(total) if total > 0 => {
                log::trace!("{url}: {downloaded}/{total} bytes");
            }
            _ => log::trace!("{url}: {downloaded} bytes"),
        }))?;
        log::debug!("{url} saved to {} ({downloaded} bytes)", save_path.display());

        Ok(save_path)
    }
}

/// Check that `path` names a PNG or JPEG file that decodes.
pub fn validate(path: impl AsRef<Path>) -> EditorResult<()> {
    decode(path.as_ref()).map(|_| ())
}

fn decode(path: &Path) -> EditorResult<DynamicImage> {
    if !path.exists() {
        return Err(EditorError::NotFound(path.to_path_buf()));
    }

    let invalid = |reason: String| EditorError::InvalidImage {
        path: path.to_path_buf(),
        reason,
    };

    if !path.is_file() {
        return Err(invalid("not a regular file".to_string()));
    }

    let reader = ImageReader::open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => EditorError::NotFound(path.to_path_buf()),
            _ => EditorError::Io(e),
        })?
        .with_guessed_format()?;

    match reader.format() {
        Some(ImageFormat::Png | ImageFormat::Jpeg) => {}
        Some(format) => return Err(invalid(format!("unsupported format {format:?}"))),
        None => return Err(invalid("unknown format".to_string())),
    }

    let image = reader.decode().map_err(|e| invalid(e.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(invalid("image has no pixels".to_string()));
    }

    Ok(image)
}
