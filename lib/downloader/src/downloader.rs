use crate::{DownloadError, Result};
use futures::StreamExt;
use reqwest::{Client, Response};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Streams one URL into one file.
///
/// The body is written to `{save_path}.tmp` and renamed onto `save_path`
/// only when it is complete, so an interrupted download never replaces a
/// previous good file. An existing `save_path` is overwritten.
///
/// A body shorter than the announced `Content-Length` fails with
/// [`DownloadError::IncompleteDownload`]. On any failure after the request
/// succeeded the temporary file is removed.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Downloader {
    url: String,
    save_path: PathBuf,
}

impl Downloader {
    pub fn new(url: impl Into<String>, save_path: impl Into<PathBuf>) -> Downloader {
        Downloader {
            url: url.into(),
            save_path: save_path.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Returns the number of bytes written.
    ///
    /// `progress_cb` receives the bytes written so far and the announced
    /// body length, when the server sent one.
    pub async fn start(&self, progress_cb: impl FnMut(u64, Option<u64>)) -> Result<u64> {
        let response =
            Client::new()
                .get(&self.url)
                .send()
                .await
                .map_err(|e| DownloadError::RequestError {
                    error: e,
                    url: self.url.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::StatusError {
                url: self.url.to_string(),
                status: status.as_u16(),
            });
        }

        let tmp_filepath = tmp_path(&self.save_path);
        let downloaded = match self.write_body(response, &tmp_filepath, progress_cb).await {
            Ok(downloaded) => downloaded,
            Err(e) => {
                log::warn!("download of {} failed: {e}", self.url);
                _ = fs::remove_file(&tmp_filepath);
                return Err(e);
            }
        };

        fs::rename(&tmp_filepath, &self.save_path)?;
        log::debug!("download of {} finished, {downloaded} bytes", self.url);

        Ok(downloaded)
    }

    async fn write_body(
        &self,
        response: Response,
        tmp_filepath: &Path,
        mut progress_cb: impl FnMut(u64, Option<u64>),
    ) -> Result<u64> {
        let total_size = response.content_length();
        log::info!(
            "downloading {} -> {} ({} bytes announced)",
            self.url,
            self.save_path.display(),
            total_size.map_or("no".to_string(), |n| n.to_string())
        );

        let save_file =
            fs::File::create(tmp_filepath).map_err(|e| DownloadError::FileCreateError {
                error: e,
                path: tmp_filepath.to_path_buf(),
            })?;
        let mut writer = BufWriter::new(save_file);

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DownloadError::IncompleteDownload {
                error: e.to_string(),
                downloaded,
            })?;
            writer.write_all(&chunk)?;

            downloaded += chunk.len() as u64;
            progress_cb(downloaded, total_size);
        }

        writer.flush()?;
        Ok(downloaded)
    }
}

fn tmp_path(save_path: &Path) -> PathBuf {
    let mut name = save_path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
