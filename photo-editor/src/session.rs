use crate::{EditorError, EditorResult, ImageSource, config::Config};
use image::DynamicImage;
use image_filter::{Filter, FilterKind, FilterRegistry, ImageFilter, save};
use std::path::{Path, PathBuf};
use strum_macros::Display;

pub const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionState {
    Empty,
    Loaded,
    Previewing,
}

/// A filter result waiting to be confirmed or discarded.
#[derive(Debug, Clone)]
pub struct Preview {
    pub kind: FilterKind,
    pub image: DynamicImage,
}

/// One image being edited.
///
/// ```text
/// Empty --load--> Loaded --preview--> Previewing --confirm--> Loaded
///                   ^                     |
///                   +------discard--------+
/// ```
///
/// `load` is accepted from every state and drops any pending preview.
/// Failed operations leave the session exactly as it was.
#[derive(Debug)]
pub struct EditorSession {
    source: ImageSource,
    registry: FilterRegistry,
    current: Option<DynamicImage>,
    preview: Option<Preview>,
    source_path: Option<PathBuf>,
    default_extension: String,
    jpeg_quality: u8,
}

impl EditorSession {
    pub fn new(source: ImageSource) -> Self {
        Self {
            source,
            registry: FilterRegistry::new(),
            current: None,
            preview: None,
            source_path: None,
            default_extension: DEFAULT_EXTENSION.to_string(),
            jpeg_quality: save::DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let source = ImageSource::new(config.session_work_dir())
            .with_download_name(config.editor.download_name.clone());

        Self::new(source)
            .with_default_extension(config.editor.default_extension.clone())
            .with_jpeg_quality(config.editor.jpeg_quality)
    }

    pub fn with_default_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn state(&self) -> SessionState {
        match (&self.current, &self.preview) {
            (None, _) => SessionState::Empty,
            (Some(_), None) => SessionState::Loaded,
            (Some(_), Some(_)) => SessionState::Previewing,
        }
    }

    pub fn current(&self) -> Option<&DynamicImage> {
        self.current.as_ref()
    }

    pub fn pending_preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Replace the working image with the one `input` names.
    pub fn load(&mut self, input: &str) -> EditorResult<&DynamicImage> {
        let (path, image) = self.source.open(input)?;

        if let Some(preview) = self.preview.take() {
            log::debug!("dropping unconfirmed {} preview", preview.kind);
        }
        self.source_path = Some(path);

        Ok(self.current.insert(image))
    }

    /// Run the filter named by label or tag on the current image and hold
    /// the result as the pending preview.
    pub fn preview(&mut self, name: &str) -> EditorResult<&DynamicImage> {
        let filter: ImageFilter = self.registry.lookup(name)?.clone();
        self.preview_with(&filter)
    }

    pub fn preview_with(&mut self, filter: &impl Filter) -> EditorResult<&DynamicImage> {
        let current = self.current.as_ref().ok_or(EditorError::NoImage)?;
        let image = filter.process(current)?;

        let preview = self.preview.insert(Preview {
            kind: filter.kind(),
            image,
        });

        Ok(&preview.image)
    }

    /// Make the pending preview the current image.
    pub fn confirm(&mut self) -> EditorResult<FilterKind> {
        let preview = self.preview.take().ok_or(EditorError::NoPendingPreview)?;
        self.current = Some(preview.image);

        log::info!("{} applied", preview.kind);
        Ok(preview.kind)
    }

    /// Drop the pending preview. Returns whether there was one.
    pub fn discard(&mut self) -> bool {
        self.preview.take().is_some()
    }

    /// Write the current image to `path`. A path without an extension gets
    /// the configured default one. The pending preview is never saved.
    pub fn save(&self, path: impl AsRef<Path>) -> EditorResult<PathBuf> {
        let current = self.current.as_ref().ok_or(EditorError::NoImage)?;

        let mut path = path.as_ref().to_path_buf();
        if path.extension().is_none() {
            path.set_extension(&self.default_extension);
        }

        save::save_image(current, &path, self.jpeg_quality)?;
        log::info!("saved {}", path.display());

        Ok(path)
    }

    /// Apply the named filter to the current image and write the result
    /// next to the source file as `{stem}_{tag}.{ext}`. The session itself
    /// is left untouched.
    pub fn export(&self, name: &str) -> EditorResult<PathBuf> {
        let current = self.current.as_ref().ok_or(EditorError::NoImage)?;
        let source_path = self.source_path.as_deref().ok_or(EditorError::NoSourcePath)?;
        let filter = self.registry.lookup(name)?;

        Ok(filter.apply_and_save(current, source_path)?)
    }
}
