use std::path::{Path, PathBuf};

/// `{stem}_{tag}{.ext}` next to `original`.
///
/// The same path and tag always give the same name, so repeated applies
/// overwrite each other.
pub fn output_path(original: impl AsRef<Path>, tag: &str) -> PathBuf {
    let original = original.as_ref();
    let stem = original
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let name = match original.extension() {
        Some(ext) => format!("{stem}_{tag}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{tag}"),
    };

    original.with_file_name(name)
}
