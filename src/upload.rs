//! Upload validation and scoped temporary files

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::Multipart;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Accepted upload extensions, compared case-insensitively
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "wav", "mp3"];

/// Multipart field carrying the upload
pub const FILE_FIELD: &str = "file";

/// A validated upload held in memory
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Pull the `file` field out of a multipart body and validate its name.
///
/// Fails with `NoFileProvided`, `NoFileSelected`, `InvalidFileType` or
/// `EmptyFile` before any model is involved.
pub async fn read_upload(multipart: &mut Multipart) -> AppResult<UploadedFile> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(AppError::NoFileSelected);
        }
        if !allowed_file(&file_name) {
            tracing::warn!(file = %file_name, "Rejected upload with disallowed extension");
            return Err(AppError::InvalidFileType);
        }

        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(AppError::EmptyFile);
        }
        return Ok(UploadedFile { file_name, bytes });
    }

    Err(AppError::NoFileProvided)
}

pub fn allowed_file(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Reduce a client-supplied name to a safe single path component
pub fn secure_filename(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// A file on disk that is removed when dropped
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Write `bytes` under `dir` with a unique, sanitized name
    pub async fn write(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<Self> {
        let safe = secure_filename(file_name);
        let name = if safe.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            format!("{}_{}", Uuid::new_v4(), safe)
        };
        // guard first, so a failed write still removes any partial file
        let upload = Self { path: dir.join(name) };

        tokio::fs::write(&upload.path, bytes).await?;
        tracing::debug!(path = %upload.path.display(), bytes = bytes.len(), "Upload stored");

        Ok(upload)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Upload removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), "Failed to remove upload: {}", e),
        }
    }
}
