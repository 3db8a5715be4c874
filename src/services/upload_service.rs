use std::path::{Path, PathBuf};

use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    extraction::DocumentKind,
    models::dto::request::GenerateQuestionsForm,
};

pub const FILE_FIELD: &str = "file";
const MAX_TEXT_FIELD_BYTES: usize = 1024;

/// An uploaded document parked in a temporary file.
///
/// Dropping it removes the file silently; [`StoredUpload::release`] does the
/// same but logs a failed removal.
#[derive(Debug)]
pub struct StoredUpload {
    pub file_name: String,
    pub content_type: String,
    pub kind: DocumentKind,
    pub size: usize,
    path: TempPath,
}

impl StoredUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> AppResult<Vec<u8>> {
        Ok(tokio::fs::read(self.path()).await?)
    }

    #[cfg(test)]
    pub(crate) fn from_temp_path(path: TempPath, file_name: &str, kind: DocumentKind, size: usize) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: "application/octet-stream".to_string(),
            kind,
            size,
            path,
        }
    }

    pub fn release(self) {
        let path = self.path.to_path_buf();
        match self.path.close() {
            Ok(()) => log::debug!("Removed upload {}", path.display()),
            Err(e) => log::warn!("Failed to remove upload {}: {}", path.display(), e),
        }
    }
}

#[derive(Debug, Default)]
pub struct UploadedForm {
    pub file: Option<StoredUpload>,
    pub fields: GenerateQuestionsForm,
}

pub struct UploadService {
    upload_dir: PathBuf,
    max_upload_bytes: usize,
}

impl UploadService {
    pub fn new(config: &Config) -> Self {
        Self {
            upload_dir: config.upload_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Drains the multipart body: the `file` field goes to a temp file, the
    /// generation options are collected as text, anything else is skipped.
    pub async fn receive(&self, mut payload: Multipart) -> AppResult<UploadedForm> {
        let mut form = UploadedForm::default();

        while let Some(mut field) = payload.try_next().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                FILE_FIELD => {
                    if form.file.is_some() {
                        return Err(AppError::UploadError(
                            "Only one file may be uploaded per request".to_string(),
                        ));
                    }
                    form.file = Some(self.store_file(&mut field).await?);
                }
                "numQuestions" => form.fields.num_questions = Some(read_text(&mut field).await?),
                "difficulty" => form.fields.difficulty = Some(read_text(&mut field).await?),
                "startPage" => form.fields.start_page = Some(read_text(&mut field).await?),
                "endPage" => form.fields.end_page = Some(read_text(&mut field).await?),
                other => {
                    log::debug!("Ignoring unexpected form field '{}'", other);
                    while field.try_next().await?.is_some() {}
                }
            }
        }

        Ok(form)
    }

    async fn store_file(&self, field: &mut Field) -> AppResult<StoredUpload> {
        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        // Disallowed types are turned away before anything touches the disk.
        let kind = DocumentKind::from_mime(&content_type)?;

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload")
            .to_string();

        let (std_file, path) = tempfile::Builder::new()
            .prefix("quizgen-upload-")
            .tempfile_in(&self.upload_dir)?
            .into_parts();
        let mut file = tokio::fs::File::from_std(std_file);

        let mut size = 0usize;
        while let Some(chunk) = field.try_next().await? {
            size += chunk.len();
            if size > self.max_upload_bytes {
                return Err(AppError::UploadError(format!(
                    "File exceeds the maximum upload size of {} bytes",
                    self.max_upload_bytes
                )));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        if size == 0 {
            return Err(AppError::UploadError("Uploaded file is empty".to_string()));
        }

        log::info!("Received '{}' ({}, {} bytes)", file_name, content_type, size);
        Ok(StoredUpload {
            file_name,
            content_type,
            kind,
            size,
            path,
        })
    }
}

async fn read_text(field: &mut Field) -> AppResult<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::UploadError(format!(
                "Form field '{}' is too long",
                field.name().unwrap_or_default()
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
