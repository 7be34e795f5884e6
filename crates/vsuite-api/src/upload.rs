//! Multipart upload parsing.
//!
//! Every panel endpoint takes a multipart form with an optional `file` part
//! plus plain text control fields.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::Multipart;
use tempfile::NamedTempFile;
use tracing::debug;
use vsuite_models::{MediaAsset, MediaKind, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::security::sanitize_file_name;

/// Name of the multipart part carrying the media file.
pub const FILE_FIELD: &str = "file";

/// One uploaded file.
#[derive(Debug)]
pub struct Upload {
    pub file_name: String,
    pub kind: MediaKind,
    pub bytes: Bytes,
}

/// Parsed multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    file: Option<Upload>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Drain a multipart stream. An empty `file` part counts as no upload.
    pub async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == FILE_FIELD {
                let raw_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?;
                if bytes.is_empty() {
                    continue;
                }

                let file_name = sanitize_file_name(&raw_name).ok_or_else(|| {
                    ApiError::bad_request("Uploaded file must have a file name")
                })?;
                let kind = MediaKind::from_path(&file_name).ok_or_else(|| {
                    ApiError::UnsupportedMediaType(format!(
                        "{} (accepted: {}, {})",
                        file_name,
                        IMAGE_EXTENSIONS.join(", "),
                        VIDEO_EXTENSIONS.join(", ")
                    ))
                })?;

                debug!(file_name = %file_name, kind = %kind, bytes = bytes.len(), "Received upload");
                metrics::record_upload(kind.as_str(), bytes.len());
                form.file = Some(Upload {
                    file_name,
                    kind,
                    bytes,
                });
            } else if !name.is_empty() {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Parse a control field; absent or blank yields `None`.
    pub fn parse<T>(&self, name: &str) -> ApiResult<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.field(name)
            .map(|v| v.parse::<T>().map_err(|e| ApiError::Validation(e.to_string())))
            .transpose()
    }

    /// Parse a checkbox-style flag.
    pub fn flag(&self, name: &str, default: bool) -> ApiResult<bool> {
        match self.field(name).map(str::to_lowercase).as_deref() {
            None => Ok(default),
            Some("true" | "1" | "on" | "yes") => Ok(true),
            Some("false" | "0" | "off" | "no") => Ok(false),
            Some(other) => Err(ApiError::Validation(format!("Invalid {}: {}", name, other))),
        }
    }

    /// The uploaded image, if any.
    pub fn image(&self) -> ApiResult<Option<MediaAsset>> {
        match &self.file {
            None => Ok(None),
            Some(upload) if upload.kind == MediaKind::Image => Ok(Some(MediaAsset::from_bytes(
                upload.bytes.to_vec(),
                Some(upload.file_name.clone()),
            ))),
            Some(upload) => Err(ApiError::UnsupportedMediaType(format!(
                "{} is a video; this endpoint expects an image",
                upload.file_name
            ))),
        }
    }

    /// Write the uploaded video to a temp file that lives as long as the
    /// returned handle.
    pub async fn video_file(&self) -> ApiResult<Option<NamedTempFile>> {
        let upload = match &self.file {
            None => return Ok(None),
            Some(upload) if upload.kind == MediaKind::Video => upload,
            Some(upload) => {
                return Err(ApiError::UnsupportedMediaType(format!(
                    "{} is an image; this endpoint expects a video",
                    upload.file_name
                )))
            }
        };

        let suffix = std::path::Path::new(&upload.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();
        let file = tempfile::Builder::new()
            .prefix("vsuite-upload-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| ApiError::internal(format!("Failed to create temp file: {}", e)))?;
        tokio::fs::write(file.path(), &upload.bytes)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to store upload: {}", e)))?;

        Ok(Some(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(file: Option<(&str, MediaKind)>, fields: &[(&str, &str)]) -> UploadForm {
        UploadForm {
            file: file.map(|(name, kind)| Upload {
                file_name: name.to_string(),
                kind,
                bytes: Bytes::from_static(b"data"),
            }),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_parse_controls() {
        let f = form(None, &[("detail", "LOW"), ("max_results", " "), ("flag", "off")]);
        assert_eq!(
            f.parse::<vsuite_models::DetailLevel>("detail").unwrap(),
            Some(vsuite_models::DetailLevel::Low)
        );
        assert_eq!(f.parse::<u32>("max_results").unwrap(), None);
        assert!(!f.flag("flag", true).unwrap());
        assert!(f.flag("missing", true).unwrap());
        assert!(matches!(
            f.parse::<vsuite_models::FrameCount>("detail"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_image_kind_enforced() {
        assert!(form(None, &[]).image().unwrap().is_none());
        assert!(form(Some(("cat.png", MediaKind::Image)), &[]).image().unwrap().is_some());
        assert!(matches!(
            form(Some(("clip.mp4", MediaKind::Video)), &[]).image(),
            Err(ApiError::UnsupportedMediaType(_))
        ));
    }

    #[tokio::test]
    async fn test_video_written_with_extension() {
        let f = form(Some(("Clip.MOV", MediaKind::Video)), &[]);
        let file = f.video_file().await.unwrap().unwrap();
        assert!(file.path().to_string_lossy().ends_with(".mov"));
        assert_eq!(std::fs::read(file.path()).unwrap(), b"data");

        let err = form(Some(("cat.png", MediaKind::Image)), &[]).video_file().await;
        assert!(matches!(err, Err(ApiError::UnsupportedMediaType(_))));
    }
}
