//! Content Ingestion Pipeline
//!
//! Two stages:
//! 1. **Preview**: on file selection, build something displayable. Images and
//!    videos become an inline data URL; anything else is summarised by name
//!    and size. Never touches the network.
//! 2. **Submission**: base64-encode the bytes off the async executor and send
//!    them with the draft's metadata.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::api::UploadRequest;
use crate::app::App;
use crate::error::{AppError, Operation};
use crate::model::MemoryType;
use crate::router::Section;
use crate::sync::Pipeline;
use crate::view::{Notice, UploadView};

/// Text shown before any file is chosen
pub const PREVIEW_PLACEHOLDER: &str = "Select a file to preview";

/// Inline previews are capped to this height
pub const PREVIEW_MAX_HEIGHT_PX: u32 = 300;

const DEFAULT_MIME: &str = "application/octet-stream";

/// Guess a MIME type from a file extension
pub fn guess_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("txt" | "md") => "text/plain",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        _ => DEFAULT_MIME,
    }
}

/// A file picked for upload
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    mime: String,
    bytes: Arc<Vec<u8>>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: Arc::new(bytes),
        }
    }

    /// Read a file from disk; without `mime` the type is guessed from the extension
    pub async fn from_path(path: &Path, mime: Option<&str>) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime.unwrap_or_else(|| guess_mime(path));

        tracing::debug!(file = %name, mime, size = bytes.len(), "Selected file");
        Ok(Self::new(name, mime, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Size in kilobytes, two decimals
    pub fn size_kb(&self) -> String {
        format!("{:.2}", self.bytes.len() as f64 / 1024.0)
    }

    /// Part of the MIME type before the slash
    pub fn media_category(&self) -> &str {
        self.mime.split('/').next().unwrap_or_default()
    }

    fn is_inline(&self) -> bool {
        matches!(self.media_category(), "image" | "video")
    }

    /// Standard base64 of the contents, computed on the blocking pool
    pub async fn encode(&self) -> Result<String, AppError> {
        let bytes = Arc::clone(&self.bytes);
        tokio::task::spawn_blocking(move || STANDARD.encode(bytes.as_slice()))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "File encoding task failed");
                AppError::validation("Could not read the selected file")
            })
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Displayable representation of the selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Placeholder,
    /// Rendered inline, at most [`PREVIEW_MAX_HEIGHT_PX`] high and full width
    Inline { mime: String, data_url: String },
    Summary { name: String, size_kb: String },
}

impl Preview {
    pub async fn build(file: &SelectedFile) -> Self {
        if file.is_inline() {
            match file.encode().await {
                Ok(data) => {
                    return Preview::Inline {
                        mime: file.mime().to_string(),
                        data_url: format!("data:{};base64,{}", file.mime(), data),
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Inline preview unavailable"),
            }
        }

        Preview::Summary {
            name: file.name().to_string(),
            size_kb: file.size_kb(),
        }
    }
}

/// Upload form contents; never persisted
#[derive(Debug, Clone, Default)]
pub struct UploadDraft {
    pub memory_type: MemoryType,
    pub description: String,
    pub file: Option<SelectedFile>,
}

impl UploadDraft {
    async fn build_request(&self, file: &SelectedFile) -> Result<UploadRequest, AppError> {
        Ok(UploadRequest {
            memory_type: self.memory_type.to_string(),
            description: self.description.clone(),
            file_data: file.encode().await?,
            file_name: file.name().to_string(),
            file_type: file.mime().to_string(),
        })
    }
}

impl App {
    /// Select a file and render its preview
    pub async fn select_file(&mut self, file: SelectedFile) {
        let preview = Preview::build(&file).await;
        self.view.upload.file_name = Some(file.name().to_string());
        self.view.upload.preview = preview;
        self.draft.file = Some(file);
        self.publish();
    }

    pub fn set_upload_details(&mut self, memory_type: MemoryType, description: impl Into<String>) {
        self.draft.memory_type = memory_type.clone();
        self.draft.description = description.into();
        self.view.upload.memory_type = memory_type;
        self.view.upload.description = self.draft.description.clone();
    }

    /// Submit the current draft
    ///
    /// On failure the form is kept so the user can retry.
    pub async fn submit_upload(&mut self) {
        self.view.notice = None;

        let Some(file) = self.draft.file.clone() else {
            return self.fail(
                Operation::Upload,
                AppError::validation("Please select a file to upload"),
            );
        };
        let Some(token) = self.session.token().map(str::to_owned) else {
            return self.fail(
                Operation::Upload,
                AppError::validation("You need to be logged in to upload memories"),
            );
        };

        let request = match self.draft.build_request(&file).await {
            Ok(request) => request,
            Err(e) => return self.fail(Operation::Upload, e),
        };

        tracing::info!(file = %file.name(), kind = %request.memory_type, size = file.len(), "Uploading memory");
        match self.api.upload(&token, &request).await {
            Ok(response) => {
                tracing::info!(proof = response.proof_hash.as_deref().unwrap_or(""), "Memory uploaded");
                self.draft = UploadDraft::default();
                self.view.upload = UploadView::default();
                self.view.notice = Some(Notice::success(
                    "Memory uploaded successfully! You earned Ahmiyat coins.",
                ));
                self.router.navigate(Section::Dashboard, true);
                self.sync(&[Pipeline::Memories, Pipeline::Transactions]).await;
                self.publish();
            }
            Err(e) => self.fail(Operation::Upload, e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCredentialStore;
    use crate::testing::{Call, FakeApi};
    use crate::api::ApiError;
    use tempfile::TempDir;

    fn app(api: &Arc<FakeApi>) -> App {
        App::new(api.clone(), Arc::new(MemoryCredentialStore::new()))
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("clip.mp4")), "video/mp4");
        assert_eq!(guess_mime(Path::new("paper.pdf")), "application/pdf");
        assert_eq!(guess_mime(Path::new("archive")), DEFAULT_MIME);
    }

    #[tokio::test]
    async fn test_preview_inline_for_images() {
        let file = SelectedFile::new("dot.png", "image/png", vec![1, 2, 3]);
        assert_eq!(
            Preview::build(&file).await,
            Preview::Inline {
                mime: "image/png".to_string(),
                data_url: "data:image/png;base64,AQID".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_preview_summary_for_documents() {
        let file = SelectedFile::new("notes.txt", "text/plain", vec![0; 1536]);
        assert_eq!(
            Preview::build(&file).await,
            Preview::Summary {
                name: "notes.txt".to_string(),
                size_kb: "1.50".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_from_path_reads_and_guesses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meme.gif");
        std::fs::write(&path, b"GIF89a").unwrap();

        let file = SelectedFile::from_path(&path, None).await.unwrap();
        assert_eq!(file.name(), "meme.gif");
        assert_eq!(file.mime(), "image/gif");
        assert_eq!(file.len(), 6);

        let file = SelectedFile::from_path(&path, Some("application/x-custom")).await.unwrap();
        assert_eq!(file.mime(), "application/x-custom");
    }

    #[tokio::test]
    async fn test_upload_without_file_issues_no_request() {
        let api = Arc::new(FakeApi::new());
        let mut app = app(&api);
        app.login("A1", "k").await;
        api.clear_calls();

        app.submit_upload().await;

        assert!(api.calls().is_empty());
        assert_eq!(
            app.view().notice,
            Some(Notice::error("Please select a file to upload"))
        );
    }

    #[tokio::test]
    async fn test_upload_without_session_issues_no_request() {
        let api = Arc::new(FakeApi::new());
        let mut app = app(&api);
        app.select_file(SelectedFile::new("a.txt", "text/plain", b"hi".to_vec()))
            .await;

        app.submit_upload().await;

        assert!(api.calls().is_empty());
        assert_eq!(
            app.view().notice,
            Some(Notice::error("You need to be logged in to upload memories"))
        );
    }

    #[tokio::test]
    async fn test_successful_upload_resets_form_and_refreshes() {
        let api = Arc::new(FakeApi::new());
        let mut app = app(&api);
        app.login("A1", "k").await;
        app.navigate(Section::Upload).await;
        app.set_upload_details(MemoryType::Meme, "cat");
        app.select_file(SelectedFile::new("cat.txt", "text/plain", b"meow".to_vec()))
            .await;
        api.clear_calls();

        app.submit_upload().await;

        let calls = api.calls();
        assert_eq!(
            calls[0],
            Call::Upload {
                token: "T1".to_string(),
                request: UploadRequest {
                    memory_type: "MEME".to_string(),
                    description: "cat".to_string(),
                    file_data: "bWVvdw==".to_string(),
                    file_name: "cat.txt".to_string(),
                    file_type: "text/plain".to_string(),
                },
            }
        );
        assert!(calls.contains(&Call::Memories("T1".to_string())));
        assert!(calls.contains(&Call::Transactions("T1".to_string())));

        let view = app.view();
        assert_eq!(view.section, Section::Dashboard);
        assert_eq!(view.upload.preview, Preview::Placeholder);
        assert_eq!(view.upload.file_name, None);
        assert!(!view.has_error());
    }

    #[tokio::test]
    async fn test_rejected_upload_keeps_draft() {
        let api = Arc::new(FakeApi::new());
        api.script(|s| {
            s.upload = Err(ApiError::Rejected {
                status: 413,
                detail: Some("file too large".to_string()),
            })
        });
        let mut app = app(&api);
        app.login("A1", "k").await;
        app.select_file(SelectedFile::new("big.bin", DEFAULT_MIME, vec![7; 10]))
            .await;

        app.submit_upload().await;

        assert_eq!(
            app.view().notice,
            Some(Notice::error("Upload failed: file too large"))
        );
        assert_eq!(app.view().upload.file_name.as_deref(), Some("big.bin"));
    }
}
