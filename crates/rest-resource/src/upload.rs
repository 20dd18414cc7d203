//! File Uploads
//!
//! Local validation, the temp-upload endpoint (phase one of a two-phase
//! save) and [`UploadSlot`], which tracks one uploader's state and owns its
//! preview. Replacing or clearing the slot drops the old preview, so a
//! preview type that releases resources in `Drop` is released on time.

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::list_state::RequestGeneration;
use crate::transport::{FormPart, Transport};

pub const UPLOAD_TEMP_PATH: &str = "uploads/temp";

/// What is known about a picked file before reading it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    /// Browser-reported MIME type; may be empty
    pub mime: String,
}

impl FileMeta {
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// Reported MIME type, or one guessed from the extension.
    pub fn effective_mime(&self) -> Option<String> {
        if !self.mime.trim().is_empty() {
            return Some(self.mime.trim().to_ascii_lowercase());
        }
        self.extension()
            .and_then(|ext| mime_for_extension(&ext))
            .map(str::to_string)
    }
}

/// Per-uploader limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRules {
    pub max_size: u64,
    /// Exact types (`image/png`) or wildcards (`image/*`). Empty allows all.
    pub allowed_types: Vec<String>,
}

impl UploadRules {
    pub fn new(max_size: u64, allowed_types: &[&str]) -> Self {
        Self {
            max_size,
            allowed_types: allowed_types.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Value for the file input's `accept` attribute
    pub fn accept_attr(&self) -> String {
        self.allowed_types.join(",")
    }

    fn allows(&self, mime: &str) -> bool {
        self.allowed_types.is_empty()
            || self.allowed_types.iter().any(|allowed| {
                let allowed = allowed.trim().to_ascii_lowercase();
                match allowed.strip_suffix("/*") {
                    Some(family) => mime.split('/').next() == Some(family),
                    None => allowed == mime,
                }
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

pub fn validate_file(file: &FileMeta, rules: &UploadRules) -> FileValidation {
    let mut errors = Vec::new();

    if file.size > rules.max_size {
        errors.push(format!(
            "{} is {}, larger than the {} limit",
            file.name,
            format_file_size(file.size),
            format_file_size(rules.max_size)
        ));
    }
    match file.effective_mime() {
        Some(mime) if rules.allows(&mime) => {}
        Some(mime) => errors.push(format!("{} files are not allowed", mime)),
        None if rules.allowed_types.is_empty() => {}
        None => errors.push(format!("Cannot determine the type of {}", file.name)),
    }

    FileValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Human-readable byte count: `512 B`, `1.5 KB`, `5 MB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, UNITS[unit])
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    Some(match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "csv" => "text/csv",
        "txt" => "text/plain",
        _ => return None,
    })
}

/// Handle returned by the temp-upload endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempUpload {
    pub temp_id: String,
    pub url: String,
}

/// Phase one: park the file in temporary storage.
pub async fn upload_temp<T: Transport>(
    api: &ApiClient<T>,
    file: &FileMeta,
    bytes: Vec<u8>,
) -> Result<TempUpload, ApiError> {
    let part = FormPart::File {
        name: "file".to_string(),
        file_name: file.name.clone(),
        mime: file
            .effective_mime()
            .unwrap_or_else(|| "application/octet-stream".to_string()),
        bytes,
    };
    let upload = api
        .post_multipart::<TempUpload>(UPLOAD_TEMP_PATH, vec![part])
        .await?
        .into_data()?;
    tracing::debug!("temp upload {} stored", upload.temp_id);
    Ok(upload)
}

/// Best-effort removal of an abandoned temp upload.
pub async fn discard_temp<T: Transport>(api: &ApiClient<T>, temp_id: &str) -> Result<(), ApiError> {
    api.delete(&format!("{}/{}", UPLOAD_TEMP_PATH, temp_id))
        .await?
        .into_ack()?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotState<P> {
    Empty,
    Uploading {
        file_name: String,
        preview: Option<P>,
    },
    Ready {
        file_name: String,
        upload: TempUpload,
        preview: Option<P>,
    },
    Failed {
        file_name: String,
        error: String,
    },
}

/// State of one uploader
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSlot<P> {
    generation: RequestGeneration,
    state: SlotState<P>,
}

impl<P> Default for UploadSlot<P> {
    fn default() -> Self {
        Self {
            generation: RequestGeneration::default(),
            state: SlotState::Empty,
        }
    }
}

impl<P> UploadSlot<P> {
    pub fn state(&self) -> &SlotState<P> {
        &self.state
    }

    /// Begin uploading a new file. Returns the ticket to complete with and
    /// any ready upload that was replaced (to be discarded server-side).
    pub fn start(&mut self, file_name: &str, preview: Option<P>) -> (u64, Option<TempUpload>) {
        let replaced = self.take_ready();
        self.state = SlotState::Uploading {
            file_name: file_name.to_string(),
            preview,
        };
        (self.generation.issue(), replaced)
    }

    /// Finish an upload. A superseded upload is handed back as `Err` so the
    /// caller can discard it.
    pub fn complete(&mut self, ticket: u64, upload: TempUpload) -> Result<(), TempUpload> {
        if !self.generation.is_current(ticket) {
            return Err(upload);
        }
        match std::mem::replace(&mut self.state, SlotState::Empty) {
            SlotState::Uploading { file_name, preview } => {
                self.state = SlotState::Ready { file_name, upload, preview };
                Ok(())
            }
            other => {
                self.state = other;
                Err(upload)
            }
        }
    }

    pub fn fail(&mut self, ticket: u64, error: impl Into<String>) {
        if !self.generation.is_current(ticket) {
            return;
        }
        let file_name = match &self.state {
            SlotState::Uploading { file_name, .. } => file_name.clone(),
            _ => return,
        };
        self.state = SlotState::Failed {
            file_name,
            error: error.into(),
        };
    }

    /// Reject a file locally without uploading it.
    pub fn reject(&mut self, file_name: &str, errors: &[String]) -> Option<TempUpload> {
        let replaced = self.take_ready();
        self.generation.invalidate();
        self.state = SlotState::Failed {
            file_name: file_name.to_string(),
            error: errors.join("; "),
        };
        replaced
    }

    /// Reset to empty; returns a ready upload that should be discarded.
    pub fn clear(&mut self) -> Option<TempUpload> {
        let replaced = self.take_ready();
        self.generation.invalidate();
        self.state = SlotState::Empty;
        replaced
    }

    /// Temp id to send with the owning form, once the upload is ready.
    pub fn temp_id(&self) -> Option<&str> {
        match &self.state {
            SlotState::Ready { upload, .. } => Some(upload.temp_id.as_str()),
            _ => None,
        }
    }

    pub fn preview(&self) -> Option<&P> {
        match &self.state {
            SlotState::Uploading { preview, .. } | SlotState::Ready { preview, .. } => preview.as_ref(),
            _ => None,
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.state, SlotState::Uploading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SlotState::Failed { error, .. } => Some(error.as_str()),
            _ => None,
        }
    }

    fn take_ready(&mut self) -> Option<TempUpload> {
        match &self.state {
            SlotState::Ready { upload, .. } => Some(upload.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const MB: u64 = 1024 * 1024;

    fn image_rules() -> UploadRules {
        UploadRules::new(5 * MB, &["image/jpeg", "image/png", "application/pdf"])
    }

    fn file(name: &str, size: u64, mime: &str) -> FileMeta {
        FileMeta { name: name.into(), size, mime: mime.into() }
    }

    #[test]
    fn test_valid_files_pass() {
        for f in [
            file("logo.png", 200 * 1024, "image/png"),
            file("scan.pdf", 5 * MB, "application/pdf"),
            file("photo.JPG", MB, ""),
        ] {
            let result = validate_file(&f, &image_rules());
            assert!(result.is_valid, "{:?} should be valid: {:?}", f, result.errors);
            assert!(result.errors.is_empty());
        }
    }

    #[test]
    fn test_oversized_file_is_rejected() {
        let result = validate_file(&file("big.png", 6 * MB, "image/png"), &image_rules());
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("6 MB"));
    }

    #[test]
    fn test_disallowed_type_is_rejected() {
        let result = validate_file(&file("run.exe", 1024, "application/x-msdownload"), &image_rules());
        assert!(!result.is_valid);
        assert!(!result.errors.is_empty());

        let unknown = validate_file(&file("blob", 1024, ""), &image_rules());
        assert!(!unknown.is_valid);
    }

    #[test]
    fn test_zero_byte_file_within_limits_is_valid() {
        let rules = UploadRules::new(5 * MB, &["text/plain"]);
        let result = validate_file(&file("notes.txt", 0, "text/plain"), &rules);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_wildcard_family() {
        let rules = UploadRules::new(MB, &["image/*"]);
        assert!(validate_file(&file("a.webp", 10, "image/webp"), &rules).is_valid);
        assert!(!validate_file(&file("a.pdf", 10, "application/pdf"), &rules).is_valid);
        assert_eq!(rules.accept_attr(), "image/*");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * MB), "5 MB");
    }

    /// Counts drops, standing in for a revocable object URL.
    #[derive(Debug, PartialEq)]
    struct Preview(Rc<RefCell<Vec<String>>>, String);

    impl Drop for Preview {
        fn drop(&mut self) {
            self.0.borrow_mut().push(self.1.clone());
        }
    }

    fn upload(id: &str) -> TempUpload {
        TempUpload { temp_id: id.into(), url: format!("https://cdn.test/tmp/{}", id) }
    }

    #[test]
    fn test_slot_lifecycle_and_preview_release() {
        let released = Rc::new(RefCell::new(Vec::new()));
        let mut slot = UploadSlot::default();

        let (t1, _) = slot.start("a.png", Some(Preview(released.clone(), "blob:a".into())));
        assert!(slot.is_uploading());
        slot.complete(t1, upload("tmp-a")).unwrap();
        assert_eq!(slot.temp_id(), Some("tmp-a"));

        // replacing hands back the old upload and releases its preview
        let (_t2, replaced) = slot.start("b.png", Some(Preview(released.clone(), "blob:b".into())));
        assert_eq!(replaced, Some(upload("tmp-a")));
        assert_eq!(*released.borrow(), vec!["blob:a".to_string()]);

        slot.clear();
        assert_eq!(*released.borrow(), vec!["blob:a".to_string(), "blob:b".to_string()]);
        assert_eq!(*slot.state(), SlotState::Empty);
    }

    #[test]
    fn test_superseded_upload_is_returned() {
        let mut slot: UploadSlot<String> = UploadSlot::default();
        let (t1, _) = slot.start("a.png", None);
        let (t2, _) = slot.start("b.png", None);

        assert_eq!(slot.complete(t1, upload("tmp-a")), Err(upload("tmp-a")));
        slot.fail(t1, "late failure");
        assert!(slot.is_uploading());

        slot.complete(t2, upload("tmp-b")).unwrap();
        assert_eq!(slot.temp_id(), Some("tmp-b"));
    }

    #[test]
    fn test_reject_records_errors() {
        let mut slot: UploadSlot<String> = UploadSlot::default();
        slot.reject("huge.png", &["too big".to_string(), "bad type".to_string()]);
        assert_eq!(slot.error(), Some("too big; bad type"));
    }
}
