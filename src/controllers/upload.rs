//! Upload Controller
//!
//! Browser side of the two-phase upload: read the picked `File`, validate
//! it locally, park it in temp storage, and keep an object-URL preview alive
//! exactly as long as the slot holds it.

use leptos::prelude::*;
use leptos::task::spawn_local;
use rest_resource::{
    discard_temp, upload_temp, validate_file, ApiClient, FileMeta, TempUpload, Transport, UploadRules, UploadSlot,
};
use wasm_bindgen_futures::JsFuture;

use crate::context::use_app_context;
use crate::services::Api;

/// Object URL for a local file; revoked when dropped.
#[derive(Debug, PartialEq)]
pub struct BlobPreview {
    url: String,
}

impl BlobPreview {
    pub fn from_file(file: &web_sys::File) -> Option<Self> {
        web_sys::Url::create_object_url_with_blob(file)
            .ok()
            .map(|url| Self { url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for BlobPreview {
    fn drop(&mut self) {
        if web_sys::Url::revoke_object_url(&self.url).is_err() {
            tracing::debug!("[UPLOAD] could not revoke {}", self.url);
        }
    }
}

pub fn file_meta(file: &web_sys::File) -> FileMeta {
    FileMeta {
        name: file.name(),
        size: file.size() as u64,
        mime: file.type_(),
    }
}

pub async fn read_file_bytes(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Could not read {}: {:?}", file.name(), e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// First file of an `<input type="file">` change event
pub fn picked_file(ev: &web_sys::Event) -> Option<web_sys::File> {
    use wasm_bindgen::JsCast;
    let input = ev.target()?.dyn_into::<web_sys::HtmlInputElement>().ok()?;
    let file = input.files()?.get(0);
    // Allow picking the same file again after a clear.
    input.set_value("");
    file
}

/// One uploader slot bound to the temp-upload endpoint
#[derive(Clone, Copy)]
pub struct UploadController {
    slot: RwSignal<UploadSlot<BlobPreview>>,
    rules: StoredValue<UploadRules>,
    api: StoredValue<Api, LocalStorage>,
}

pub fn use_upload(rules: UploadRules) -> UploadController {
    let api = use_app_context().api();
    let controller = UploadController {
        slot: RwSignal::new(UploadSlot::default()),
        rules: StoredValue::new(rules),
        api: StoredValue::new_local(api),
    };
    // Anything still parked when the form goes away was never saved.
    on_cleanup(move || controller.clear());
    controller
}

impl UploadController {
    pub fn slot(&self) -> RwSignal<UploadSlot<BlobPreview>> {
        self.slot
    }

    pub fn accept(&self) -> String {
        self.rules.with_value(|r| r.accept_attr())
    }

    pub fn preview_url(&self) -> Signal<Option<String>> {
        let slot = self.slot;
        Signal::derive(move || slot.with(|s| s.preview().map(|p| p.url().to_string())))
    }

    pub fn temp_id(&self) -> Option<String> {
        self.slot.with_untracked(|s| s.temp_id().map(str::to_string))
    }

    pub fn select(&self, file: web_sys::File) {
        let meta = file_meta(&file);
        let rules = self.rules.get_value();
        let validation = validate_file(&meta, &rules);
        if !validation.is_valid {
            tracing::info!("[UPLOAD] rejected {}: {:?}", meta.name, validation.errors);
            let replaced = self.slot.try_update(|s| s.reject(&meta.name, &validation.errors)).flatten();
            self.discard(replaced);
            return;
        }

        let preview = if meta.effective_mime().is_some_and(|m| m.starts_with("image/")) {
            BlobPreview::from_file(&file)
        } else {
            None
        };
        let Some((ticket, replaced)) = self.slot.try_update(|s| s.start(&meta.name, preview)) else {
            return;
        };
        self.discard(replaced);

        let slot = self.slot;
        let Some(api) = self.api.try_get_value() else {
            return;
        };
        spawn_local(async move {
            let result = match read_file_bytes(&file).await {
                Ok(bytes) => upload_temp(&api, &meta, bytes).await.map_err(|e| e.message),
                Err(e) => Err(e),
            };
            match result {
                Ok(upload) => {
                    let stale = match slot.try_update(|s| s.complete(ticket, upload.clone())) {
                        Some(Ok(())) => None,
                        Some(Err(stale)) => Some(stale),
                        None => Some(upload),
                    };
                    if let Some(stale) = stale {
                        release_temp(&api, &stale.temp_id).await;
                    }
                }
                Err(e) => {
                    tracing::warn!("[UPLOAD] {} failed: {}", meta.name, e);
                    slot.try_update(|s| s.fail(ticket, e));
                }
            }
        });
    }

    /// Drop the file and discard its temp upload.
    pub fn clear(&self) {
        self.discard(self.slot.try_update(|s| s.clear()).flatten());
    }

    /// The owning form saved with this temp id; forget it without discarding.
    pub fn commit(&self) {
        self.slot.try_update(|s| {
            let _ = s.clear();
        });
    }

    fn discard(&self, upload: Option<TempUpload>) {
        let (Some(upload), Some(api)) = (upload, self.api.try_get_value()) else {
            return;
        };
        spawn_local(async move {
            release_temp(&api, &upload.temp_id).await;
        });
    }
}

/// Discard a temp upload nobody will save. Failures are only logged.
async fn release_temp<T: Transport>(api: &ApiClient<T>, temp_id: &str) -> bool {
    match discard_temp(api, temp_id).await {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("[UPLOAD] discard {} failed: {}", temp_id, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_resource::MockTransport;

    #[tokio::test]
    async fn test_release_temp_reports_failure_without_erroring() {
        let mock = MockTransport::new();
        mock.respond(200, r#"{"success":true}"#)
            .respond(500, r#"{"success":false,"message":"Storage unavailable"}"#);
        let api = crate::services::testing::signed_in_api(&mock);

        assert!(release_temp(&api, "tmp-1").await);
        assert!(!release_temp(&api, "tmp-2").await);

        let sent = mock.requests();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].url.ends_with("/tmp-1"));
        assert!(sent[1].url.ends_with("/tmp-2"));
    }
}
