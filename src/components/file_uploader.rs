//! File Uploader Component
//!
//! Picker bound to an [`UploadController`]: shows the preview or the current
//! file, upload progress, and local validation errors.

use leptos::prelude::*;
use rest_resource::SlotState;

use crate::controllers::upload::picked_file;
use crate::controllers::UploadController;

#[component]
pub fn FileUploader(
    controller: UploadController,
    #[prop(into)] label: String,
    /// Already-saved file (e.g. the customer's current logo)
    #[prop(optional, into)]
    existing_url: Signal<Option<String>>,
    #[prop(into, default = String::new())] hint: String,
) -> impl IntoView {
    let slot = controller.slot();
    let preview = controller.preview_url();
    let accept = controller.accept();

    let status = move || {
        slot.with(|s| match s.state() {
            SlotState::Empty => None,
            SlotState::Uploading { file_name, .. } => Some(("upload-status uploading", format!("Uploading {}…", file_name))),
            SlotState::Ready { file_name, .. } => Some(("upload-status ready", format!("{} ready", file_name))),
            SlotState::Failed { error, .. } => Some(("upload-status error", error.clone())),
        })
    };
    let has_file = move || slot.with(|s| !matches!(s.state(), SlotState::Empty));
    let shown_image = move || preview.get().or_else(|| existing_url.get());

    view! {
        <div class="file-uploader">
            <span class="field-label">{label}</span>
            {move || shown_image().map(|src| view! { <img class="upload-preview" src=src alt="" /> })}
            <div class="upload-controls">
                <label class="btn btn-secondary">
                    "Choose file"
                    <input
                        type="file"
                        class="visually-hidden"
                        accept=accept
                        on:change=move |ev| {
                            if let Some(file) = picked_file(&ev) {
                                controller.select(file);
                            }
                        }
                    />
                </label>
                <Show when=has_file>
                    <button type="button" class="btn btn-link" on:click=move |_| controller.clear()>
                        "Remove"
                    </button>
                </Show>
            </div>
            {move || status().map(|(class, text)| view! { <p class=class>{text}</p> })}
            {(!hint.is_empty()).then(|| view! { <p class="field-hint">{hint}</p> })}
        </div>
    }
}
