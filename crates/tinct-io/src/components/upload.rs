//! File upload component with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use tinct_pipeline::ImageFormat;

/// MIME type implied by a filename's extension, if tinct can decode it.
///
/// The result is only a hint: the pipeline detects the real format from
/// the file's magic bytes.
#[must_use]
pub fn mime_hint_for(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    ImageFormat::from_extension(ext).map(ImageFormat::mime_type)
}

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Receives `(bytes, filename)` once a supported file has been read.
    on_upload: EventHandler<(Vec<u8>, String)>,
    /// Ignore picks and drops, e.g. after the session is closed.
    #[props(default)]
    disabled: bool,
}

/// Read the first of `files`, refusing names tinct cannot decode.
async fn read_first(files: Vec<FileData>) -> Option<Result<(Vec<u8>, String), String>> {
    let file = files.into_iter().next()?;
    let name = file.name();
    if mime_hint_for(&name).is_none() {
        return Some(Err(format!("{name} is not a PNG or JPEG file")));
    }
    Some(
        file.read_bytes()
            .await
            .map(|bytes| (bytes.to_vec(), name))
            .map_err(|e| format!("Could not read file: {e}")),
    )
}

/// Drop zone plus a "Choose File" button for PNG and JPEG images.
///
/// The last accepted filename or the last rejection is shown inside the
/// zone. Reading happens here; decoding is left to the session.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut hovering = use_signal(|| false);
    let mut status = use_signal(|| Option::<Result<String, String>>::None);
    let FileUploadProps {
        on_upload,
        disabled,
    } = props;

    let accept = move |files: Vec<FileData>| async move {
        if disabled {
            return;
        }
        match read_first(files).await {
            Some(Ok((bytes, name))) => {
                status.set(Some(Ok(name.clone())));
                on_upload.call((bytes, name));
            }
            Some(Err(message)) => status.set(Some(Err(message))),
            None => {}
        }
    };

    let on_pick = move |evt: FormEvent| async move {
        accept(evt.files()).await;
    };

    let on_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        hovering.set(false);
        accept(evt.files()).await;
    };

    let zone_colors = if hovering() {
        "border-[var(--border-accent)] bg-[var(--surface-active)]"
    } else {
        "border-[var(--border-muted)] bg-[var(--surface)]"
    };

    rsx! {
        div {
            class: "border-2 border-dashed rounded-lg p-6 text-center transition-colors {zone_colors}",
            ondragover: move |evt| {
                evt.prevent_default();
                hovering.set(!disabled);
            },
            ondragleave: move |_| hovering.set(false),
            ondrop: on_drop,

            if let Some(Ok(name)) = status() {
                p { class: "text-[var(--text-success)] mb-2", "Loaded {name}" }
            }
            if let Some(Err(message)) = status() {
                p { class: "text-[var(--text-error)] mb-2", "{message}" }
            }

            p { class: "text-[var(--text-secondary)] mb-3",
                "Drag an image here, or"
            }

            label {
                class: "inline-block px-4 py-2 bg-[var(--btn-primary)] hover:bg-[var(--btn-primary-hover)] rounded cursor-pointer text-white font-medium transition-colors",
                input {
                    r#type: "file",
                    accept: ".png,.jpg,.jpeg",
                    class: "hidden",
                    disabled: disabled,
                    onchange: on_pick,
                }
                "Choose File"
            }

            p { class: "text-[var(--muted)] text-sm mt-2",
                "PNG or JPEG"
            }
        }
    }
}
