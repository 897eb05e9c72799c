use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdPower;
use tinct_io::components::mime_hint_for;
use tinct_io::{BlobUrl, EffectControls, EffectPicker, FileUpload, PreviewPane};
use tinct_pipeline::{
    EditorError, EffectId, EffectKind, EncodedImage, Event, Outcome, Session, SessionConfig,
    UploadSource,
};

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    dioxus::launch(app);
}

/// Signals the UI redraws from after each dispatched event.
#[derive(Clone, Copy)]
struct View {
    base: Signal<Option<BlobUrl>>,
    output: Signal<Option<BlobUrl>>,
    caption: Signal<Option<String>>,
    error: Signal<Option<String>>,
    closed: Signal<bool>,
}

impl View {
    fn show_error(mut self, message: String) {
        log::warn!("{message}");
        self.error.set(Some(message));
    }

    /// Replace a displayed image; the previous Blob URL is revoked on drop.
    fn show(self, mut slot: Signal<Option<BlobUrl>>, image: &EncodedImage) {
        match BlobUrl::from_encoded(image) {
            Ok(url) => slot.set(Some(url)),
            Err(e) => self.show_error(format!("Failed to display image: {e}")),
        }
    }

    fn apply(mut self, outcome: &Outcome) {
        self.error.set(None);
        match outcome {
            Outcome::Loaded {
                original,
                preview,
                output,
            } => {
                self.show(self.base, preview);
                self.show(self.output, output);
                self.caption.set(Some(format!(
                    "{original} scaled to {}",
                    preview.dimensions
                )));
            }
            Outcome::EffectAdded { output, .. } | Outcome::ValueChanged { output } => {
                if let Some(output) = output {
                    self.show(self.output, output);
                }
            }
            Outcome::Closed => {
                self.base.set(None);
                self.output.set(None);
                self.caption.set(None);
                self.closed.set(true);
            }
        }
    }
}

/// Feed one event to the session and update the view with the result.
fn dispatch(mut session: Signal<Result<Session, EditorError>>, view: View, event: Event) {
    let result = match session.write().as_mut() {
        Ok(s) => s.dispatch(event).map_err(|e| e.to_string()),
        Err(e) => Err(format!("The editor failed to start: {e}")),
    };
    match result {
        Ok(outcome) => view.apply(&outcome),
        Err(message) => view.show_error(message),
    }
}

/// Root application component.
///
/// Owns the single [`Session`] and translates component callbacks into
/// session events.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    let session = use_signal(|| {
        Session::new(SessionConfig::default())
            .inspect_err(|e| log::error!("failed to create session: {e}"))
    });
    let view = View {
        base: use_signal(|| None),
        output: use_signal(|| None),
        caption: use_signal(|| None),
        error: use_signal(|| session.peek().as_ref().err().map(ToString::to_string)),
        closed: use_signal(|| false),
    };
    let mut processing = use_signal(|| false);

    // --- File upload handler ---
    // Decoding a large photo blocks the thread, so yield first to let the
    // "Processing..." state paint.
    let on_upload = move |(bytes, name): (Vec<u8>, String)| {
        processing.set(true);
        spawn(async move {
            gloo_timers::future::TimeoutFuture::new(0).await;
            let upload = UploadSource::Bytes {
                bytes,
                mime_hint: mime_hint_for(&name).map(str::to_owned),
            };
            dispatch(session, view, Event::Upload(upload));
            processing.set(false);
        });
    };

    let on_add = move |kind: EffectKind| {
        dispatch(
            session,
            view,
            Event::AddEffect {
                kind: kind.name().to_owned(),
            },
        );
    };

    let on_change = move |(id, value): (EffectId, f64)| {
        dispatch(session, view, Event::SetValue { id, value });
    };

    let on_close = move |_: MouseEvent| {
        dispatch(session, view, Event::Shutdown);
    };

    // --- Derived state ---
    let catalog = session
        .read()
        .as_ref()
        .map(|s| s.catalog().clone())
        .unwrap_or_default();
    let controls = session
        .read()
        .as_ref()
        .map(Session::controls)
        .unwrap_or_default();
    let urls = view
        .base
        .read()
        .as_ref()
        .zip(view.output.read().as_ref())
        .map(|(base, output)| (base.as_str().to_owned(), output.as_str().to_owned()));
    let closed = (view.closed)();
    let unavailable = closed || session.read().is_err();

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/theme.css") }
        style { dangerous_inner_html: include_str!("../assets/utilities.css") }

        div { class: "min-h-screen bg-(--bg) text-(--text) flex flex-col",
            header { class: "px-6 py-4 border-b border-(--border) flex items-center justify-between",
                div {
                    h1 { class: "text-2xl title-brand", "tinct" }
                    p { class: "text-(--muted) text-sm",
                        "Stack brightness, contrast, and edge detection over a live preview"
                    }
                }
                button {
                    class: "inline-flex items-center gap-1 px-3 py-1 rounded border border-(--border)
                            text-sm disabled:opacity-50",
                    disabled: closed,
                    onclick: on_close,
                    Icon { width: 16, height: 16, icon: LdPower }
                    "Close"
                }
            }

            div { class: "flex-1 flex flex-col lg:flex-row gap-6 p-6",
                // Left column: preview
                div { class: "flex-1 flex flex-col gap-4",
                    if closed {
                        div { class: "flex-1 flex items-center justify-center",
                            p { class: "text-(--muted) text-lg", "Session closed" }
                        }
                    } else if processing() {
                        div { class: "flex-1 flex items-center justify-center",
                            p { class: "text-(--text-secondary) text-lg animate-pulse",
                                "Processing..."
                            }
                        }
                    } else if let Some((base_url, output_url)) = urls {
                        PreviewPane {
                            base_url: base_url,
                            output_url: output_url,
                            caption: (view.caption)().unwrap_or_default(),
                        }
                    } else {
                        div { class: "flex-1 flex items-center justify-center",
                            p { class: "text-(--text-placeholder) text-lg",
                                "Upload an image to get started"
                            }
                        }
                    }

                    if let Some(ref err) = (view.error)() {
                        div { class: "bg-(--error-bg) border border-(--error-border) rounded p-3",
                            p { class: "text-(--text-error) text-sm", "{err}" }
                        }
                    }
                }

                // Right sidebar: effects
                div { class: "lg:w-80 flex-shrink-0 flex flex-col gap-4",
                    div { class: "bg-[var(--surface)] rounded p-4 flex flex-col gap-4",
                        EffectPicker {
                            catalog: catalog,
                            on_add: on_add,
                            disabled: unavailable,
                        }
                        EffectControls {
                            controls: controls,
                            on_change: on_change,
                            disabled: unavailable,
                        }
                    }
                }
            }

            div { class: "px-6 pb-6",
                FileUpload {
                    on_upload: on_upload,
                    disabled: unavailable,
                }
            }
        }
    }
}
