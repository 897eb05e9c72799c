//! Side-by-side preview of the unedited image and the edited output.

use dioxus::prelude::*;

/// Props for the [`PreviewPane`] component.
#[derive(Props, Clone, PartialEq)]
pub struct PreviewPaneProps {
    /// Object or data URL of the resized, unedited image.
    base_url: String,
    /// Object or data URL of the rendered output.
    output_url: String,
    /// Caption text such as `"400x300 scaled to 200x150"`; hidden when empty.
    #[props(default)]
    caption: String,
}

/// Shows the preview base next to the pipeline output.
#[component]
pub fn PreviewPane(props: PreviewPaneProps) -> Element {
    rsx! {
        div { class: "flex flex-col gap-2",
            div { class: "grid grid-cols-2 gap-4",
                figure { class: "flex flex-col items-center gap-1",
                    img {
                        src: "{props.base_url}",
                        alt: "Original",
                        class: "max-w-full h-auto rounded border border-[var(--border)]",
                    }
                    figcaption { class: "text-xs text-[var(--text-secondary)]", "Original" }
                }
                figure { class: "flex flex-col items-center gap-1",
                    img {
                        src: "{props.output_url}",
                        alt: "Edited",
                        class: "max-w-full h-auto rounded border border-[var(--border)]",
                    }
                    figcaption { class: "text-xs text-[var(--text-secondary)]", "Edited" }
                }
            }
            if !props.caption.is_empty() {
                p { class: "text-xs text-[var(--muted)] text-center tabular-nums", "{props.caption}" }
            }
        }
    }
}
