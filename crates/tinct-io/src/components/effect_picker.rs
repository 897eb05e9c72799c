//! Effect picker: choose a kind from the catalog and append it.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdPlus;
use tinct_pipeline::{Catalog, EffectKind};

/// Props for the [`EffectPicker`] component.
#[derive(Props, Clone, PartialEq)]
pub struct EffectPickerProps {
    /// Kinds to offer, in display order.
    catalog: Catalog,
    /// Called with the chosen kind when "Add" is pressed.
    on_add: EventHandler<EffectKind>,
    #[props(default)]
    disabled: bool,
}

/// A select listing every catalog kind, plus an "Add" button.
#[component]
pub fn EffectPicker(props: EffectPickerProps) -> Element {
    let options: Vec<EffectKind> = props.catalog.list_available().to_vec();
    let first = options.first().copied();
    let mut selected = use_signal(|| first);

    let on_change = move |e: FormEvent| match e.value().parse::<EffectKind>() {
        Ok(kind) => selected.set(Some(kind)),
        Err(err) => {
            web_sys::console::warn_1(&format!("effect picker: {err}").into());
        }
    };

    let selected_name = selected().map_or("", EffectKind::name);
    let disabled = props.disabled || selected().is_none();

    rsx! {
        div { class: "flex items-end gap-2",
            div { class: "flex flex-col gap-1 flex-1",
                label { r#for: "effect-kind",
                    class: "text-sm text-[var(--text-heading)] font-medium",
                    "Effect"
                }
                select {
                    id: "effect-kind",
                    class: "px-2 py-1 rounded border border-[var(--border)] bg-[var(--surface)]
                            text-[var(--text)] text-sm",
                    value: "{selected_name}",
                    disabled: props.disabled,
                    onchange: on_change,

                    for kind in options.iter() {
                        option {
                            value: "{kind.name()}",
                            selected: kind.name() == selected_name,
                            "{kind.label()}"
                        }
                    }
                }
            }
            button {
                class: "inline-flex items-center gap-1 px-3 py-1 rounded bg-[var(--btn-primary)]
                        hover:bg-[var(--btn-primary-hover)] text-white text-sm font-medium
                        disabled:opacity-50",
                disabled: disabled,
                onclick: move |_| {
                    if let Some(kind) = selected() {
                        props.on_add.call(kind);
                    }
                },
                Icon { width: 16, height: 16, icon: LdPlus }
                "Add"
            }
        }
    }
}
