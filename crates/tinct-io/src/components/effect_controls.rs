//! One slider per effect instance, in pipeline order.

use dioxus::prelude::*;
use tinct_pipeline::{ControlDescriptor, EffectId};

/// Props for the [`EffectControls`] component.
#[derive(Props, Clone, PartialEq)]
pub struct EffectControlsProps {
    /// Controls to draw, already in pipeline order.
    controls: Vec<ControlDescriptor>,
    /// Called with the bound id and the raw slider value on every input.
    on_change: EventHandler<(EffectId, f64)>,
    #[props(default)]
    disabled: bool,
}

/// The stacked list of effect sliders.
#[component]
pub fn EffectControls(props: EffectControlsProps) -> Element {
    if props.controls.is_empty() {
        return rsx! {
            p { class: "text-sm text-[var(--muted)] italic",
                "No effects yet. Add one above."
            }
        };
    }

    rsx! {
        div { class: "flex flex-col gap-3",
            for control in props.controls.iter() {
                div { key: "{control.id}",
                    {render_slider(control, props.disabled, props.on_change)}
                }
            }
        }
    }
}

/// Render a labeled range slider bound to one effect instance.
fn render_slider(
    control: &ControlDescriptor,
    disabled: bool,
    on_change: EventHandler<(EffectId, f64)>,
) -> Element {
    let display = format!("{:.1}", control.value);
    let dom_id = format!("effect-{}", control.id);
    let id = control.id.clone();
    let label = control.label;
    let (min, max, step, value) = (control.min, control.max, control.step, control.value);

    rsx! {
        div { class: "flex flex-col gap-1",
            div { class: "flex justify-between text-sm",
                label { r#for: "{dom_id}",
                    class: "text-[var(--text-heading)] font-medium",
                    "{label}"
                }
                span { class: "text-[var(--text-secondary)] tabular-nums",
                    "{display}"
                }
            }
            input {
                r#type: "range",
                id: "{dom_id}",
                min: "{min}",
                max: "{max}",
                step: "{step}",
                value: "{value}",
                disabled: disabled,
                class: "w-full accent-[var(--btn-primary)]",
                oninput: move |e| {
                    match e.value().parse::<f64>() {
                        Ok(v) => on_change.call((id.clone(), v)),
                        Err(err) => {
                            web_sys::console::warn_1(
                                &format!("slider parse failure: {err:?} from {:?}", e.value())
                                    .into(),
                            );
                        }
                    }
                },
            }
        }
    }
}
