use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

const INPUT_CLASS: &str = "placeholder:text-muted-foreground dark:bg-input/30 border-input flex h-8 w-full min-w-0 rounded-md border bg-transparent px-2.5 py-1 text-sm shadow-xs outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50 disabled:cursor-not-allowed disabled:opacity-50";

pub(crate) fn event_value(ev: &web_sys::Event) -> Option<String> {
    let target = ev.target()?;
    if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
        return Some(input.value());
    }
    target
        .dyn_ref::<web_sys::HtmlSelectElement>()
        .map(|s| s.value())
}

/// Parse a count typed into a numeric field. Blank or garbage becomes `fallback`;
/// anything below `min` is raised to it.
pub(crate) fn parse_count(raw: &str, min: u32, fallback: u32) -> u32 {
    let raw = raw.trim();
    let parsed = raw.parse::<u32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.floor() as u32)
    });
    parsed.unwrap_or(fallback).max(min)
}

/// Text field bound to `bind_value`. `on_commit` fires on `change`, i.e. once
/// the user leaves the field after editing.
#[component]
pub fn TextInput(
    #[prop(into, optional)] class: String,
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(optional)] disabled: bool,
    bind_value: RwSignal<String>,
    #[prop(optional)] on_commit: Option<Callback<String>>,
) -> impl IntoView {
    let merged_class = tw_merge!(INPUT_CLASS, class);

    view! {
        <input
            type=r#type
            class=merged_class
            placeholder=placeholder
            id=id
            disabled=disabled
            prop:value=move || bind_value.get()
            on:input=move |ev| {
                if let Some(v) = event_value(&ev) {
                    bind_value.set(v);
                }
            }
            on:change=move |ev| {
                if let (Some(cb), Some(v)) = (on_commit, event_value(&ev)) {
                    cb.run(v);
                }
            }
        />
    }
}

/// Positive integer field. Commits the parsed value on `change`.
#[component]
pub fn CountInput(
    #[prop(into, optional)] class: String,
    #[prop(into)] value: Signal<u32>,
    #[prop(default = 1)] min: u32,
    on_commit: Callback<u32>,
) -> impl IntoView {
    let merged_class = tw_merge!(INPUT_CLASS, "w-20", class);

    view! {
        <input
            type="number"
            class=merged_class
            min=min.to_string()
            prop:value=move || value.get().to_string()
            on:change=move |ev| {
                let raw = event_value(&ev).unwrap_or_default();
                on_commit.run(parse_count(&raw, min, value.get_untracked()));
            }
        />
    }
}

/// Dropdown over `(value, label)` pairs. `on_change` gets the picked value.
#[component]
pub fn SelectInput(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    options: Vec<(&'static str, &'static str)>,
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(INPUT_CLASS, class);

    view! {
        <select
            class=merged_class
            id=id
            on:change=move |ev| {
                if let Some(v) = event_value(&ev) {
                    on_change.run(v);
                }
            }
        >
            {options
                .into_iter()
                .map(|(v, label)| {
                    view! {
                        <option value=v prop:selected=move || value.with(|cur| cur == v)>
                            {label}
                        </option>
                    }
                })
                .collect_view()}
        </select>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_accepts_plain_numbers() {
        assert_eq!(parse_count("5", 1, 3), 5);
        assert_eq!(parse_count(" 12 ", 1, 3), 12);
        assert_eq!(parse_count("7.9", 1, 3), 7);
    }

    #[test]
    fn test_parse_count_falls_back_on_garbage() {
        assert_eq!(parse_count("", 1, 3), 3);
        assert_eq!(parse_count("abc", 1, 3), 3);
        assert_eq!(parse_count("-4", 1, 3), 3);
    }

    #[test]
    fn test_parse_count_enforces_minimum() {
        assert_eq!(parse_count("0", 1, 3), 1);
        assert_eq!(parse_count("0", 1, 0), 1);
    }
}
