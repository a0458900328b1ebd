use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::models::{DisplayToggle, ModuleToggle};
use crate::state::AppContext;
use leptos::prelude::*;

/// On/off switch for one chatbox module plus its live status line.
#[component]
pub fn ModuleToggleRow(toggle: ModuleToggle) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let display = app_state.0.sync.display;

    let is_on = move || {
        display.with(|d| d.as_ref().map(|d| toggle.is_on(d)).unwrap_or(false))
    };
    let status = move || display.with(|d| d.as_ref().and_then(|d| toggle.status_text(d)));

    view! {
        <div class="flex items-center justify-between gap-3 py-1">
            <div class="min-w-0">
                <div class="text-sm font-medium">{toggle.label()}</div>
                {move || status().map(|s| view! {
                    <div class="truncate text-xs text-muted-foreground">{s}</div>
                })}
            </div>
            {move || {
                let on = is_on();
                view! {
                    <Button
                        variant=if on { ButtonVariant::On } else { ButtonVariant::Off }
                        size=ButtonSize::Sm
                        class="w-16"
                        on:click=move |_| app_state.0.toggle(toggle.path())
                    >
                        {if on { "ON" } else { "OFF" }}
                    </Button>
                }
            }}
        </div>
    }
}

/// Button whose caption states the current value ("Theme: Light").
#[component]
pub fn DisplayToggleButton(toggle: DisplayToggle) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let display = app_state.0.sync.display;

    let caption = move || {
        display.with(|d| {
            d.as_ref()
                .map(|d| toggle.caption(d))
                .unwrap_or_else(|| "...".to_string())
        })
    };

    view! {
        <Button
            variant=ButtonVariant::Outline
            size=ButtonSize::Sm
            on:click=move |_| app_state.0.toggle_display(toggle)
        >
            {caption}
        </Button>
    }
}
