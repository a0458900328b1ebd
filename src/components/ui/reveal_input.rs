use super::button::{Button, ButtonSize, ButtonVariant};
use super::input::TextInput;
use icons::{Eye, EyeOff};
use leptos::prelude::*;

/// Field ids masked while streamer mode is on.
pub(crate) const SENSITIVE_FIELDS: [&str; 3] = ["quest_ip", "spotify_client_id", "spotify_client_secret"];

pub(crate) fn is_sensitive(id: &str) -> bool {
    SENSITIVE_FIELDS.contains(&id)
}

/// Values the backend already redacted (`abc***xyz`) are shown as-is.
pub(crate) fn should_mask(value: &str, privacy: bool) -> bool {
    privacy && !value.is_empty() && !value.contains("***")
}

/// Text field that starts masked in streamer mode and has its own show/hide button.
///
/// The field is masked at most once automatically; after that only the button
/// changes it, so typing never re-masks.
#[component]
pub fn RevealInput(
    #[prop(into)] id: String,
    #[prop(into, optional)] placeholder: String,
    bind_value: RwSignal<String>,
    #[prop(into)] privacy: Signal<bool>,
) -> impl IntoView {
    let masked = RwSignal::new(should_mask(
        &bind_value.get_untracked(),
        privacy.get_untracked(),
    ));

    // Value and streamer flag may still be loading at mount; mask as soon as both land.
    let armed = RwSignal::new(!masked.get_untracked());
    Effect::new(move |_| {
        let v = bind_value.get();
        if armed.get_untracked() && should_mask(&v, privacy.get()) {
            armed.set(false);
            masked.set(true);
        }
    });

    view! {
        <div class="flex items-center gap-1">
            {move || {
                let kind = if masked.get() { "password" } else { "text" };
                view! {
                    <TextInput
                        id=id.clone()
                        r#type=kind
                        placeholder=placeholder.clone()
                        bind_value=bind_value
                    />
                }
            }}
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                attr:title=move || if masked.get() { "Show" } else { "Hide" }
                on:click=move |_| {
                    armed.set(false);
                    masked.update(|m| *m = !*m);
                }
            >
                {move || if masked.get() {
                    view! { <Eye /> }.into_any()
                } else {
                    view! { <EyeOff /> }.into_any()
                }}
            </Button>
        </div>
    }
}
