use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Notice, div, "w-full rounded-md border px-3 py-2 text-xs"}
}

pub use components::*;

/// Red banner for the most recent failure, hidden while `error` is `None`.
#[component]
pub fn ErrorNotice(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|e| {
            view! { <Notice class="border-destructive/30 text-destructive">{e}</Notice> }
        })
    }
}
